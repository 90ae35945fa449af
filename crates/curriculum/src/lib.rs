//! # Lecture Dates Curriculum
//!
//! Shared data model for curriculum annotation.
//!
//! ## Pipeline
//!
//! ```text
//! Curriculum API (paginated, sorted by sort_order desc)
//!     │
//!     ├──> filter_content_items (drop chapter headers)
//!     │      └─> Content items in visual order
//!     │
//!     ├──> normalize_title (matching key)
//!     │
//!     └──> DateFormatter / YearHistogram
//!            └─> Display strings and per-year counts
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lecture_dates_curriculum::{normalize_title, DateFormatter, MonthYearFormatter};
//!
//! assert_eq!(normalize_title("  Model   Measurements "), "model measurements");
//! assert_eq!(
//!     MonthYearFormatter.format_date("2023-02-01T00:00:00Z").as_deref(),
//!     Some("2/2023")
//! );
//! ```

mod date;
mod error;
mod filter;
mod histogram;
mod item;
mod normalize;
mod source;

pub use date::{created_year, parse_created, DateFormatter, MonthYearFormatter};
pub use error::{CurriculumError, Result};
pub use filter::filter_content_items;
pub use histogram::YearHistogram;
pub use item::{parse_items_json, sort_descending, CourseInfo, CurriculumItem, ItemClass};
pub use normalize::normalize_title;
pub use source::CurriculumSource;
