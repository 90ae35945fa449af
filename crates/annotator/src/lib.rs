//! # Lecture Dates Annotator
//!
//! Writes creation dates into rendered curriculum rows and keeps them there
//! while the page re-renders.
//!
//! ## Pipeline
//!
//! ```text
//! Curriculum items (fetched once, chapters removed)
//!     │
//! Mutation records ──> debounce ──> pass
//!                                    │
//!                                    ├──> snapshot_rows (document order)
//!                                    ├──> match_rows (forward sync, bounded lookahead)
//!                                    └──> inject_if_absent (marker-guarded)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lecture_dates_annotator::{run_pass, MemoryPage, TextBuilder};
//! use lecture_dates_curriculum::{CurriculumItem, ItemClass, MonthYearFormatter};
//!
//! let items = vec![CurriculumItem {
//!     class: ItemClass::Lecture,
//!     id: 1,
//!     title: "Introduction".to_string(),
//!     created: Some("2023-01-01T00:00:00Z".to_string()),
//!     sort_order: 10.0,
//! }];
//! let mut page = MemoryPage::with_titles(["Introduction"]);
//! let report = run_pass(&mut page, &items, &TextBuilder, &MonthYearFormatter, "example");
//! assert_eq!(report.injected, 1);
//! assert_eq!(page.rows()[0].annotations, vec!["Created 1/2023".to_string()]);
//! ```

mod activate;
mod course_id;
mod driver;
mod error;
mod inject;
mod matcher;
mod page;
mod pass;

pub use activate::{Activation, LectureDateFeature};
pub use course_id::extract_course_id;
pub use driver::{DriverConfig, DriverHandle, LectureDateDriver};
pub use error::{AnnotatorError, Result};
pub use inject::{inject_course_created, inject_if_absent, inject_year_histogram, InjectOutcome};
pub use matcher::{match_rows, MatchedPair, LOOKAHEAD_WINDOW};
pub use page::{
    AnnotationBuilder, CurriculumPage, DomRow, MemoryAnchor, MemoryPage, MemoryRow, MutationKind,
    MutationRecord, PageMarker, RowId, TextBuilder,
};
pub use pass::{run_pass, PassReport};
