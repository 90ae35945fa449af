//! # Lecture Dates Client
//!
//! Fetches course curricula from the REST API, following pagination and
//! returning items in visual order.
//!
//! ## Example
//!
//! ```no_run
//! use lecture_dates_client::{ClientConfig, CurriculumClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CurriculumClient::new(ClientConfig::default())?;
//!     let items = client.fetch_all_items(4471964).await?;
//!     println!("{} items", items.len());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;

pub use client::CurriculumClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
