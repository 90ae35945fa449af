use thiserror::Error;

pub type Result<T> = std::result::Result<T, CurriculumError>;

#[derive(Error, Debug)]
pub enum CurriculumError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidDate(String),
}
