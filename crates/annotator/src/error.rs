use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnotatorError>;

#[derive(Error, Debug)]
pub enum AnnotatorError {
    #[error("annotation driver is no longer running")]
    DriverStopped,

    #[error("page lock poisoned")]
    PagePoisoned,
}
