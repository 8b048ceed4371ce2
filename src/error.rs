use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("No dish at index {0}")]
    UnknownDish(usize),
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("Recognition error: {0}")]
    RecognitionError(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
