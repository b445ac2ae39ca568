use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{trades} trades already recorded, reset the run before changing settings")]
    RunInProgress { trades: usize },

    #[error("unrecognised trade outcome: {0:?}")]
    UnknownOutcome(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JournalError>;
