use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArloError {
    /// A workout payload failed validation. The message is the
    /// user-facing reason, echoed back to the agent verbatim.
    #[error("{0}")]
    InvalidWorkout(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("export error: {0}")]
    Export(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type ArloResult<T> = Result<T, ArloError>;
