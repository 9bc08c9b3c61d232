use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid age: {0}")]
    InvalidAge(String),

    #[error("invalid MME value: {0}")]
    InvalidMme(String),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: String, value: String },
}
