use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid patient context: {0}")]
    Context(#[from] analgesia_core::error::CoreError),

    #[error(transparent)]
    Knowledge(#[from] analgesia_knowledge::error::KnowledgeError),

    #[error(transparent)]
    Dosing(#[from] analgesia_dosing::error::DosingError),
}
