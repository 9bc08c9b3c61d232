use thiserror::Error;

#[derive(Debug, Error)]
pub enum DosingError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown drug: {0}")]
    UnknownDrug(String),

    #[error("no conversion factor for '{drug_id}' via route '{route}'")]
    UnknownRoute { drug_id: String, route: String },

    #[error("invalid dose {value} for '{drug_id}'")]
    InvalidDose { drug_id: String, value: f64 },

    #[error("invalid {parameter}: {value}")]
    InvalidParameter { parameter: String, value: f64 },

    #[error("conversion blocked: {0}")]
    Blocked(String),
}
