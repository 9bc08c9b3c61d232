use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read knowledge base at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "invalid conversion factor {factor} for '{drug_id}' ({route}): \
         only allow-listed agents may carry a non-positive factor"
    )]
    InvalidFactor {
        drug_id: String,
        route: String,
        factor: f64,
    },

    #[error("drug '{0}' has no conversion routes")]
    MissingRoutes(String),
}
