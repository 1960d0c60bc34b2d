use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Dataset shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Persisted artifact '{artifact}' is corrupt: {details}")]
    CorruptArtifact { artifact: String, details: String },

    #[error("Artifact store error for '{artifact}': {details}")]
    StoreError { artifact: String, details: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
