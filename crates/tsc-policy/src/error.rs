use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid policy artifact: {0}")]
    Artifact(String),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
