use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Not found '{field}' field in `{entity}`")]
    MissingField { entity: String, field: &'static str },
    #[error("Not a valid date time: {0}")]
    InvalidDate(String),
    #[error("Not a valid issue status: {0}")]
    InvalidStatus(String),
}

impl ModelError {
    pub fn missing(entity: impl ToString, field: &'static str) -> Self {
        Self::MissingField {
            entity: entity.to_string(),
            field,
        }
    }
}
