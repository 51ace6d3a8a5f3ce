use thiserror::Error;

use crate::validation::ValidationFailed;

#[derive(Error, Debug)]
pub enum TollgateError {
    #[error("Failed to load OpenAPI file: {0}")]
    SpecLoadError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    ValidationFailed(#[from] ValidationFailed),
}

pub type Result<T> = std::result::Result<T, TollgateError>;
