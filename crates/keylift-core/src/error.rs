use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyliftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, KeyliftError>;
