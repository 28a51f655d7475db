use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Invalid area: {0}")]
    InvalidArea(String),

    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    #[error("Invalid generation: {0}")]
    InvalidGeneration(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),
}

impl From<::config::ConfigError> for AgroError {
    fn from(e: ::config::ConfigError) -> Self {
        AgroError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgroError>;
