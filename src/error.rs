use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Failed to read source {path}: {message}")]
    SourceError { path: String, message: String },

    #[error("Failed to parse record from {origin}: {message}")]
    ParseError { origin: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Shutdown requested")]
    ShutdownError,

    #[error("Scoring error: {0}")]
    ScoringError(String),
}

impl AppError {
    pub fn source_error(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::SourceError {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn parse_error(origin: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::ParseError {
            origin: origin.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
