use thiserror::Error;

#[derive(Debug, Error)]
pub enum BeachError {
    #[error("beach not found: {0}")]
    BeachNotFound(String),

    #[error("no beaches found in database")]
    EmptyStore,

    #[error("invalid request data: {0}")]
    BadRequest(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BeachError {
    /// True for errors that mean "nothing there" rather than "something broke".
    pub fn is_not_found(&self) -> bool {
        matches!(self, BeachError::BeachNotFound(_) | BeachError::EmptyStore)
    }
}

pub type Result<T> = std::result::Result<T, BeachError>;
