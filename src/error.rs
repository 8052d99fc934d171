use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuntError {
    #[error("WebDriver error: {0}")]
    WebDriver(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("Unexpected AI response: {0}")]
    AiResponse(String),

    #[error("Publish failed: {0}")]
    Publish(String),
}

impl From<fantoccini::error::CmdError> for HuntError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        HuntError::WebDriver(err.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for HuntError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        HuntError::WebDriver(err.to_string())
    }
}

impl From<regex::Error> for HuntError {
    fn from(err: regex::Error) -> Self {
        HuntError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HuntError>;
