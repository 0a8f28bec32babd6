use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Input grab failed: {0}")]
    Grab(String),

    #[error("Activation failed: {0}")]
    Activation(String),

    #[error("Unknown app: {0}")]
    UnknownApp(String),

    #[error("Invalid shortcut: {0}")]
    InvalidShortcut(String),
}

pub type Result<T> = std::result::Result<T, Error>;
