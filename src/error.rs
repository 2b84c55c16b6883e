use std::path::PathBuf;

use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum SendError {
    #[error("{0}")]
    Usage(String),

    #[error("failed to open file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {} into the form: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to send request: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to send! Error: {status}\n📩 Server response: {body}")]
    Api { status: StatusCode, body: String },
}

impl SendError {
    pub fn usage(message: impl Into<String>) -> Self {
        SendError::Usage(message.into())
    }
}
