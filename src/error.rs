use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComicError {
    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upstream returned HTTP {status} for {url}")]
    Api { status: u16, url: String },
}

pub type Result<T> = std::result::Result<T, ComicError>;
