use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}
