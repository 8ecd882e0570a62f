use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid match range [{start}, {end}) for term '{term}' in {location}")]
    InvalidMatchRange {
        location: String,
        term: String,
        start: usize,
        end: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
