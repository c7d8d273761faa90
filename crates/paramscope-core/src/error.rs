use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse parameters: {0}")]
    Parse(String),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
