use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Unsupported model version: {0}")]
    UnsupportedModelVersion(u16),

    #[error("Unknown game: {0}")]
    UnknownGame(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
