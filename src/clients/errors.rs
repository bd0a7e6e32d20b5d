use rspotify::{ClientError, model::IdError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    #[error("Invalid Spotify id: {0}")]
    InvalidId(#[from] IdError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Skiplist error: {0}")]
    Skiplist(#[from] csv::Error),

    #[error("Retrieved total {actual} does not match expected {expected}")]
    TotalMismatch { expected: u32, actual: usize },

    #[error("Got {actual} liked flags for {expected} tracks")]
    LikedStatusMismatch { expected: usize, actual: usize },

    #[error("Logging setup error: {0}")]
    LoggingError(String),
}

impl From<log::SetLoggerError> for Error {
    fn from(err: log::SetLoggerError) -> Self {
        Error::LoggingError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
