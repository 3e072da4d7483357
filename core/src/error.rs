use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("stream I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not start worker for page {page}: {source}")]
    Spawn {
        page: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker for page {page} failed: {message}")]
    WorkerPanicked { page: usize, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
