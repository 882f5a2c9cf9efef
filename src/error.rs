use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed source {path}: {reason}")]
    MalformedSource { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChunkError>;
