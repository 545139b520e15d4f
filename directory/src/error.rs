use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("target not found: {0}")]
    NotFound(String),

    #[error("directory transport error: {0}")]
    Transport(String),

    #[error("invalid directory response: {0}")]
    InvalidResponse(String),
}
