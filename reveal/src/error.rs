use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevealError {
    /// Target does not exist or is not live in the directory.
    #[error("unknown or inactive target: {0}")]
    UnknownTarget(String),

    /// No reveal record with the given id.
    #[error("reveal not found: {0}")]
    NotFound(String),

    /// Disclosure requested on a record that is not `completed`.
    #[error("reveal is not unlocked")]
    NotUnlocked,

    /// The target entity is gone and no contact snapshot survives.
    #[error("target entity no longer exists")]
    TargetGone,

    /// The directory could not be reached.
    #[error("directory unavailable: {0}")]
    Directory(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] fichua_store::StoreError),
}
