use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read `{key}`: {message}")]
    Read { key: String, message: String },
    #[error("failed to write `{key}`: {message}")]
    Write { key: String, message: String },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("snapshot encode failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot decode failed: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("duplicate {kind} id `{id}` in snapshot")]
    DuplicateId { kind: &'static str, id: String },
    #[error("member `{id}` has a non-finite position")]
    NonFinitePosition { id: String },
}

/// Canvas event rejected before it reaches the projection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("parameter '{0}' must be finite")]
    NonFinite(&'static str),
    #[error("parameter '{0}' must not be empty")]
    EmptyId(&'static str),
}
