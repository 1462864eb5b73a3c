use crate::entry::EntryId;
use crate::message::Command;
use thiserror::Error;

/// Failure of a single store call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no entry with id {0}")]
    NotFound(EntryId),
    #[error("directory {0} is not empty")]
    NotEmpty(EntryId),
    #[error("entry {0} cannot be modified")]
    ReadOnly(EntryId),
    #[error("cannot move {id} into {parent_id}")]
    InvalidMove { id: EntryId, parent_id: EntryId },
    #[error("{0} is not a directory")]
    NotADirectory(EntryId),
    #[error("invalid attributes: {0}")]
    Invalid(String),
    #[error("store file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural reason a move or drop was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Cannot move to the root directory")]
    RootDestination,
    #[error("Cannot move to a search view")]
    SearchDestination,
    #[error("Cannot move to a child directory")]
    ChildDirectory,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Rejected(#[from] Rejection),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("aborted by user")]
    UserAborted,
    #[error("{0}")]
    MalformedImport(String),
    #[error("Command is not supported: {0}")]
    UnknownCommand(String),
    #[error("{0} is not available for the current selection")]
    Unavailable(Command),
    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, CommandError>;
