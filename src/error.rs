//! Error types for the editor core.

use crate::snapshot::SnapshotError;
use crate::validate::RejectReason;
use thiserror::Error;

/// Errors returned by store and controller operations.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("edge '{0}' not found")]
    EdgeNotFound(String),

    #[error("connection rejected: {0}")]
    Rejected(#[from] RejectReason),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Gesture(#[from] GestureError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Errors from the connection gesture state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    #[error("a connection from '{0}' is already in progress")]
    AlreadyConnecting(String),

    #[error("cannot start a connection from unknown node '{0}'")]
    UnknownSource(String),
}

/// Error reported by a host callback. Never propagated into the mutation path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CallbackError(pub String);

impl From<&str> for CallbackError {
    fn from(msg: &str) -> Self {
        Self(msg.to_owned())
    }
}

impl From<String> for CallbackError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
