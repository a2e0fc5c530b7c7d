//! Error types for retrieval and reassembly.

use std::time::Duration;

use slicestore_slicing::GroupDefect;

/// Failure of a single object retrieval.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("unexpected HTTP status {status} for object {object_id}")]
    Status { object_id: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("retrieval timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("malformed listing: {0}")]
    Malformed(String),
}

/// Errors produced while reconstructing a sliced file.
#[derive(Debug, thiserror::Error)]
pub enum ReassemblyError {
    /// The group failed verification; nothing was fetched.
    #[error(transparent)]
    Group(#[from] GroupDefect),

    /// A slice retrieval failed or timed out. Sibling retrievals were cancelled.
    #[error("retrieval of slice {index} failed: {source}")]
    Retrieval {
        index: u32,
        #[source]
        source: FetchError,
    },

    /// The caller abandoned the operation.
    #[error("cancelled")]
    Cancelled,

    /// A retrieval task panicked or was aborted outside our control.
    #[error("retrieval task failed: {0}")]
    Task(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid output name: {0}")]
    InvalidName(String),
}

impl ReassemblyError {
    /// `true` when the operation was abandoned by the caller rather than failing.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
