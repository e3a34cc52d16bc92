use std::path::PathBuf;
use std::pin::Pin;

use futures_util::Stream;
use thiserror::Error;

/// Substring the completion backend uses to report an invalid or expired key.
///
/// The backend exposes no structured error code, so classification is by
/// message text only.
pub const CREDENTIAL_FAILURE_MARKER: &str = "Requested entity was not found.";

/// Ordered text fragments of one streamed reply. Finite and not restartable.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, CompletionError>> + Send>>;

/// Opaque handle to one conversation bound to a fixed preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

impl SessionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface refused to reveal its location, e.g. for cross-origin content.
    #[error("location read denied: {reason}")]
    AccessDenied { reason: String },
    #[error("no content loaded in surface")]
    Detached,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompletionError {
    pub message: String,
}

impl CompletionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn is_credential_failure(&self) -> bool {
        self.message.contains(CREDENTIAL_FAILURE_MARKER)
    }
}

#[derive(Debug, Error)]
pub enum KeySelectError {
    #[error("could not read key file: {0}")]
    Io(#[from] std::io::Error),
    #[error("key file {path:?} is empty")]
    EmptyKey { path: PathBuf },
}
