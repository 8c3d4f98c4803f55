//! Errors surfaced by verification operations.
//!
//! Every failure is scoped to one run: nothing here is fatal to the process,
//! and a caller can always re-invoke the operation from scratch.

use std::path::PathBuf;

use thiserror::Error;

use crate::retry::TransportError;
use crate::verifier::VerificationResult;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// Inputs required by the operation are missing or invalid.
    #[error("{0}")]
    Precondition(String),

    /// The backend has no on-chain record for the survey.
    #[error("no on-chain record for survey {survey_id}")]
    RecordNotFound { survey_id: u64 },

    /// A remote call failed. For chunk runs, `partial` holds the progress made
    /// before the failure; it is `None` for record and count lookups.
    #[error("{operation} failed{}: {source}", at_chunk(.chunk_index))]
    Transport {
        operation: &'static str,
        chunk_index: Option<u64>,
        partial: Option<Box<VerificationResult>>,
        #[source]
        source: TransportError,
    },

    /// The local file could not be read for hashing.
    #[error("failed to hash {}: {source}", .path.display())]
    Hashing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The local file could not be read while comparing chunks.
    #[error("failed to read local file at offset {offset}: {source}")]
    LocalRead {
        offset: u64,
        partial: Box<VerificationResult>,
        #[source]
        source: std::io::Error,
    },
}

fn at_chunk(index: &Option<u64>) -> String {
    match index {
        Some(i) => format!(" at chunk {}", i),
        None => String::new(),
    }
}

impl VerifyError {
    /// Progress made by a chunk run before it was aborted, if any.
    pub fn partial(&self) -> Option<&VerificationResult> {
        match self {
            VerifyError::Transport { partial, .. } => partial.as_deref(),
            VerifyError::LocalRead { partial, .. } => Some(partial),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, VerifyError::Transport { .. })
    }
}
