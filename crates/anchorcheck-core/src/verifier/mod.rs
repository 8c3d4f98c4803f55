//! Chunked file integrity verification.
//!
//! `ChunkVerifier` confirms that a local file equals the concatenation of the
//! chunks anchored for a survey, and separately that its SHA-256 matches the
//! on-chain record. Chunks are fetched one at a time in index order: the
//! comparison is positional, each slice starting where the previous chunk
//! ended, so only one chunk is held in memory at a time.

mod local;
mod progress;
mod types;

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::checksum::{self, DigestOutcome};
use crate::control::CancelToken;
use crate::error::VerifyError;
use crate::source::{AnchorSource, OnChainRecord};

pub use progress::{ChunkProgress, NoProgress, ProgressObserver};
pub use types::{ChunkDescriptor, Verdict, VerificationResult};

/// Runs verification against one `AnchorSource`.
#[derive(Debug, Clone)]
pub struct ChunkVerifier<S> {
    source: S,
}

impl<S: AnchorSource> ChunkVerifier<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// SHA-256 of the whole file at `path`, lowercase hex.
    pub fn compute_whole_file_digest(&self, path: &Path) -> Result<String, VerifyError> {
        checksum::sha256_path(path)
    }

    /// Case-insensitive comparison of a local digest with an on-chain checksum.
    pub fn compare_digest(local_hex: &str, on_chain_hex: &str) -> Result<DigestOutcome, VerifyError> {
        checksum::compare_digest(local_hex, on_chain_hex)
    }

    /// Look up the on-chain record for `survey_id`.
    pub fn fetch_on_chain_record(&self, survey_id: u64) -> Result<OnChainRecord, VerifyError> {
        require_survey_id(survey_id)?;
        match self.source.on_chain_record(survey_id) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(VerifyError::RecordNotFound { survey_id }),
            Err(source) => Err(VerifyError::Transport {
                operation: "on-chain record lookup",
                chunk_index: None,
                partial: None,
                source,
            }),
        }
    }

    /// Number of chunks anchored for `survey_id`.
    pub fn chunk_count(&self, survey_id: u64) -> Result<u64, VerifyError> {
        require_survey_id(survey_id)?;
        self.source
            .chunk_count(survey_id)
            .map_err(|source| VerifyError::Transport {
                operation: "chunk count",
                chunk_index: None,
                partial: None,
                source,
            })
    }

    /// Compare the file at `path` against the anchored chunks.
    pub fn verify_chunks_path(
        &self,
        survey_id: u64,
        path: &Path,
        observer: &mut dyn ProgressObserver,
        cancel: Option<&CancelToken>,
    ) -> Result<VerificationResult, VerifyError> {
        let mut file = File::open(path).map_err(|source| VerifyError::Hashing {
            path: path.to_path_buf(),
            source,
        })?;
        self.verify_chunks(survey_id, &mut file, observer, cancel)
    }

    /// Compare `file` byte-for-byte against the chunks anchored for `survey_id`.
    ///
    /// A mismatched chunk does not stop the run; every chunk is compared so the
    /// report shows how much of the file diverged. Alignment is positional:
    /// the offset advances by each chunk's length whatever the outcome.
    ///
    /// `cancel` is checked before each chunk. A cancelled run returns `Ok`
    /// with `cancelled` set and the verdict left `Pending`. A failed chunk
    /// fetch aborts with `VerifyError::Transport`, carrying the partial result.
    pub fn verify_chunks<R: Read + Seek>(
        &self,
        survey_id: u64,
        file: &mut R,
        observer: &mut dyn ProgressObserver,
        cancel: Option<&CancelToken>,
    ) -> Result<VerificationResult, VerifyError> {
        let total = self.chunk_count(survey_id)?;
        let mut result = VerificationResult::new(survey_id, total);
        tracing::info!(survey_id, total_chunks = result.total_chunks, "chunk verification started");

        let local_size = local::local_len(file).map_err(|source| VerifyError::LocalRead {
            offset: 0,
            partial: Box::new(result.clone()),
            source,
        })?;

        let mut offset = 0u64;
        let mut local_buf = Vec::new();
        for index in 0..total {
            let chunk = ChunkDescriptor::new(survey_id, index);
            if cancel.map_or(false, CancelToken::is_cancelled) {
                result.mark_cancelled();
                tracing::info!(
                    survey_id,
                    checked = result.checked_chunks,
                    "chunk verification cancelled"
                );
                return Ok(result);
            }

            let remote = match self.source.download_chunk(survey_id, chunk.index) {
                Ok(bytes) => bytes,
                Err(source) => {
                    tracing::warn!(survey_id, index = chunk.index, error = %source, "chunk download failed");
                    return Err(VerifyError::Transport {
                        operation: "download chunk",
                        chunk_index: Some(chunk.index),
                        partial: Some(Box::new(result)),
                        source,
                    });
                }
            };
            let chunk = chunk.resolved(remote.len() as u64);

            if let Err(source) = local::read_slice(file, offset, remote.len() as u64, &mut local_buf) {
                return Err(VerifyError::LocalRead {
                    offset,
                    partial: Box::new(result),
                    source,
                });
            }
            let matched = local_buf == remote;
            if !matched {
                tracing::debug!(
                    survey_id,
                    index = chunk.index,
                    offset,
                    remote_len = remote.len(),
                    local_len = local_buf.len(),
                    "chunk mismatch"
                );
            }

            offset += remote.len() as u64;
            result.record_chunk(&chunk, matched);
            observer.on_chunk(&ChunkProgress {
                chunk,
                matched,
                checked_chunks: result.checked_chunks,
                total_chunks: result.total_chunks,
                mismatches: result.mismatches,
            });
        }

        result.finish(local_size);
        tracing::info!(
            survey_id,
            checked = result.checked_chunks,
            mismatches = result.mismatches,
            leftover = result.leftover_local_bytes,
            verdict = ?result.verdict,
            "chunk verification finished"
        );
        Ok(result)
    }
}

fn require_survey_id(survey_id: u64) -> Result<(), VerifyError> {
    if survey_id == 0 {
        return Err(VerifyError::Precondition(
            "survey id must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
