//! Per-chunk progress notifications.
//!
//! The verifier reports through an observer instead of touching any
//! presentation layer; the CLI forwards these to a printer task.

use super::types::ChunkDescriptor;

/// Snapshot emitted after each chunk is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    pub chunk: ChunkDescriptor,
    pub matched: bool,
    pub checked_chunks: u64,
    pub total_chunks: u64,
    pub mismatches: u64,
}

impl ChunkProgress {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_chunks == 0 {
            return 1.0;
        }
        (self.checked_chunks as f64 / self.total_chunks as f64).min(1.0)
    }
}

pub trait ProgressObserver {
    fn on_chunk(&mut self, progress: &ChunkProgress);
}

impl<F: FnMut(&ChunkProgress)> ProgressObserver for F {
    fn on_chunk(&mut self, progress: &ChunkProgress) {
        self(progress)
    }
}

/// Observer that ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_chunk(&mut self, _progress: &ChunkProgress) {}
}
