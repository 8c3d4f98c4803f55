//! Per-run state: chunk descriptors, verdicts and the run result.

use serde::Serialize;

/// One anchored chunk. `size_bytes` is unknown until the chunk is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkDescriptor {
    pub survey_id: u64,
    pub index: u64,
    pub size_bytes: Option<u64>,
}

impl ChunkDescriptor {
    pub fn new(survey_id: u64, index: u64) -> Self {
        Self {
            survey_id,
            index,
            size_bytes: None,
        }
    }

    pub(super) fn resolved(mut self, len: u64) -> Self {
        self.size_bytes = Some(len);
        self
    }
}

/// Aggregate outcome of a chunk run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Run not finished (still going, or cancelled).
    Pending,
    Match,
    Mismatch,
    /// The survey has no anchored chunks; nothing was verified.
    Inconclusive,
}

/// Result of one `verify_chunks` run.
///
/// Invariants: `checked_chunks <= total_chunks` and
/// `mismatches <= checked_chunks` at every observable point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub survey_id: u64,
    pub total_chunks: u64,
    pub checked_chunks: u64,
    pub mismatches: u64,
    /// Local bytes beyond the end of the anchored content.
    pub leftover_local_bytes: u64,
    /// Sum of the lengths of all chunks fetched so far.
    pub remote_bytes: u64,
    /// Indices of chunks that differed, in ascending order.
    pub mismatched_indices: Vec<u64>,
    pub cancelled: bool,
    pub verdict: Verdict,
}

impl VerificationResult {
    pub fn new(survey_id: u64, total_chunks: u64) -> Self {
        Self {
            survey_id,
            total_chunks,
            checked_chunks: 0,
            mismatches: 0,
            leftover_local_bytes: 0,
            remote_bytes: 0,
            mismatched_indices: Vec::new(),
            cancelled: false,
            verdict: Verdict::Pending,
        }
    }

    pub(super) fn record_chunk(&mut self, chunk: &ChunkDescriptor, matched: bool) {
        debug_assert!(self.checked_chunks < self.total_chunks);
        self.remote_bytes += chunk.size_bytes.unwrap_or(0);
        if !matched {
            self.mismatches += 1;
            self.mismatched_indices.push(chunk.index);
        }
        self.checked_chunks += 1;
    }

    /// Close the run against a local file of `local_size` bytes.
    pub(super) fn finish(&mut self, local_size: u64) {
        self.leftover_local_bytes = local_size.saturating_sub(self.remote_bytes);
        self.verdict = if self.total_chunks == 0 {
            Verdict::Inconclusive
        } else if self.mismatches == 0 && self.leftover_local_bytes == 0 {
            Verdict::Match
        } else {
            Verdict::Mismatch
        };
    }

    pub(super) fn mark_cancelled(&mut self) {
        self.cancelled = true;
        self.verdict = Verdict::Pending;
    }

    /// True once every anchored chunk was compared.
    pub fn is_complete(&self) -> bool {
        self.checked_chunks == self.total_chunks && !self.cancelled
    }

    /// Fraction of chunks checked, in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_chunks == 0 {
            return 1.0;
        }
        (self.checked_chunks as f64 / self.total_chunks as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: u64, len: u64) -> ChunkDescriptor {
        ChunkDescriptor::new(1, index).resolved(len)
    }

    #[test]
    fn zero_chunks_is_inconclusive() {
        let mut r = VerificationResult::new(1, 0);
        r.finish(0);
        assert_eq!(r.verdict, Verdict::Inconclusive);
        assert_eq!(r.fraction(), 1.0);
    }

    #[test]
    fn leftover_forces_mismatch() {
        let mut r = VerificationResult::new(1, 1);
        r.record_chunk(&chunk(0, 10), true);
        r.finish(12);
        assert_eq!(r.leftover_local_bytes, 2);
        assert_eq!(r.verdict, Verdict::Mismatch);
    }

    #[test]
    fn local_shorter_than_remote_has_no_leftover() {
        let mut r = VerificationResult::new(1, 1);
        r.record_chunk(&chunk(0, 10), false);
        r.finish(4);
        assert_eq!(r.leftover_local_bytes, 0);
        assert_eq!(r.mismatched_indices, vec![0]);
        assert_eq!(r.verdict, Verdict::Mismatch);
    }

    #[test]
    fn cancelled_never_matches() {
        let mut r = VerificationResult::new(1, 2);
        r.record_chunk(&chunk(0, 3), true);
        r.mark_cancelled();
        assert_eq!(r.verdict, Verdict::Pending);
        assert!(!r.is_complete());
        assert_eq!(r.fraction(), 0.5);
    }
}
