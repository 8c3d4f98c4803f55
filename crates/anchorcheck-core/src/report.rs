//! Combined verdict over both verification methods.
//!
//! A file counts as the verified original only when its digest matches the
//! on-chain checksum and every anchored chunk matches. Either method
//! reporting a mismatch is enough to call it not original.

use std::fmt;

use crate::checksum::DigestOutcome;
use crate::verifier::{Verdict, VerificationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalVerdict {
    /// Digest and chunks both match.
    VerifiedOriginal,
    /// At least one method found a difference.
    NotOriginal,
    /// Not enough evidence either way (a method was skipped, cancelled, or
    /// had nothing to check).
    Undecided,
}

impl FinalVerdict {
    pub fn combine(digest: Option<DigestOutcome>, chunks: Option<&VerificationResult>) -> Self {
        let chunk_verdict = chunks.map(|r| r.verdict);
        if digest == Some(DigestOutcome::Mismatch) || chunk_verdict == Some(Verdict::Mismatch) {
            return FinalVerdict::NotOriginal;
        }
        if digest == Some(DigestOutcome::Match) && chunk_verdict == Some(Verdict::Match) {
            return FinalVerdict::VerifiedOriginal;
        }
        FinalVerdict::Undecided
    }

    pub fn is_verified(self) -> bool {
        self == FinalVerdict::VerifiedOriginal
    }
}

impl fmt::Display for FinalVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalVerdict::VerifiedOriginal => write!(f, "verified original (both methods)"),
            FinalVerdict::NotOriginal => write!(f, "not original"),
            FinalVerdict::Undecided => write!(f, "undecided"),
        }
    }
}
