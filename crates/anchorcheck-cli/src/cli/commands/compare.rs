//! `anchorcheck compare` - method 1: whole-file SHA-256 against the on-chain checksum.

use anyhow::{Context, Result};
use anchorcheck_core::checksum::DigestOutcome;
use anchorcheck_core::error::VerifyError;
use anchorcheck_core::source::HttpAnchorSource;
use anchorcheck_core::verifier::ChunkVerifier;
use std::path::PathBuf;

/// Local and on-chain digests with their comparison.
pub(super) struct DigestCheck {
    pub local: String,
    pub on_chain: String,
    pub outcome: DigestOutcome,
}

/// Hash the file and fetch the record concurrently, then compare.
pub(super) async fn check_digest(
    source: HttpAnchorSource,
    survey_id: u64,
    path: PathBuf,
) -> Result<DigestCheck> {
    let verifier = ChunkVerifier::new(source);
    let hasher = verifier.clone();
    let hash_task =
        tokio::task::spawn_blocking(move || hasher.compute_whole_file_digest(&path));
    let record_task =
        tokio::task::spawn_blocking(move || verifier.fetch_on_chain_record(survey_id));

    let local = hash_task.await.context("hashing task panicked")??;
    let record = record_task.await.context("record lookup task panicked")??;
    let on_chain = match record.checksum {
        Some(c) if !c.trim().is_empty() => c,
        _ => {
            return Err(VerifyError::Precondition(format!(
                "on-chain record for survey {} has no checksum",
                survey_id
            ))
            .into())
        }
    };
    let outcome = ChunkVerifier::<HttpAnchorSource>::compare_digest(&local, &on_chain)?;
    Ok(DigestCheck {
        local,
        on_chain,
        outcome,
    })
}

pub(super) fn print_digest_check(check: &DigestCheck) {
    println!("Local SHA-256:    {}", check.local);
    println!("On-chain checksum: {}", check.on_chain);
    match check.outcome {
        DigestOutcome::Match => println!("Checksum matches on-chain record"),
        DigestOutcome::Mismatch => println!("Checksum mismatch"),
    }
}

pub async fn run_compare(source: HttpAnchorSource, survey_id: u64, path: PathBuf) -> Result<bool> {
    let check = check_digest(source, survey_id, path).await?;
    print_digest_check(&check);
    Ok(check.outcome == DigestOutcome::Match)
}
