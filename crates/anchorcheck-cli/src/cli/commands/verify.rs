//! `anchorcheck verify` - both methods and the combined verdict.

use anyhow::Result;
use anchorcheck_core::error::VerifyError;
use anchorcheck_core::report::FinalVerdict;
use anchorcheck_core::source::HttpAnchorSource;
use std::path::PathBuf;

use super::chunks::{print_chunk_result, verify_with_progress};
use super::compare::{check_digest, print_digest_check};

/// Method 1 cannot run without an on-chain checksum, but the chunks may
/// still be anchored.
fn skips_digest(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<VerifyError>(),
        Some(VerifyError::RecordNotFound { .. } | VerifyError::Precondition(_))
    )
}

pub async fn run_verify(source: HttpAnchorSource, survey_id: u64, path: PathBuf) -> Result<bool> {
    println!("Method 1: SHA-256 against on-chain checksum");
    let digest = match check_digest(source.clone(), survey_id, path.clone()).await {
        Ok(check) => {
            print_digest_check(&check);
            Some(check.outcome)
        }
        Err(err) if skips_digest(&err) => {
            println!("{}; continuing with chunk verification", err);
            None
        }
        Err(err) => return Err(err),
    };

    println!();
    println!("Method 2: raw on-chain chunks");
    let chunks = verify_with_progress(source, survey_id, path).await?;
    print_chunk_result(&chunks);

    let verdict = FinalVerdict::combine(digest, Some(&chunks));
    println!();
    println!("Result: {}", verdict);
    tracing::info!(survey_id, %verdict, "verification finished");
    Ok(verdict.is_verified())
}
