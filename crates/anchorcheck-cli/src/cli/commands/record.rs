//! `anchorcheck record` - show a survey's on-chain record.

use anyhow::{Context, Result};
use anchorcheck_core::source::HttpAnchorSource;
use anchorcheck_core::verifier::ChunkVerifier;

pub async fn run_record(source: HttpAnchorSource, survey_id: u64) -> Result<bool> {
    let record = tokio::task::spawn_blocking(move || {
        ChunkVerifier::new(source).fetch_on_chain_record(survey_id)
    })
    .await
    .context("record lookup task panicked")??;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(true)
}
