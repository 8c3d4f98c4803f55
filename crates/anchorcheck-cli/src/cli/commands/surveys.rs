//! `anchorcheck surveys` - list surveys with anchored data.

use anyhow::{Context, Result};
use anchorcheck_core::source::{AnchorSource, HttpAnchorSource};

pub async fn run_surveys(source: HttpAnchorSource, all: bool) -> Result<bool> {
    let surveys = tokio::task::spawn_blocking(move || source.list_surveys())
        .await
        .context("survey listing task panicked")??;
    let shown: Vec<_> = surveys
        .into_iter()
        .filter(|s| all || s.is_verifiable())
        .collect();
    if shown.is_empty() {
        println!("No on-chain records available yet.");
        return Ok(true);
    }
    println!("{:<6} {:<7} {:<6} {}", "ID", "RECORD", "FILE", "TITLE");
    for s in shown {
        println!(
            "{:<6} {:<7} {:<6} {}",
            s.id,
            if s.has_onchain_record { "yes" } else { "-" },
            if s.has_onchain_file { "yes" } else { "-" },
            s.title
        );
    }
    Ok(true)
}
