//! `anchorcheck chunks` - method 2: compare the file with the raw on-chain chunks.

use anyhow::{Context, Result};
use anchorcheck_core::control::CancelToken;
use anchorcheck_core::error::VerifyError;
use anchorcheck_core::source::HttpAnchorSource;
use anchorcheck_core::verifier::{ChunkProgress, ChunkVerifier, Verdict, VerificationResult};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;

const PROGRESS_INTERVAL_MS: u128 = 250;

/// Run chunk verification on a blocking thread with a progress line on
/// stderr. Ctrl-C cancels the run; the partial result is still returned.
pub(super) async fn verify_with_progress(
    source: HttpAnchorSource,
    survey_id: u64,
    path: PathBuf,
) -> Result<VerificationResult, VerifyError> {
    let cancel = CancelToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received; cancelling chunk verification");
                cancel.cancel();
            }
        }
    });

    let (progress_tx, mut progress_rx) = mpsc::channel::<ChunkProgress>(16);
    let printer = tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        let mut printed = false;
        while let Some(p) = progress_rx.recv().await {
            let due = last_print
                .map(|t| t.elapsed().as_millis() >= PROGRESS_INTERVAL_MS)
                .unwrap_or(true);
            if due || p.checked_chunks == p.total_chunks {
                eprint!(
                    "\r  {}/{} chunks ({:.0}%)  mismatches: {}  ",
                    p.checked_chunks,
                    p.total_chunks,
                    p.fraction() * 100.0,
                    p.mismatches
                );
                let _ = std::io::stderr().flush();
                last_print = Some(Instant::now());
                printed = true;
            }
        }
        if printed {
            eprintln!();
        }
    });

    let run = tokio::task::spawn_blocking(move || {
        let verifier = ChunkVerifier::new(source);
        let mut observer = forward_progress(progress_tx);
        verifier.verify_chunks_path(survey_id, &path, &mut observer, Some(&cancel))
    })
    .await;

    ctrl_c.abort();
    let _ = printer.await;

    match run {
        Ok(result) => result,
        Err(join_err) => std::panic::resume_unwind(join_err.into_panic()),
    }
}

/// Observer that hands each snapshot to the printer task. Must run on a
/// blocking thread: a full channel stalls the verifier rather than dropping
/// updates, so the final snapshot always reaches the printer.
fn forward_progress(tx: mpsc::Sender<ChunkProgress>) -> impl FnMut(&ChunkProgress) {
    move |p: &ChunkProgress| {
        // Receiver gone means the printer stopped; verification carries on.
        let _ = tx.blocking_send(*p);
    }
}

pub(super) fn print_chunk_result(r: &VerificationResult) {
    println!("Chunks checked: {} / {}", r.checked_chunks, r.total_chunks);
    println!("Chunk mismatches: {}", r.mismatches);
    if !r.mismatched_indices.is_empty() {
        let list: Vec<String> = r.mismatched_indices.iter().map(u64::to_string).collect();
        println!("Mismatched chunks: {}", list.join(", "));
    }
    if r.leftover_local_bytes > 0 {
        println!(
            "Local file has {} extra byte(s) beyond on-chain content.",
            r.leftover_local_bytes
        );
    }
    let verdict = match r.verdict {
        Verdict::Match => "all chunks verified against on-chain data",
        Verdict::Mismatch => "chunks do not match",
        Verdict::Inconclusive => "no chunks anchored for this survey",
        Verdict::Pending if r.cancelled => "cancelled before completion",
        Verdict::Pending => "incomplete",
    };
    println!("Verdict: {}", verdict);
}

pub async fn run_chunks(
    source: HttpAnchorSource,
    survey_id: u64,
    path: PathBuf,
    json: bool,
) -> Result<bool> {
    let result = match verify_with_progress(source, survey_id, path).await {
        Ok(r) => r,
        Err(err) => {
            if let Some(partial) = err.partial() {
                eprintln!(
                    "aborted after {} of {} chunk(s)",
                    partial.checked_chunks, partial.total_chunks
                );
            }
            return Err(err).context("chunk verification failed");
        }
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_chunk_result(&result);
    }
    Ok(result.verdict == Verdict::Match)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorcheck_core::verifier::{ChunkDescriptor, ProgressObserver};

    #[tokio::test(flavor = "multi_thread")]
    async fn every_progress_update_reaches_printer() {
        let total = 200u64;
        let (tx, mut rx) = mpsc::channel::<ChunkProgress>(1);
        let producer = tokio::task::spawn_blocking(move || {
            let mut observer = forward_progress(tx);
            for i in 0..total {
                observer.on_chunk(&ChunkProgress {
                    chunk: ChunkDescriptor::new(7, i),
                    matched: true,
                    checked_chunks: i + 1,
                    total_chunks: total,
                    mismatches: 0,
                });
            }
        });

        let mut seen = Vec::new();
        while let Some(p) = rx.recv().await {
            seen.push(p.checked_chunks);
        }
        producer.await.unwrap();

        assert_eq!(seen.len() as u64, total);
        assert_eq!(seen.last(), Some(&total));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }
}
