//! `anchorcheck digest` - compute SHA-256 of a file.

use anyhow::Result;
use anchorcheck_core::checksum;
use std::path::Path;

/// Compute and print SHA-256 of the given file.
pub async fn run_digest(path: &Path) -> Result<bool> {
    let digest = checksum::sha256_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(true)
}
