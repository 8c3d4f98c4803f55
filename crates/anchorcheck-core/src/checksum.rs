//! Whole-file SHA-256 digest and comparison against an on-chain checksum.
//!
//! The digest is computed on demand and independently of chunk
//! verification; it streams the file so memory stays bounded.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::VerifyError;

const BUF_SIZE: usize = 64 * 1024;

/// Outcome of comparing a local digest with an on-chain checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestOutcome {
    Match,
    Mismatch,
}

/// Compute SHA-256 of everything `reader` yields, as lowercase hex.
pub fn sha256_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String, VerifyError> {
    let hashing = |source| VerifyError::Hashing {
        path: path.to_path_buf(),
        source,
    };
    let f = File::open(path).map_err(hashing)?;
    let digest = sha256_reader(f).map_err(hashing)?;
    tracing::debug!(path = %path.display(), %digest, "computed sha256");
    Ok(digest)
}

/// Compare two hex digests, ignoring case and an optional `0x` prefix.
///
/// Both sides must be present; an empty side means the caller has not yet
/// hashed the file or loaded the record.
pub fn compare_digest(local_hex: &str, on_chain_hex: &str) -> Result<DigestOutcome, VerifyError> {
    let local = normalize_hex(local_hex);
    let on_chain = normalize_hex(on_chain_hex);
    if local.is_empty() || on_chain.is_empty() {
        return Err(VerifyError::Precondition(
            "select a file and load the on-chain record first".to_string(),
        ));
    }
    if local.eq_ignore_ascii_case(on_chain) {
        Ok(DigestOutcome::Match)
    } else {
        Ok(DigestOutcome::Mismatch)
    }
}

fn normalize_hex(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HELLO_SHA: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

    #[test]
    fn sha256_path_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let digest = sha256_path(f.path()).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        assert_eq!(sha256_path(f.path()).unwrap(), HELLO_SHA);
    }

    #[test]
    fn sha256_is_deterministic_across_buffer_boundaries() {
        let body: Vec<u8> = (0u8..=255).cycle().take(BUF_SIZE * 3 + 17).collect();
        let a = sha256_reader(&body[..]).unwrap();
        let b = sha256_reader(&body[..]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, hex::encode(Sha256::digest(&body)));
    }

    #[test]
    fn sha256_path_missing_file_is_hashing_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = sha256_path(&dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, VerifyError::Hashing { .. }));
    }

    #[test]
    fn compare_is_case_insensitive() {
        let upper = HELLO_SHA.to_ascii_uppercase();
        assert_eq!(
            compare_digest(HELLO_SHA, &upper).unwrap(),
            DigestOutcome::Match
        );
    }

    #[test]
    fn compare_ignores_0x_prefix() {
        let prefixed = format!("0x{}", HELLO_SHA);
        assert_eq!(
            compare_digest(&prefixed, HELLO_SHA).unwrap(),
            DigestOutcome::Match
        );
    }

    #[test]
    fn compare_detects_mismatch() {
        let other = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(
            compare_digest(HELLO_SHA, other).unwrap(),
            DigestOutcome::Mismatch
        );
    }

    #[test]
    fn compare_requires_both_sides() {
        assert!(matches!(
            compare_digest("", HELLO_SHA),
            Err(VerifyError::Precondition(_))
        ));
        assert!(matches!(
            compare_digest(HELLO_SHA, "  "),
            Err(VerifyError::Precondition(_))
        ));
        assert!(matches!(
            compare_digest(HELLO_SHA, "0x"),
            Err(VerifyError::Precondition(_))
        ));
    }
}
