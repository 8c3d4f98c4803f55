//! Collaborators that supply anchored data: the on-chain record, the chunk
//! count and the raw chunk bytes for a survey.
//!
//! The verifier only depends on the `AnchorSource` trait; `HttpAnchorSource`
//! talks to the ESIMS REST backend over libcurl.

mod http;
#[cfg(test)]
pub(crate) mod memory;
mod parse;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::retry::TransportError;

pub use http::HttpAnchorSource;

/// Address the contract reports for surveys that were never recorded.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Metadata anchored on-chain for one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnChainRecord {
    /// SHA-256 of the survey file as hex (may carry a `0x` prefix).
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter: Option<String>,
    /// Any further fields the backend returns, kept for display.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl OnChainRecord {
    /// A record whose submitter is the zero address was never written.
    pub fn is_empty_slot(&self) -> bool {
        self.submitter
            .as_deref()
            .map(|s| s.trim().eq_ignore_ascii_case(ZERO_ADDRESS))
            .unwrap_or(false)
    }
}

/// Survey entry from `GET surveys/`, reduced to what verification needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub has_onchain_record: bool,
    #[serde(default)]
    pub has_onchain_file: bool,
}

impl SurveySummary {
    /// True if either verification method has something to check against.
    pub fn is_verifiable(&self) -> bool {
        self.has_onchain_record || self.has_onchain_file
    }
}

/// Remote store of anchored survey data.
///
/// Implementations are synchronous; call from `spawn_blocking` when used
/// from async code.
pub trait AnchorSource {
    /// The on-chain record for `survey_id`, or `None` if none exists.
    fn on_chain_record(&self, survey_id: u64) -> Result<Option<OnChainRecord>, TransportError>;

    /// Number of raw chunks anchored for `survey_id` (0 if none).
    fn chunk_count(&self, survey_id: u64) -> Result<u64, TransportError>;

    /// Raw bytes of chunk `index` (0-based). Chunk lengths may differ.
    fn download_chunk(&self, survey_id: u64, index: u64) -> Result<Vec<u8>, TransportError>;

    /// All surveys visible to the caller.
    fn list_surveys(&self) -> Result<Vec<SurveySummary>, TransportError>;
}

impl<S: AnchorSource + ?Sized> AnchorSource for &S {
    fn on_chain_record(&self, survey_id: u64) -> Result<Option<OnChainRecord>, TransportError> {
        (**self).on_chain_record(survey_id)
    }

    fn chunk_count(&self, survey_id: u64) -> Result<u64, TransportError> {
        (**self).chunk_count(survey_id)
    }

    fn download_chunk(&self, survey_id: u64, index: u64) -> Result<Vec<u8>, TransportError> {
        (**self).download_chunk(survey_id, index)
    }

    fn list_surveys(&self) -> Result<Vec<SurveySummary>, TransportError> {
        (**self).list_surveys()
    }
}
