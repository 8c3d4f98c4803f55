//! In-memory `AnchorSource` for unit tests.

use std::cell::Cell;
use std::collections::HashMap;

use super::{AnchorSource, OnChainRecord, SurveySummary};
use crate::retry::TransportError;

#[derive(Debug, Default)]
pub(crate) struct MemorySource {
    pub chunks: HashMap<u64, Vec<Vec<u8>>>,
    pub records: HashMap<u64, OnChainRecord>,
    /// (survey, index) whose download fails with HTTP 500.
    pub fail_chunk: Option<(u64, u64)>,
    /// Fail the count query with a connection-style error.
    pub fail_count: bool,
    /// Report this count regardless of the stored chunks.
    pub count_override: Option<u64>,
    pub downloads: Cell<u64>,
}

impl MemorySource {
    pub fn with_chunks(survey_id: u64, chunks: Vec<Vec<u8>>) -> Self {
        let mut s = Self::default();
        s.chunks.insert(survey_id, chunks);
        s
    }

    pub fn with_record(mut self, survey_id: u64, checksum: &str) -> Self {
        self.records.insert(
            survey_id,
            OnChainRecord {
                checksum: Some(checksum.to_string()),
                survey_id: Some(survey_id),
                project_id: None,
                ipfs_cid: None,
                submitter: Some("0x1111111111111111111111111111111111111111".to_string()),
                extra: Default::default(),
            },
        );
        self
    }
}

impl AnchorSource for MemorySource {
    fn on_chain_record(&self, survey_id: u64) -> Result<Option<OnChainRecord>, TransportError> {
        Ok(self.records.get(&survey_id).cloned())
    }

    fn chunk_count(&self, survey_id: u64) -> Result<u64, TransportError> {
        if self.fail_count {
            return Err(TransportError::Http {
                code: 502,
                detail: None,
            });
        }
        if let Some(count) = self.count_override {
            return Ok(count);
        }
        Ok(self
            .chunks
            .get(&survey_id)
            .map(|c| c.len() as u64)
            .unwrap_or(0))
    }

    fn download_chunk(&self, survey_id: u64, index: u64) -> Result<Vec<u8>, TransportError> {
        self.downloads.set(self.downloads.get() + 1);
        if self.fail_chunk == Some((survey_id, index)) {
            return Err(TransportError::Http {
                code: 500,
                detail: Some("chunk read failed".to_string()),
            });
        }
        self.chunks
            .get(&survey_id)
            .and_then(|c| c.get(index as usize))
            .cloned()
            .ok_or(TransportError::Http {
                code: 404,
                detail: None,
            })
    }

    fn list_surveys(&self) -> Result<Vec<SurveySummary>, TransportError> {
        let mut ids: Vec<u64> = self.chunks.keys().chain(self.records.keys()).copied().collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids
            .into_iter()
            .map(|id| SurveySummary {
                id,
                title: format!("survey {}", id),
                status: None,
                has_onchain_record: self.records.contains_key(&id),
                has_onchain_file: self.chunks.get(&id).map_or(false, |c| !c.is_empty()),
            })
            .collect())
    }
}
