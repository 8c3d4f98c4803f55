//! `AnchorSource` over the ESIMS REST backend, using the curl crate (libcurl).
//!
//! Endpoints, relative to the configured API base:
//! - `surveys/` - survey list
//! - `surveys/{id}/onchain-record/` - record JSON, 404 when absent
//! - `surveys/{id}/chunks/` - `{"count": n}`
//! - `surveys/{id}/chunks/{i}/download/` - raw chunk bytes

use std::time::Duration;
use url::Url;

use super::parse;
use super::{AnchorSource, OnChainRecord, SurveySummary};
use crate::config::CheckConfig;
use crate::retry::{run_with_retry, RetryPolicy, TransportError};

/// Blocking HTTP client for the anchoring backend.
#[derive(Debug, Clone)]
pub struct HttpAnchorSource {
    base: Url,
    token: Option<String>,
    connect_timeout: Duration,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpAnchorSource {
    /// Client for `api_base` with default timeouts and retry policy.
    /// A missing trailing slash is added so relative endpoints join under it.
    pub fn new(api_base: &str) -> Result<Self, TransportError> {
        let mut base = api_base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            base: Url::parse(&base)?,
            token: None,
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
        })
    }

    pub fn from_config(cfg: &CheckConfig) -> Result<Self, TransportError> {
        let retry = cfg
            .retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default();
        Ok(Self::new(&cfg.api_base)?
            .with_token(cfg.token.clone())
            .with_timeouts(
                Duration::from_secs(cfg.http.connect_timeout_secs),
                Duration::from_secs(cfg.http.timeout_secs),
            )
            .with_retry(retry))
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, total: Duration) -> Self {
        self.connect_timeout = connect;
        self.timeout = total;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        Ok(self.base.join(path)?)
    }

    /// GET `path` with retries; returns the body of a 2xx response.
    fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.endpoint(path)?;
        run_with_retry(&self.retry, || self.get_once(&url))
    }

    fn get_once(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let mut list = curl::easy::List::new();
        list.append("Accept: application/json, application/octet-stream, */*")?;
        if let Some(token) = &self.token {
            list.append(&format!("Authorization: Bearer {}", token.trim()))?;
        }
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            tracing::debug!(url = %url, code, "backend returned error status");
            return Err(TransportError::Http {
                code,
                detail: parse::error_detail(&body),
            });
        }
        Ok(body)
    }
}

impl AnchorSource for HttpAnchorSource {
    fn on_chain_record(&self, survey_id: u64) -> Result<Option<OnChainRecord>, TransportError> {
        match self.get(&format!("surveys/{}/onchain-record/", survey_id)) {
            Ok(body) => parse::parse_record(&body),
            Err(TransportError::Http { code: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn chunk_count(&self, survey_id: u64) -> Result<u64, TransportError> {
        let body = self.get(&format!("surveys/{}/chunks/", survey_id))?;
        parse::parse_chunk_count(&body)
    }

    fn download_chunk(&self, survey_id: u64, index: u64) -> Result<Vec<u8>, TransportError> {
        self.get(&format!("surveys/{}/chunks/{}/download/", survey_id, index))
    }

    fn list_surveys(&self) -> Result<Vec<SurveySummary>, TransportError> {
        let body = self.get("surveys/")?;
        parse::parse_surveys(&body)
    }
}
