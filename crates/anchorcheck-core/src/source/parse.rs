//! Decode backend response bodies.

use serde::Deserialize;
use serde_json::Value;

use super::{OnChainRecord, SurveySummary};
use crate::retry::TransportError;

/// Upper bound on a believable chunk count. Anything above it is a broken
/// response, not a survey.
pub(crate) const MAX_CHUNK_COUNT: u64 = u32::MAX as u64;

/// Parse `{"count": n}`. The backend may send the count as a number or a
/// numeric string. A missing count, `null`, or a string without leading
/// digits means zero chunks. Negative, fractional or oversized counts are
/// decode errors.
pub(crate) fn parse_chunk_count(body: &[u8]) -> Result<u64, TransportError> {
    let v: Value = serde_json::from_slice(body)?;
    let count = match v.get("count") {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| bad_count(format!("chunk count {n} is not a non-negative integer")))?,
        Some(Value::String(s)) => leading_digits(s)?,
        Some(other) => return Err(bad_count(format!("chunk count has unexpected type: {other}"))),
    };
    if count > MAX_CHUNK_COUNT {
        return Err(bad_count(format!(
            "chunk count {count} exceeds the limit of {MAX_CHUNK_COUNT}"
        )));
    }
    Ok(count)
}

fn leading_digits(s: &str) -> Result<u64, TransportError> {
    let s = s.trim();
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return Ok(0);
    }
    s[..end]
        .parse()
        .map_err(|_| bad_count(format!("chunk count {:?} is out of range", &s[..end])))
}

fn bad_count(msg: String) -> TransportError {
    TransportError::Decode(<serde_json::Error as serde::de::Error>::custom(msg))
}

/// Parse an on-chain record. An empty body, `null`, or a zero-address
/// submitter all mean there is no record.
pub(crate) fn parse_record(body: &[u8]) -> Result<Option<OnChainRecord>, TransportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let record: Option<OnChainRecord> = serde_json::from_slice(body)?;
    Ok(record.filter(|r| !r.is_empty_slot()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SurveyList {
    Plain(Vec<SurveySummary>),
    Paged { results: Vec<SurveySummary> },
}

/// Parse `GET surveys/`, accepting either a bare array or a paginated page.
pub(crate) fn parse_surveys(body: &[u8]) -> Result<Vec<SurveySummary>, TransportError> {
    let list: SurveyList = serde_json::from_slice(body)?;
    Ok(match list {
        SurveyList::Plain(v) => v,
        SurveyList::Paged { results } => results,
    })
}

/// Extract the `detail` message from an error body, if there is one.
pub(crate) fn error_detail(body: &[u8]) -> Option<String> {
    let v: Value = serde_json::from_slice(body).ok()?;
    match v.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
