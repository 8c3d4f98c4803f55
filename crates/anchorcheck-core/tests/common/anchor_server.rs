//! Minimal HTTP/1.1 server that mimics the anchoring backend for integration tests.
//!
//! Serves one survey: its on-chain record, chunk count and chunk bytes under
//! `/api/`. Every response closes the connection.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub survey_id: u64,
    pub title: String,
    pub chunks: Vec<Vec<u8>>,
    /// Checksum in the on-chain record; `None` answers 404.
    pub checksum: Option<String>,
    /// Chunk index whose download answers 500.
    pub fail_chunk: Option<u64>,
    /// If set, requests without `Authorization: Bearer <token>` get 401.
    pub token: Option<String>,
}

/// Starts a server in a background thread. Returns the API base URL
/// (e.g. "http://127.0.0.1:12345/api/"). The server runs until the process exits.
pub fn start(fixture: Fixture) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let fixture = Arc::new(fixture);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let fixture = Arc::clone(&fixture);
            thread::spawn(move || handle(stream, &fixture));
        }
    });
    format!("http://127.0.0.1:{}/api/", port)
}

fn handle(mut stream: std::net::TcpStream, fx: &Fixture) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path, bearer) = parse_request(request);
    let (status, content_type, body) = route(fx, method, path, bearer);
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

const JSON: &str = "application/json";

fn json(status: &'static str, value: String) -> (&'static str, &'static str, Vec<u8>) {
    (status, JSON, value.into_bytes())
}

fn route(
    fx: &Fixture,
    method: &str,
    path: &str,
    bearer: Option<&str>,
) -> (&'static str, &'static str, Vec<u8>) {
    if !method.eq_ignore_ascii_case("GET") {
        return json("405 Method Not Allowed", r#"{"detail":"Method not allowed."}"#.into());
    }
    if let Some(expected) = &fx.token {
        if bearer != Some(expected.as_str()) {
            return json(
                "401 Unauthorized",
                r#"{"detail":"Authentication credentials were not provided."}"#.into(),
            );
        }
    }

    let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
    match parts.as_slice() {
        ["api", "surveys"] => json(
            "200 OK",
            format!(
                r#"[{{"id":{},"title":"{}","status":"approved","has_onchain_record":{},"has_onchain_file":{}}},{{"id":{},"title":"draft","status":"submitted"}}]"#,
                fx.survey_id,
                fx.title,
                fx.checksum.is_some(),
                !fx.chunks.is_empty(),
                fx.survey_id + 1
            ),
        ),
        ["api", "surveys", id, rest @ ..] if id.parse::<u64>().ok() == Some(fx.survey_id) => {
            match rest {
                ["onchain-record"] => match &fx.checksum {
                    Some(c) => json(
                        "200 OK",
                        format!(
                            r#"{{"survey_id":{},"project_id":1,"ipfs_cid":"bafytest","checksum":"{}","submitter":"0x1111111111111111111111111111111111111111"}}"#,
                            fx.survey_id, c
                        ),
                    ),
                    None => json("404 Not Found", r#"{"detail":"No on-chain record"}"#.into()),
                },
                ["chunks"] => json("200 OK", format!(r#"{{"count":{}}}"#, fx.chunks.len())),
                ["chunks", idx, "download"] => {
                    let idx: u64 = idx.parse().unwrap_or(u64::MAX);
                    if fx.fail_chunk == Some(idx) {
                        return json(
                            "500 Internal Server Error",
                            r#"{"detail":"read readEncryptedChunk failed"}"#.into(),
                        );
                    }
                    match fx.chunks.get(idx as usize) {
                        Some(c) => ("200 OK", "application/octet-stream", c.clone()),
                        None => json("404 Not Found", r#"{"detail":"Not found."}"#.into()),
                    }
                }
                _ => json("404 Not Found", r#"{"detail":"Not found."}"#.into()),
            }
        }
        ["api", "surveys", _, "chunks"] => json("200 OK", r#"{"count":0}"#.into()),
        _ => json("404 Not Found", r#"{"detail":"Not found."}"#.into()),
    }
}

/// Returns (method, path, bearer token if any).
fn parse_request(request: &str) -> (&str, &str, Option<&str>) {
    let mut method = "";
    let mut path = "";
    let mut bearer = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            let mut it = line.split_whitespace();
            method = it.next().unwrap_or("");
            path = it.next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                bearer = value.trim().strip_prefix("Bearer ").map(str::trim);
            }
        }
    }
    (method, path, bearer)
}
