#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Request line target plus lowercased header lines
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub target: String,
    pub headers: Vec<String>,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }

    pub fn param(&self, name: &str) -> Option<String> {
        let url = url::Url::parse(&format!("http://localhost{}", self.target)).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    pub fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_lowercase());
        self.headers
            .iter()
            .find(|h| h.starts_with(&prefix))
            .map(|h| h[prefix.len()..].trim().to_string())
    }
}

/// Minimal HTTP/1.1 responder on a background thread. One response per connection.
pub struct TestServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub fn start<H>(handler: H) -> Self
    where
        H: Fn(&RecordedRequest) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Ok(read_half) = stream.try_clone() else { continue };
                let mut reader = BufReader::new(read_half);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }

                let mut headers = Vec::new();
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line) {
                        Ok(0) | Err(_) => break,
                        Ok(_) if line == "\r\n" || line == "\n" => break,
                        Ok(_) => headers.push(line.trim_end().to_lowercase()),
                    }
                }

                let request = RecordedRequest {
                    target: request_line
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or("/")
                        .to_string(),
                    headers,
                };
                let (status, body) = handler(&request);
                log.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            url: format!("http://{}", addr),
            requests,
        }
    }

    /// Serves `total` posts in the flat envelope, honouring `page` and `limit`/`per_page`
    pub fn paged(total: u64) -> Self {
        Self::start(move |request| (200, listing_body(total, request)))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

pub fn listing_body(total: u64, request: &RecordedRequest) -> String {
    let page: u64 = request.param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let size: u64 = request
        .param("limit")
        .or_else(|| request.param("per_page"))
        .and_then(|p| p.parse().ok())
        .unwrap_or(9);

    let start = (page - 1) * size + 1;
    let end = (page * size).min(total);
    let items: Vec<serde_json::Value> = (start..=end)
        .map(|id| {
            serde_json::json!({
                "id": id,
                "heading": format!("Post {}", id),
                "author": {"name": "Ana"},
                "created_at": "2024-03-01T10:00:00Z",
                "tags": ["rust"]
            })
        })
        .collect();
    let last_page = total.div_ceil(size).max(1);

    serde_json::json!({
        "success": true,
        "data": items,
        "meta": {
            "current_page": page,
            "per_page": size,
            "total": total,
            "last_page": last_page
        }
    })
    .to_string()
}
