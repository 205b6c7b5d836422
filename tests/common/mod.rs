//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;

/// Canned response served by the programmable backend.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// `Some(n)` sends `Content-Length: n` regardless of the body size;
    /// `None` omits the header and ends the body by closing the connection.
    pub content_length: Option<usize>,
    pub delay: Duration,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status,
            content_length: Some(body.len()),
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    pub fn status(status: u16) -> Self {
        Self::new(status, format!("{{\"error\":\"status {}\"}}", status))
    }

    pub fn without_content_length(mut self) -> Self {
        self.content_length = None;
        self
    }

    pub fn declared_length(mut self, len: usize) -> Self {
        self.content_length = Some(len);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request as received by the backend.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
    pub received_at: Instant,
}

impl CapturedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case(name) {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
    }

    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }
}

/// Handle to a running mock backend.
#[derive(Clone)]
pub struct MockServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockServer {
    pub fn url(&self) -> String {
        format!("http://{}/api/v1/sign", self.addr)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a backend that answers the n-th request (0-based) with `f(n)`.
pub async fn start_programmable_backend<F>(f: F) -> MockServer
where
    F: Fn(usize) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let captured = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let captured = captured.clone();
                    tokio::spawn(async move {
                        handle_connection(socket, f, captured).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockServer { addr, requests }
}

/// Start a backend that always answers with `response`.
#[allow(dead_code)]
pub async fn start_mock_backend(response: MockResponse) -> MockServer {
    start_programmable_backend(move |_| response.clone()).await
}

async fn handle_connection<F>(
    mut socket: TcpStream,
    f: Arc<F>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
) where
    F: Fn(usize) -> MockResponse + Send + Sync + 'static,
{
    let Some(request) = read_request(&mut socket).await else {
        return;
    };

    let index = {
        let mut requests = captured.lock().unwrap();
        requests.push(request);
        requests.len() - 1
    };
    let response = f(index);

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let mut head = format!("HTTP/1.1 {}\r\n", status_line(response.status));
    head.push_str("Content-Type: application/json\r\n");
    if let Some(len) = response.content_length {
        head.push_str(&format!("Content-Length: {}\r\n", len));
    }
    head.push_str("Connection: close\r\n\r\n");

    let _ = socket.write_all(head.as_bytes()).await;
    let _ = socket.write_all(&response.body).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };
    let received_at = Instant::now();

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        head,
        body: buf[head_end..].to_vec(),
        received_at,
    })
}

fn status_line(status: u16) -> String {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    format!("{} {}", status, reason)
}

/// JSON object of exactly `len` bytes.
#[allow(dead_code)]
pub fn json_body_of_len(len: usize) -> Vec<u8> {
    let overhead = r#"{"signature":""}"#.len();
    assert!(len >= overhead);
    format!(r#"{{"signature":"{}"}}"#, "a".repeat(len - overhead)).into_bytes()
}
