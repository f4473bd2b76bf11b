//! In-process HTTP server for client and pipeline tests.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A canned response. The first route whose path matches (and whose
/// `body_contains`, if set, appears in the request body) answers.
#[derive(Clone)]
pub(crate) struct Route {
    pub path: &'static str,
    pub body_contains: Option<&'static str>,
    pub status: u16,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(path: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            path,
            body_contains: None,
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(path: &'static str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            ..Self::ok(path, body)
        }
    }

    pub fn when_body(mut self, needle: &'static str) -> Self {
        self.body_contains = Some(needle);
        self
    }
}

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub(crate) struct Seen {
    pub path: String,
    pub headers: String,
    pub body: String,
}

pub(crate) struct MockServer {
    pub url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let seen_task = Arc::clone(&seen);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let seen = Arc::clone(&seen_task);
                tokio::spawn(async move {
                    serve(stream, &routes, &seen).await;
                });
            }
        });

        Self { url, seen, handle }
    }

    /// Requests received so far.
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    /// Number of requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.seen().iter().filter(|s| s.path == path).count()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Returns a URL on which nothing is listening.
pub(crate) async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

async fn serve(mut stream: TcpStream, routes: &[Route], seen: &Mutex<Vec<Seen>>) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };

    let route = routes.iter().find(|r| {
        r.path == request.path
            && r.body_contains
                .is_none_or(|needle| request.body.contains(needle))
    });
    seen.lock().unwrap().push(request);

    let (status, body) = match route {
        Some(r) => (r.status, r.body.clone()),
        None => (404, b"not found".to_vec()),
    };

    let head = format!(
        "HTTP/1.1 {status} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(&body).await;
    let _ = stream.shutdown().await;
}

async fn read_request(stream: &mut TcpStream) -> Option<Seen> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(body_start + content_length);

    let mut lines = head.lines();
    let path = lines.next()?.split_whitespace().nth(1)?.to_string();
    let headers = lines.collect::<Vec<_>>().join("\n");

    Some(Seen {
        path,
        headers,
        body: String::from_utf8_lossy(&buf[body_start..body_end]).to_string(),
    })
}
