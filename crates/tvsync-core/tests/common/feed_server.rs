//! Minimal HTTP/1.1 server for feed download tests.
//!
//! Answers each GET with the next status from a script; once the script is
//! exhausted the last status repeats. A 200 carries the configured body.
//! Every connection is closed after one response.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub struct FeedServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl FeedServer {
    /// Number of requests answered so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// URL of a file below the server root.
    pub fn file_url(&self, name: &str) -> String {
        format!("{}{}", self.url, name)
    }
}

/// Server answering 200 with `body` to every request.
pub fn start(body: &[u8]) -> FeedServer {
    start_scripted(vec![200], body)
}

/// Server answering with `statuses` in order; the last one repeats.
pub fn start_scripted(statuses: Vec<u16>, body: &[u8]) -> FeedServer {
    start_with_headers(statuses, body, &[])
}

/// Like `start_scripted` but adds `headers` (e.g. "Content-Encoding: gzip")
/// to every response.
pub fn start_with_headers(statuses: Vec<u16>, body: &[u8], headers: &[&str]) -> FeedServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let script = Arc::new(Mutex::new(statuses));
    let body = Arc::new(body.to_vec());
    let extra: Arc<String> = Arc::new(headers.iter().map(|h| format!("{}\r\n", h)).collect());
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let status = {
                let script = script.lock().unwrap();
                script.get(n).or(script.last()).copied().unwrap_or(200)
            };
            let body = Arc::clone(&body);
            let extra = Arc::clone(&extra);
            thread::spawn(move || handle(stream, status, &body, &extra));
        }
    });
    FeedServer {
        url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

/// Server that sends a 200 with `body` split into `chunks` pieces, pausing
/// `gap` before each piece.
pub fn start_trickle(body: &[u8], chunks: usize, gap: Duration) -> FeedServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let body = Arc::new(body.to_vec());
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            counter.fetch_add(1, Ordering::SeqCst);
            let body = Arc::clone(&body);
            thread::spawn(move || {
                let mut buf = [0u8; 8192];
                if !matches!(stream.read(&mut buf), Ok(n) if n > 0) {
                    return;
                }
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let size = body.len().div_ceil(chunks.max(1)).max(1);
                for piece in body.chunks(size) {
                    thread::sleep(gap);
                    if stream.write_all(piece).and_then(|()| stream.flush()).is_err() {
                        return;
                    }
                }
            });
        }
    });
    FeedServer {
        url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

fn handle(mut stream: std::net::TcpStream, status: u16, body: &[u8], extra_headers: &str) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    let payload: &[u8] = if status == 200 { body } else { b"error" };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: text/plain\r\n{}Connection: close\r\n\r\n",
        status,
        reason(status),
        payload.len(),
        extra_headers
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(payload);
}
