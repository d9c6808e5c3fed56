//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a single static body for any GET. Paths starting with
//! `/redirect/` answer 302 to the remainder of the path. Every request is
//! counted so tests can assert that no network traffic happened.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    /// Status code for the body response.
    pub status: u16,
    /// If false, omit `Content-Length` and close the connection to end the body.
    pub content_length: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            content_length: true,
        }
    }
}

pub struct TestServer {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub base: String,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `body` with status 200.
pub fn start(body: Vec<u8>) -> TestServer {
    start_with_options(body, ServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            hits_srv.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || handle(stream, &body, opts));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: ServerOptions) {
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
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    if let Some(target) = path.strip_prefix("/redirect") {
        let response = format!(
            "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            target
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let reason = match opts.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let length = if opts.content_length {
        format!("Content-Length: {}\r\n", body.len())
    } else {
        String::new()
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\n{}Content-Type: application/x-tar\r\nConnection: close\r\n\r\n",
        opts.status, reason, length
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}
