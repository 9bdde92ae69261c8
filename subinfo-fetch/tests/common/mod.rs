//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses by request path on a loopback port. Each
//! connection gets one response and is closed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A canned response.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub delay: Duration,
}

impl Canned {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::ok("")
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Handle to a running server.
pub struct TestServer {
    pub base: String,
    seen_agents: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Full URL for a path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// User-Agent values seen so far.
    pub fn user_agents(&self) -> Vec<String> {
        self.seen_agents.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Unknown paths answer 404.
/// The server runs until the process exits.
pub fn start(routes: Vec<(&str, Canned)>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Canned>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, canned)| (path.to_string(), canned))
            .collect(),
    );
    let seen_agents = Arc::new(Mutex::new(Vec::new()));

    let agents = Arc::clone(&seen_agents);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let agents = Arc::clone(&agents);
            thread::spawn(move || handle(stream, &routes, &agents));
        }
    });

    TestServer {
        base: format!("http://127.0.0.1:{port}/"),
        seen_agents,
    }
}

/// Returns a loopback URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/sub")
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Canned>, agents: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };

    let mut lines = request.lines();
    let path = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                agents.lock().unwrap().push(value.trim().to_string());
            }
        }
    }

    let canned = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Canned::status(404));
    if !canned.delay.is_zero() {
        thread::sleep(canned.delay);
    }

    let mut response = format!(
        "HTTP/1.1 {} Canned\r\nContent-Length: {}\r\nConnection: close\r\n",
        canned.status,
        canned.body.len()
    );
    for (name, value) in &canned.headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str("\r\n");
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(canned.body.as_bytes());
}
