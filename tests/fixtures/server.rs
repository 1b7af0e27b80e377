//! Minimal HTTP/1.1 server replaying canned responses, one per connection.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

pub struct FixtureServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl FixtureServer {
    /// Serves `responses` (status, body) in order, then stops accepting.
    pub fn start(path: &str, responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture server");
        let port = listener.local_addr().expect("local addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };

                let mut head = Vec::new();
                let mut buf = [0_u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&head);
                let request_line = head.lines().next().unwrap_or_default().to_string();
                recorded.lock().unwrap().push(request_line);

                let response = format!(
                    "HTTP/1.1 {} Fixture\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{}{}", port, path),
            requests,
            handle: Some(handle),
        }
    }

    /// Request lines received so far, e.g. `GET /path?a=b HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Decoded value of a query parameter in the `index`th request.
    pub fn query_value(&self, index: usize, key: &str) -> Option<String> {
        let requests = self.requests();
        let target = requests.get(index)?.split_whitespace().nth(1)?.to_string();
        let url = reqwest::Url::parse(&format!("http://fixture{}", target)).ok()?;
        url.query_pairs()
            .find(|(name, _)| &**name == key)
            .map(|(_, value)| value.into_owned())
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        // The accept loop may still be waiting when a test served fewer
        // requests than planned; detach instead of joining.
        drop(self.handle.take());
    }
}

/// A URL on a port nothing listens on.
pub fn unreachable_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind unused port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, path)
}
