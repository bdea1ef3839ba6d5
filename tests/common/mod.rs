//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use faceswap_proxy::config::AppConfig;
use faceswap_proxy::http::HttpServer;
use faceswap_proxy::lifecycle::Shutdown;
use reqwest::multipart::{Form, Part};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How the mock provider answers.
#[derive(Clone)]
#[allow(dead_code)]
pub enum MockReply {
    /// Send a full response.
    Respond {
        status: u16,
        content_type: &'static str,
        body: Vec<u8>,
    },
    /// Read the request and never answer.
    Hang,
    /// Read the request and close the connection without a response.
    Drop,
}

/// A raw request as seen by the mock provider.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.head
            .lines()
            .find(|line| line.to_ascii_lowercase().starts_with(&prefix))
            .map(|line| line[prefix.len()..].trim().to_string())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[allow(dead_code)]
pub type Captured = Arc<Mutex<Vec<CapturedRequest>>>;

/// Start a programmable mock provider on an ephemeral port.
#[allow(dead_code)]
pub async fn start_mock_provider(reply: MockReply) -> (SocketAddr, Captured) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let store = captured.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let reply = reply.clone();
                    let store = store.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        store.lock().unwrap().push(request);

                        match reply {
                            MockReply::Respond {
                                status,
                                content_type,
                                body,
                            } => {
                                let head = format!(
                                    "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                                    status,
                                    content_type,
                                    body.len()
                                );
                                let _ = socket.write_all(head.as_bytes()).await;
                                let _ = socket.write_all(&body).await;
                                let _ = socket.shutdown().await;
                            }
                            MockReply::Hang => {
                                tokio::time::sleep(Duration::from_secs(600)).await;
                            }
                            MockReply::Drop => {
                                drop(socket);
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, captured)
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let lower = head.to_ascii_lowercase();
    let content_length = lower
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    let chunked = lower.contains("transfer-encoding: chunked");

    loop {
        let body_len = buf.len() - head_end;
        let complete = match content_length {
            Some(len) => body_len >= len,
            None if chunked => buf.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if complete {
            break;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        head,
        body: buf[head_end..].to_vec(),
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing at `provider`, with test-friendly settings.
pub fn test_config(provider: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.bind_address = "127.0.0.1:0".into();
    config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/public").into();
    config.provider.url = format!("http://{}/v1/swap", provider);
    config.provider.api_key = "test-key".into();
    config.provider.system_proxy = false;
    config
}

/// Start the proxy on an ephemeral port. Keep the returned `Shutdown` alive
/// for the duration of the test.
pub async fn spawn_server(config: AppConfig) -> (String, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (format!("http://{}", addr), shutdown)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Multipart form with the given files under `source` / `target`.
pub fn image_form(source: Option<Vec<u8>>, target: Option<Vec<u8>>) -> Form {
    let mut form = Form::new();
    if let Some(bytes) = source {
        form = form.part(
            "source",
            Part::bytes(bytes).file_name("face.png").mime_str("image/png").unwrap(),
        );
    }
    if let Some(bytes) = target {
        form = form.part(
            "target",
            Part::bytes(bytes).file_name("scene.jpg").mime_str("image/jpeg").unwrap(),
        );
    }
    form
}

pub fn fake_jpeg(fill: u8, len: usize) -> Vec<u8> {
    let mut bytes = vec![0xff, 0xd8, 0xff, 0xe0];
    bytes.extend(std::iter::repeat(fill).take(len.saturating_sub(6)));
    bytes.extend_from_slice(&[0xff, 0xd9]);
    bytes
}
