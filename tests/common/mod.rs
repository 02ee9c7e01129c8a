//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use catalog_proxy::config::ProxyConfig;
use catalog_proxy::http::HttpServer;
use catalog_proxy::lifecycle::Shutdown;

/// Request targets ("/path?query") seen by a mock upstream, in order.
pub type SeenRequests = Arc<Mutex<Vec<String>>>;

/// Start a mock upstream serving fixed JSON bodies per path.
///
/// Requests are matched on the path component only; the full target is
/// recorded so tests can assert on the translated query string. Unknown
/// paths get a 404.
pub async fn start_mock_upstream(
    addr: SocketAddr,
    routes: Vec<(&'static str, u16, String)>,
) -> SeenRequests {
    let listener = TcpListener::bind(addr).await.unwrap();
    let seen: SeenRequests = Arc::new(Mutex::new(Vec::new()));
    let seen_accept = seen.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let routes = routes.clone();
                    let seen = seen_accept.clone();
                    tokio::spawn(async move {
                        let Some(target) = read_target(&mut socket).await else {
                            return;
                        };
                        seen.lock().unwrap().push(target.clone());

                        let path = target.split('?').next().unwrap_or("");
                        let (status, body) = routes
                            .iter()
                            .find(|(route_path, _, _)| *route_path == path)
                            .map(|(_, status, body)| (*status, body.clone()))
                            .unwrap_or((404, "[]".to_string()));
                        write_json(&mut socket, status, &body).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    seen
}

/// Start a mock upstream whose response is computed from the request
/// target. Used for per-call variance (failures, delays).
#[allow(dead_code)]
pub async fn start_programmable_upstream<F, Fut>(addr: SocketAddr, f: F) -> SeenRequests
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let seen: SeenRequests = Arc::new(Mutex::new(Vec::new()));
    let seen_accept = seen.clone();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let seen = seen_accept.clone();
                    tokio::spawn(async move {
                        let Some(target) = read_target(&mut socket).await else {
                            return;
                        };
                        seen.lock().unwrap().push(target.clone());
                        let (status, body) = f(target).await;
                        write_json(&mut socket, status, &body).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    seen
}

/// Start a proxy bound to `proxy_addr` forwarding to `upstream`. Returns
/// the shutdown handle; tests trigger it when done.
pub async fn start_proxy(proxy_addr: SocketAddr, upstream: &str) -> Shutdown {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = proxy_addr.to_string();
    config.upstream.base_url = upstream.to_string();

    let shutdown = Shutdown::new();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).expect("server construction failed");
    let listener = TcpListener::bind(proxy_addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

/// Plain client with environment proxies disabled.
#[allow(dead_code)]
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn read_target(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    // "GET /path?query HTTP/1.1"
    request_line.split_whitespace().nth(1).map(str::to_string)
}

async fn write_json(socket: &mut TcpStream, status: u16, body: &str) {
    let status_text = match status {
        200 => "200 OK",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
}
