//! Stub HTTP server for integration tests, served with hyper.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How the stub answers a request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Status code and JSON body.
    Json(u16, String),
    /// Never answer.
    Hang,
    /// Drop the connection without a response.
    Close,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Json(200, body.to_string())
    }
}

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    /// Request line and headers, lower-cased.
    pub head: String,
    pub body: String,
}

type Handler = dyn Fn(&str, &str) -> Reply + Send + Sync;

pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<Mutex<Vec<Hit>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Start a stub that answers with `handler(method, path)`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let task_hits = hits.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let io = TokioIo::new(stream);
                let hits = task_hits.clone();
                let handler = handler.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let hits = hits.clone();
                        let handler = handler.clone();
                        respond(req, hits, handler)
                    });
                    // `Reply::Close` surfaces here as a service error.
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        Self { addr, hits, task }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    /// Number of requests received for `path`.
    pub fn count(&self, path: &str) -> usize {
        self.hits().iter().filter(|h| h.path == path).count()
    }

    /// Wait until `path` has been hit at least `n` times.
    pub async fn wait_for(&self, path: &str, n: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.count(path) >= n {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.count(path) >= n
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn respond(
    req: Request<Incoming>,
    hits: Arc<Mutex<Vec<Hit>>>,
    handler: Arc<Handler>,
) -> Result<Response<Full<Bytes>>, BoxError> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let mut head = format!("{} {}\n", method, path);
    for (name, value) in req.headers() {
        head.push_str(&format!("{}: {}\n", name, value.to_str().unwrap_or_default()));
    }
    let head = head.to_lowercase();

    let body = req.into_body().collect().await?.to_bytes();
    let body = String::from_utf8_lossy(&body).to_string();

    let reply = handler(&method, &path);
    hits.lock().unwrap().push(Hit {
        method,
        path,
        head,
        body,
    });

    match reply {
        Reply::Json(code, body) => Ok(Response::builder()
            .status(code)
            .header("Content-Type", "application/json")
            // One request per connection, so a dropped one is never retried.
            .header("Connection", "close")
            .body(Full::new(Bytes::from(body)))?),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err("stub gave up waiting".into())
        }
        Reply::Close => Err("stub dropped the connection".into()),
    }
}

/// A URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub const STATUS_CRITICAL: &str = r#"{
    "status": "CRITICAL",
    "last_check": "2024-05-01T12:30:45.123456",
    "uptime_start": "2024-05-01T12:00:00",
    "total_crashes": 3,
    "last_crash": "2024-05-01T12:30:40",
    "last_heal": null,
    "latency_ms": 0
}"#;

pub const HEARTBEAT: &str = r#"[
    {"timestamp": "2024-05-01T12:30:43", "latency": 3.2, "status": "up"},
    {"timestamp": "2024-05-01T12:30:44", "latency": 0, "status": "down"}
]"#;

pub const LOGS: &str = r#"[
    {"timestamp": "2024-05-01T12:30:40", "type": "CRASH", "message": "[CRASH] target down"}
]"#;

/// A healthy reporting API.
pub fn reporting_api(_method: &str, path: &str) -> Reply {
    match path {
        "/api/status" => Reply::ok(STATUS_CRITICAL),
        "/api/heartbeat" => Reply::ok(HEARTBEAT),
        "/api/logs" => Reply::ok(LOGS),
        "/api/event" => Reply::ok(r#"{"ok": true}"#),
        _ => Reply::Json(404, "{}".to_string()),
    }
}
