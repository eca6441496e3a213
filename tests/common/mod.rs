//! In-process stand-in for the layout-parsing service.

#![allow(dead_code)]

use axum::{http::header, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A running mock answering every `POST /layout-parsing` with a canned reply.
pub struct MockService {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<Value>>>,
}

impl MockService {
    /// Serve `body` with `status` until the test's runtime shuts down.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).expect("valid status");
        let body: String = body.into();
        let hits = Arc::new(AtomicUsize::new(0));
        let last_request = Arc::new(Mutex::new(None));

        let app = Router::new().route(
            "/layout-parsing",
            post({
                let hits = hits.clone();
                let last_request = last_request.clone();
                move |Json(request): Json<Value>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    *last_request.lock().unwrap() = Some(request);
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock service");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("mock service error: {e}");
            }
        });

        Self {
            addr,
            hits,
            last_request,
        }
    }

    /// Serve `body` as JSON with status 200.
    pub async fn ok(body: &Value) -> Self {
        Self::start(200, serde_json::to_string_pretty(body).unwrap()).await
    }

    pub fn host(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.last_request.lock().unwrap().clone()
    }
}

/// Names of the `page_*` entries directly under `dir` (empty if `dir` is missing).
pub fn page_entries(dir: &std::path::Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("page_"))
        .collect();
    names.sort();
    names
}
