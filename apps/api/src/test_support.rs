//! Throwaway HTTP server standing in for the completion endpoint in tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

#[derive(Default)]
struct Captured {
    body: Option<Value>,
    authorization: Option<String>,
}

/// Answers every POST with a fixed status and body, counting hits and
/// remembering the last request.
pub struct CompletionStub {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    captured: Arc<Mutex<Captured>>,
}

impl CompletionStub {
    pub async fn spawn(status: StatusCode, body: String) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let captured = Arc::new(Mutex::new(Captured::default()));

        let handler = {
            let hits = hits.clone();
            let captured = captured.clone();
            move |headers: HeaderMap, request: String| {
                let hits = hits.clone();
                let captured = captured.clone();
                let body = body.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    {
                        let mut slot = captured.lock().unwrap();
                        slot.body = serde_json::from_str(&request).ok();
                        slot.authorization = headers
                            .get(header::AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                    }
                    (status, body)
                }
            }
        };

        let app = Router::new().route(COMPLETIONS_PATH, post(handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            hits,
            captured,
        }
    }

    /// A well-formed chat-completions body whose first choice says `text`.
    pub fn reply(text: &str) -> String {
        json!({
            "id": "stub",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7}
        })
        .to_string()
    }

    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, COMPLETIONS_PATH)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.captured.lock().unwrap().body.clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.captured.lock().unwrap().authorization.clone()
    }
}

/// A URL nothing listens on.
pub fn unreachable_url() -> String {
    format!("http://127.0.0.1:9{COMPLETIONS_PATH}")
}
