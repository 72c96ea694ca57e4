//! In-process HTTP stubs shared by the unit tests.

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};

/// Regional response with one observation and one fuel entry.
pub const SAMPLE_RESPONSE: &str = r#"{
    "data": {
        "regionid": 3,
        "dnoregion": "Electricity North West",
        "shortname": "North West England",
        "postcode": "RG10",
        "data": [
            {
                "from": "2024-01-01T12:00Z",
                "to": "2024-01-01T12:30Z",
                "intensity": { "forecast": 266, "index": "moderate" },
                "generationmix": [ { "fuel": "gas", "perc": 43.6 } ]
            }
        ]
    }
}"#;

/// A request as seen by a stub server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub struct StubServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> String {
    // ---
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Stub that answers every request with `status` and a JSON `body`,
/// recording what it received.
pub async fn spawn_stub(status: StatusCode, body: &'static str) -> StubServer {
    // ---
    let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
    let recorder = requests.clone();

    let router = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body_bytes: Bytes| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(RecordedRequest {
                    method,
                    uri,
                    headers,
                    body: body_bytes,
                });
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        },
    );

    StubServer {
        base_url: serve(router).await,
        requests,
    }
}

/// A base URL nothing is listening on.
pub async fn closed_base_url() -> String {
    // ---
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
