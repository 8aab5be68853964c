//! Shared helpers for mrec-server integration tests
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mrec_server::models::{RawRecognitionResult, RecognitionOutcome};
use mrec_server::services::{AudioStore, RecognitionError, Recognizer};
use mrec_server::AppState;

pub const BOUNDARY: &str = "mrec-test-boundary";

/// Minimal RIFF/WAVE header followed by a few samples
pub const WAV_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt \x10\x00\x00\x00\x01\x00\x01\x00\x44\xac\x00\x00\x88\x58\x01\x00\x02\x00\x10\x00data\x00\x00\x00\x00";

// =============================================================================
// Recognition service documents
// =============================================================================

/// Document with every mapped path present
pub fn full_track_document() -> Value {
    json!({
        "matches": [{"id": "123", "offset": 12.5}],
        "timestamp": 1700000000,
        "track": {
            "key": "40333609",
            "title": "Blinding Lights",
            "subtitle": "The Weeknd",
            "genres": {"primary": "R&B/Soul"},
            "releasedate": "29-11-2019",
            "images": {
                "background": "https://img.example/background.jpg",
                "coverart": "https://img.example/coverart.jpg",
                "coverarthq": "https://img.example/coverarthq.jpg"
            },
            "url": "https://www.shazam.com/track/40333609",
            "hub": {
                "providers": [
                    {
                        "type": "SPOTIFY",
                        "actions": [{"name": "hub:spotify:searchdeeplink", "uri": "spotify:search:Blinding%20Lights"}]
                    },
                    {
                        "type": "DEEZER",
                        "actions": [{"uri": "deezer-query://www.deezer.com/play?query=x"}]
                    }
                ],
                "options": [
                    {
                        "caption": "OPEN",
                        "actions": [{"type": "applemusicopen", "uri": "https://music.apple.com/album/1"}]
                    }
                ]
            },
            "sections": [
                {
                    "type": "SONG",
                    "metadata": [
                        {"title": "Album", "text": "After Hours"},
                        {"title": "Label", "text": "Republic Records"}
                    ]
                },
                {
                    "type": "LYRICS",
                    "text": ["I've been tryna call", "I've been on my own for long enough"]
                }
            ]
        }
    })
}

// =============================================================================
// Mock recognizer
// =============================================================================

#[derive(Debug, Clone)]
pub enum MockReply {
    Match(Value),
    NotFound(u16),
    Transport,
    Timeout,
}

/// In-process `Recognizer` with a scripted reply
pub struct MockRecognizer {
    reply: MockReply,
    calls: AtomicUsize,
    payloads: Mutex<Vec<Vec<u8>>>,
}

impl MockRecognizer {
    pub fn new(reply: MockReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Recognizer for MockRecognizer {
    async fn recognize(&self, payload: &[u8]) -> Result<RecognitionOutcome, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.to_vec());

        match &self.reply {
            MockReply::Match(document) => Ok(RecognitionOutcome::Matched(
                RawRecognitionResult::new(document.clone()),
            )),
            MockReply::NotFound(status) => Ok(RecognitionOutcome::NotFound { status: *status }),
            MockReply::Transport => Err(RecognitionError::Transport(
                "error trying to connect: Connection refused".to_string(),
            )),
            MockReply::Timeout => Err(RecognitionError::Timeout(Duration::from_secs(30))),
        }
    }
}

pub fn test_state(recognizer: Arc<MockRecognizer>, recordings_dir: &Path) -> AppState {
    AppState::new(recognizer, AudioStore::new(recordings_dir))
}

// =============================================================================
// Stub recognition service
// =============================================================================

/// Scripted answer of the stub service
#[derive(Debug, Clone)]
pub struct UpstreamScript {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl UpstreamScript {
    pub fn ok(document: Value) -> Self {
        Self {
            status: 200,
            body: document.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub headers: HeaderMap,
    pub body: String,
}

/// Local HTTP server standing in for the external recognition service
pub struct StubUpstream {
    pub url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubUpstream {
    pub async fn start(script: UpstreamScript) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&requests);

        let app = Router::new().route(
            "/songs/v2/detect",
            post(move |headers: HeaderMap, body: String| {
                let script = script.clone();
                let captured = Arc::clone(&captured);
                async move {
                    captured
                        .lock()
                        .unwrap()
                        .push(CapturedRequest { headers, body });
                    tokio::time::sleep(script.delay).await;
                    (StatusCode::from_u16(script.status).unwrap(), script.body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/songs/v2/detect", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// URL on which nothing is listening
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/songs/v2/detect", addr)
}

// =============================================================================
// Requests
// =============================================================================

pub fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: audio/wav\r\n\r\n",
            BOUNDARY, field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn recognize_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recognize")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn audio_upload(data: &[u8]) -> Request<Body> {
    recognize_request(multipart_body("audio", "recording.wav", data))
}

/// Wait up to two seconds for a recording to appear in `dir`
pub async fn wait_for_recording(dir: &Path) -> Option<std::path::PathBuf> {
    for _ in 0..40 {
        if let Ok(entries) = std::fs::read_dir(dir) {
            let found = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .find(|p| p.extension().map(|x| x == "wav").unwrap_or(false));
            if let Some(path) = found {
                // Give the writer a moment to finish flushing
                tokio::time::sleep(Duration::from_millis(50)).await;
                return Some(path);
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    None
}
