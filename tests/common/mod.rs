#![allow(dead_code)]

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

#[derive(Debug, Clone, Default)]
pub struct RecordedUpload {
    pub file_names: Vec<String>,
    pub file_sizes: Vec<usize>,
    pub file_count: Option<String>,
    pub user_id: Option<String>,
}

struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
}

#[derive(Default)]
struct Recorded {
    uploads: Vec<RecordedUpload>,
    summaries: Vec<Value>,
}

/// Stand-in for the workflow webhooks: records what it receives and answers
/// with whatever status and body the test configured.
#[derive(Clone)]
pub struct FakeWebhook {
    base_url: String,
    reply: Arc<Mutex<Reply>>,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeWebhook {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake webhook");
        let addr = listener.local_addr().unwrap();
        let fake = FakeWebhook {
            base_url: format!("http://{addr}"),
            reply: Arc::new(Mutex::new(Reply {
                status: StatusCode::OK,
                body: "{}".to_string(),
                delay: Duration::ZERO,
            })),
            recorded: Arc::new(Mutex::new(Recorded::default())),
        };

        let app = Router::new()
            .route("/upload", post(upload))
            .route("/summary", post(summary))
            .with_state(fake.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake webhook crashed");
        });

        fake
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn reply(&self, status: u16, body: impl Into<String>) {
        let mut reply = self.reply.lock().unwrap();
        reply.status = StatusCode::from_u16(status).unwrap();
        reply.body = body.into();
    }

    pub fn delay(&self, delay: Duration) {
        self.reply.lock().unwrap().delay = delay;
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.recorded.lock().unwrap().uploads.clone()
    }

    pub fn summaries(&self) -> Vec<Value> {
        self.recorded.lock().unwrap().summaries.clone()
    }

    async fn respond(&self) -> (StatusCode, String) {
        let (status, body, delay) = {
            let reply = self.reply.lock().unwrap();
            (reply.status, reply.body.clone(), reply.delay)
        };
        sleep(delay).await;
        (status, body)
    }
}

/// An address nothing listens on.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/upload")
}

async fn upload(State(fake): State<FakeWebhook>, mut multipart: Multipart) -> (StatusCode, String) {
    let mut upload = RecordedUpload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        match name.as_str() {
            "data" => {
                upload.file_names.push(file_name.unwrap_or_default());
                upload.file_sizes.push(field.bytes().await.unwrap().len());
            }
            "fileCount" => upload.file_count = Some(field.text().await.unwrap()),
            "userId" => upload.user_id = Some(field.text().await.unwrap()),
            _ => {}
        }
    }
    fake.recorded.lock().unwrap().uploads.push(upload);
    fake.respond().await
}

async fn summary(State(fake): State<FakeWebhook>, Json(body): Json<Value>) -> (StatusCode, String) {
    fake.recorded.lock().unwrap().summaries.push(body);
    fake.respond().await
}
