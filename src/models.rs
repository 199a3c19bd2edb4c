use axum::body::Bytes;
use serde::{Deserialize, Serialize};

/// A file picked or dropped on the upload page, held in memory until submitted.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            content: content.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub files: Vec<FileInfo>,
    pub count: usize,
    pub max: usize,
    pub uploading: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    Success,
    Error,
}

/// What the upload page shows after a submission, and where it goes next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: SubmitStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_after_ms: Option<u64>,
    pub files_remaining: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// A headline figure. Webhooks sometimes send preformatted strings such as
/// `"$1,234"`; those are kept as text and shown verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Number(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    pub total_documents: Amount,
    pub total_spending: Amount,
    pub total_tax: Amount,
    pub unique_vendors: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub has_result: bool,
    pub summary_text: String,
    pub metrics: Metrics,
    pub vendor_totals: Option<Vec<SeriesPoint>>,
    pub date_trends: Option<Vec<SeriesPoint>>,
    pub category_breakdown: Option<Vec<SeriesPoint>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SummaryRequestBody<'a> {
    Queries {
        #[serde(rename = "userId")]
        user_id: &'a str,
        queries: &'a [&'a str],
    },
    Action { action: &'a str },
}
