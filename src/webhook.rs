use crate::config::{Config, SummaryRequest};
use crate::errors::WebhookError;
use crate::models::{SelectedFile, SummaryRequestBody};
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde_json::Value;
use tracing::{info, warn};

/// Multipart field every uploaded file is attached under.
pub const FILE_FIELD: &str = "data";
pub const FILE_COUNT_FIELD: &str = "fileCount";
pub const USER_ID_FIELD: &str = "userId";

pub const SUMMARY_QUERIES: &[&str] = &[
    "total_by_vendor",
    "total_tax",
    "date_wise_trend",
    "category_breakdown",
];

/// Client for the two workflow webhooks. Any 2xx counts as success; the body
/// is returned only when it parses as JSON.
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    upload_url: String,
    summary_url: String,
    summary_request: SummaryRequest,
}

impl WebhookClient {
    pub fn new(
        upload_url: impl Into<String>,
        summary_url: impl Into<String>,
        summary_request: SummaryRequest,
    ) -> Self {
        Self {
            client: Client::new(),
            upload_url: upload_url.into(),
            summary_url: summary_url.into(),
            summary_request,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.upload_webhook.clone(),
            config.summary_webhook.clone(),
            config.summary_request,
        )
    }

    pub async fn upload(
        &self,
        files: &[SelectedFile],
        user_id: &str,
    ) -> Result<Option<Value>, WebhookError> {
        let form = files
            .iter()
            .fold(Form::new(), |form, file| form.part(FILE_FIELD, file_part(file)))
            .text(FILE_COUNT_FIELD, files.len().to_string())
            .text(USER_ID_FIELD, user_id.to_string());

        info!(files = files.len(), url = %self.upload_url, "posting files to upload webhook");
        let response = self.client.post(&self.upload_url).multipart(form).send().await?;
        read_json(response).await
    }

    pub async fn fetch_summary(&self, user_id: &str) -> Result<Option<Value>, WebhookError> {
        let body = match self.summary_request {
            SummaryRequest::Queries => SummaryRequestBody::Queries {
                user_id,
                queries: SUMMARY_QUERIES,
            },
            SummaryRequest::Action => SummaryRequestBody::Action {
                action: "get-summary",
            },
        };

        info!(url = %self.summary_url, "requesting summary");
        let response = self.client.post(&self.summary_url).json(&body).send().await?;
        read_json(response).await
    }
}

fn file_part(file: &SelectedFile) -> Part {
    let part = || Part::bytes(file.content.to_vec()).file_name(file.name.clone());
    match &file.content_type {
        Some(content_type) => part().mime_str(content_type).unwrap_or_else(|_| part()),
        None => part(),
    }
}

async fn read_json(response: Response) -> Result<Option<Value>, WebhookError> {
    let status = response.status();
    if !status.is_success() {
        return Err(WebhookError::Status(status.as_u16()));
    }

    let body = response.bytes().await?;
    match serde_json::from_slice(&body) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!("webhook returned {status} without a JSON body: {err}");
            Ok(None)
        }
    }
}
