use crate::errors::AppError;
use crate::flight::InFlight;
use crate::models::{SelectedFile, SelectionResponse, SubmitResponse, SubmitStatus};
use crate::selection::{FileSelection, MAX_FILES};
use crate::storage::{off_thread, IdentityStore, ResultCache};
use crate::webhook::WebhookClient;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub const SUCCESS_MESSAGE: &str = "✅ Success! Analyzing documents with AI...";
pub const FAILURE_MESSAGE: &str = "❌ Upload failed. Please try again.";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Owns the pending file selection and sends it to the upload webhook.
///
/// While a submission is outstanding the selection is frozen: no second
/// submit and no edits. A failed submission leaves the selection as it was
/// so the user can retry; a successful one caches the returned result and
/// empties the selection.
pub struct Uploader {
    selection: Mutex<FileSelection>,
    flight: InFlight,
    webhook: WebhookClient,
    cache: ResultCache,
    identity: IdentityStore,
    redirect_delay: Duration,
}

impl Uploader {
    pub fn new(
        webhook: WebhookClient,
        cache: ResultCache,
        identity: IdentityStore,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            selection: Mutex::new(FileSelection::new()),
            flight: InFlight::new(),
            webhook,
            cache,
            identity,
            redirect_delay,
        }
    }

    pub async fn selection(&self) -> SelectionResponse {
        let selection = self.selection.lock().await;
        self.describe(&selection)
    }

    pub async fn add_files(&self, batch: Vec<SelectedFile>) -> Result<SelectionResponse, AppError> {
        let mut selection = self.selection.lock().await;
        self.ensure_idle()?;
        let adding = batch.len();
        selection.add(batch).map_err(|err| {
            warn!("rejected {adding} file(s): {err}");
            AppError::bad_request(err.to_string())
        })?;
        info!(added = adding, total = selection.len(), "files selected");
        Ok(self.describe(&selection))
    }

    pub async fn remove_file(&self, index: usize) -> Result<SelectionResponse, AppError> {
        let mut selection = self.selection.lock().await;
        self.ensure_idle()?;
        selection
            .remove(index)
            .map_err(|err| AppError::not_found(err.to_string()))?;
        Ok(self.describe(&selection))
    }

    pub async fn clear_files(&self) -> Result<SelectionResponse, AppError> {
        let mut selection = self.selection.lock().await;
        self.ensure_idle()?;
        selection.clear();
        Ok(self.describe(&selection))
    }

    pub fn is_uploading(&self) -> bool {
        self.flight.is_busy()
    }

    /// Sends every selected file in one multipart request.
    ///
    /// Validation problems (nothing selected, a submit already running) are
    /// errors and nothing is sent. Webhook failures come back as an
    /// [`SubmitStatus::Error`] response.
    pub async fn submit(&self) -> Result<SubmitResponse, AppError> {
        let (_guard, files) = {
            let selection = self.selection.lock().await;
            if selection.is_empty() {
                return Err(AppError::bad_request("No files"));
            }
            let guard = self
                .flight
                .try_begin()
                .ok_or_else(|| AppError::busy("Upload already in progress"))?;
            (guard, selection.files().to_vec())
        };

        let user_id = self.identity.current();
        match self.webhook.upload(&files, &user_id).await {
            Ok(body) => {
                match body {
                    Some(result) => {
                        let cache = self.cache.clone();
                        if let Err(err) = off_thread(move || cache.put(&result)).await {
                            error!("failed to cache analysis result: {err}");
                        }
                    }
                    None => warn!("upload succeeded but no result was returned to cache"),
                }
                let mut selection = self.selection.lock().await;
                selection.clear();
                info!(files = files.len(), "upload accepted");
                Ok(SubmitResponse {
                    status: SubmitStatus::Success,
                    message: SUCCESS_MESSAGE.to_string(),
                    redirect: Some(DASHBOARD_PATH.to_string()),
                    redirect_after_ms: Some(self.redirect_delay.as_millis() as u64),
                    files_remaining: selection.len(),
                })
            }
            Err(err) => {
                error!("upload error: {err}");
                Ok(SubmitResponse {
                    status: SubmitStatus::Error,
                    message: FAILURE_MESSAGE.to_string(),
                    redirect: None,
                    redirect_after_ms: None,
                    files_remaining: files.len(),
                })
            }
        }
    }

    fn ensure_idle(&self) -> Result<(), AppError> {
        if self.flight.is_busy() {
            return Err(AppError::busy("Upload in progress"));
        }
        Ok(())
    }

    fn describe(&self, selection: &FileSelection) -> SelectionResponse {
        SelectionResponse {
            files: selection.describe(),
            count: selection.len(),
            max: MAX_FILES,
            uploading: self.flight.is_busy(),
        }
    }
}
