use crate::dashboard::build_dashboard;
use crate::errors::AppError;
use crate::flight::InFlight;
use crate::models::DashboardView;
use crate::storage::{off_thread, IdentityStore, ResultCache};
use crate::webhook::WebhookClient;
use tracing::{error, info, warn};

pub const SUMMARY_FAILURE_MESSAGE: &str = "Failed to generate summary. Please try again.";

/// Asks the summary webhook for a fresh analysis and caches it.
pub struct Summarizer {
    flight: InFlight,
    webhook: WebhookClient,
    cache: ResultCache,
    identity: IdentityStore,
}

impl Summarizer {
    pub fn new(webhook: WebhookClient, cache: ResultCache, identity: IdentityStore) -> Self {
        Self {
            flight: InFlight::new(),
            webhook,
            cache,
            identity,
        }
    }

    pub async fn regenerate(&self) -> Result<DashboardView, AppError> {
        let _guard = self
            .flight
            .try_begin()
            .ok_or_else(|| AppError::busy("Summary already in progress"))?;

        let user_id = self.identity.current();
        match self.webhook.fetch_summary(&user_id).await {
            Ok(Some(result)) => {
                let cache = self.cache.clone();
                let cached = result.clone();
                if let Err(err) = off_thread(move || cache.put(&cached)).await {
                    error!("failed to cache summary: {err}");
                }
                info!("summary refreshed");
                Ok(build_dashboard(Some(&result)))
            }
            Ok(None) => {
                warn!("summary webhook returned no JSON; keeping previous result");
                Ok(build_dashboard(self.cache.get().as_ref()))
            }
            Err(err) => {
                error!("summary error: {err}");
                Err(AppError::upstream(SUMMARY_FAILURE_MESSAGE))
            }
        }
    }
}
