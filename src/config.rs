use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

pub const DEFAULT_UPLOAD_WEBHOOK: &str =
    "https://n8n.srv1333057.hstgr.cloud/webhook-test/finsight-upload";
pub const DEFAULT_SUMMARY_WEBHOOK: &str =
    "https://n8n.srv1333057.hstgr.cloud/webhook-test/finsight-summary";

/// Shape of the JSON body sent to the summary webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryRequest {
    /// `{ userId, queries: [...] }`
    Queries,
    /// `{ action: "get-summary" }`
    Action,
}

impl SummaryRequest {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "queries" => Some(Self::Queries),
            "action" => Some(Self::Action),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub upload_webhook: String,
    pub summary_webhook: String,
    pub summary_request: SummaryRequest,
    pub redirect_delay: Duration,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: PathBuf::from("data/state.json"),
            upload_webhook: DEFAULT_UPLOAD_WEBHOOK.to_string(),
            summary_webhook: DEFAULT_SUMMARY_WEBHOOK.to_string(),
            summary_request: SummaryRequest::Queries,
            redirect_delay: Duration::from_millis(2000),
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup; unset or
    /// unparseable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(port) = parsed(&lookup, "PORT") {
            config.port = port;
        }
        if let Some(path) = lookup("APP_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("UPLOAD_WEBHOOK_URL") {
            config.upload_webhook = url;
        }
        if let Some(url) = lookup("SUMMARY_WEBHOOK_URL") {
            config.summary_webhook = url;
        }
        if let Some(raw) = lookup("SUMMARY_REQUEST") {
            match SummaryRequest::parse(&raw) {
                Some(kind) => config.summary_request = kind,
                None => warn!("ignoring SUMMARY_REQUEST={raw:?}, expected 'queries' or 'action'"),
            }
        }
        if let Some(ms) = parsed::<u64>(&lookup, "REDIRECT_DELAY_MS") {
            config.redirect_delay = Duration::from_millis(ms);
        }
        if let Some(bytes) = parsed(&lookup, "MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = bytes;
        }

        config
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {key}={raw:?}, not a valid number");
            None
        }
    }
}
