use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://egov.uscis.gov/processing-times/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the processing-times API client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn trace_loaded(&self) {
        info!(
            base_url = %self.base_url,
            timeout_secs = self.timeout_secs,
            "Loaded ApiConfig"
        );
        debug!(?self, "ApiConfig loaded (full debug)");
    }
}
