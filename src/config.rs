use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Client configuration.
///
/// Every bound the orchestrator enforces lives here so tests can shrink them.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, without the `/api` prefix
    pub base_url: String,
    /// Upper bound on a single backend call
    pub request_timeout: Duration,
    /// Quiet period before a suggestion prefix is sent
    pub suggestion_debounce: Duration,
    pub per_page: u32,
    pub suggestion_fetch_limit: u32,
    pub max_suggestions: usize,
    pub history_suggestions: usize,
    pub suggestion_cache_capacity: usize,
    pub history_capacity: usize,
    pub metrics_window: usize,
    pub latency_window: usize,
    /// Directory of the durable state database; `None` keeps state in memory
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            suggestion_debounce: Duration::from_millis(300),
            per_page: 50,
            suggestion_fetch_limit: 8,
            max_suggestions: 8,
            history_suggestions: 3,
            suggestion_cache_capacity: 100,
            history_capacity: 10,
            metrics_window: 50,
            latency_window: 100,
            data_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}
