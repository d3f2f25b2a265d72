use std::time::Duration;

/// Address of the reference inference server
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Options for reaching the inference service
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    /// Base URL, without a trailing path
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl InferenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder method: set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: Duration::from_secs(30) }
    }
}
