/// Qdrant connection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout_secs: 30,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Whether the endpoint points at a Qdrant on this machine
    pub fn is_local(&self) -> bool {
        let rest = self
            .url
            .strip_prefix("http://")
            .or_else(|| self.url.strip_prefix("https://"))
            .unwrap_or(&self.url);

        ["localhost", "127.0.0.1", "[::1]"]
            .iter()
            .any(|host| rest.starts_with(host))
    }

    /// API key to send. Local instances are reached without credentials.
    pub fn effective_api_key(&self) -> Option<&str> {
        if self.is_local() {
            None
        } else {
            self.api_key.as_deref()
        }
    }
}
