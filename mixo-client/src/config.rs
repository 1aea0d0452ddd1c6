//! Client configuration

/// Connection settings shared by the HTTP adapters
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:8090")
    pub base_url: String,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_ms: 30_000,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the bearer token if one is given
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, millis: u64) -> Self {
        self.timeout_ms = millis;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<super::HttpClient> {
        super::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8090")
    }
}
