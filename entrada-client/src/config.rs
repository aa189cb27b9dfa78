//! Client configuration

/// Client configuration for connecting to the ticketing backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token for authenticated back-office calls
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// First index used when renumbering individual seats on save
    pub renumber_start: usize,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            renumber_start: 1,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the seat renumbering start index
    pub fn with_renumber_start(mut self, start: usize) -> Self {
        self.renumber_start = start;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> super::HttpClient {
        super::HttpClient::new(self)
    }

    /// Create a layout store from this configuration
    pub fn build_layout_store(&self) -> super::HttpLayoutStore {
        super::HttpLayoutStore::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
