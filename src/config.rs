/// Endpoint and session settings for the Tradewire backend.
use std::time::Duration;

/// Default session lifetime when no explicit expiry is given: 7 days.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Configuration for one backend deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// URL that accepts signed action bodies.
    pub endpoint: String,
    pub session_ttl: Duration,
    /// Applied by [`HttpTransport`](crate::transport::HttpTransport); `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl NetworkConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            session_ttl: DEFAULT_SESSION_TTL,
            request_timeout: None,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
