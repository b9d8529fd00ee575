/// Transport boundary for signed requests.
///
/// The sender hands the fully framed and signed request body to a
/// [`Transport`] and gets the raw response body back. [`HttpTransport`] posts
/// it with reqwest.
use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::config::NetworkConfig;
use crate::errors::TradewireError;

/// Sends one request body and returns the response body.
///
/// Implementations must report every failure (non-success status, connection
/// error, timeout) as [`TradewireError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: Vec<u8>) -> Result<Vec<u8>, TradewireError>;
}

/// POSTs binary bodies to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &NetworkConfig) -> Result<Self, TradewireError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: Vec<u8>) -> Result<Vec<u8>, TradewireError> {
        debug!(
            "transport.send endpoint={} body_len={}",
            self.endpoint,
            body.len()
        );
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(
            "transport.send status={} response_len={}",
            status,
            bytes.len()
        );

        if !status.is_success() {
            let text: String = String::from_utf8_lossy(&bytes).chars().take(500).collect();
            return Err(TradewireError::Transport(format!("HTTP {}: {}", status, text)));
        }
        Ok(bytes.to_vec())
    }
}
