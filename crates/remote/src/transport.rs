use crate::schema::{DetectRequest, DetectResponse};
use crate::{RemoteError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// A way to reach the remote detector backend.
///
/// [`is_available`](RemoteTransport::is_available) is probed on every
/// slow-path cycle, so it must be cheap and must not block.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether a call through this transport could currently succeed.
    fn is_available(&self) -> bool;

    async fn detect(&self, request: DetectRequest) -> Result<DetectResponse>;
}

/// HTTP transport for web-hosted backends.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// The timeout covers the whole request, connect included.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Http(e.to_string()))?;
        Ok(Self { client, endpoint: endpoint.into() })
    }
}

#[async_trait]
impl RemoteTransport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    fn is_available(&self) -> bool {
        !self.endpoint.is_empty()
    }

    async fn detect(&self, request: DetectRequest) -> Result<DetectResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout
                } else {
                    RemoteError::Http(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(RemoteError::Http(format!(
                "HTTP {}: {}",
                response.status(),
                self.endpoint
            )));
        }

        response
            .json::<DetectResponse>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }
}

/// One in-flight request handed to the host-side worker.
pub struct ChannelRequest {
    pub request: DetectRequest,
    pub reply: oneshot::Sender<DetectResponse>,
}

/// In-process transport for desktop hosts.
///
/// The host drains the paired receiver, runs its own detector, and answers
/// through the oneshot. Dropping the receiver marks the transport
/// unavailable, which is how desktop hosts turn remote detection off.
pub struct ChannelTransport {
    tx: mpsc::Sender<ChannelRequest>,
    timeout: Duration,
}

impl ChannelTransport {
    pub fn channel(buffer: usize, timeout: Duration) -> (Self, mpsc::Receiver<ChannelRequest>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx, timeout }, rx)
    }
}

#[async_trait]
impl RemoteTransport for ChannelTransport {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn is_available(&self) -> bool {
        !self.tx.is_closed()
    }

    async fn detect(&self, request: DetectRequest) -> Result<DetectResponse> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ChannelRequest { request, reply: reply_tx })
            .await
            .map_err(|_| RemoteError::Channel("host worker is gone".to_string()))?;

        match tokio::time::timeout(self.timeout, reply_rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(RemoteError::Channel("reply dropped".to_string())),
            Err(_) => Err(RemoteError::Timeout),
        }
    }
}
