use crate::schema::{DetectRequest, DetectResponse};
use crate::transport::RemoteTransport;
use crate::{RemoteError, Result};

/// Ordered set of transports; the first available one handles each call.
///
/// Register the channel transport ahead of HTTP so desktop hosts stay
/// in-process and only go over the network once the host worker is gone.
#[derive(Default)]
pub struct RemoteDetector {
    transports: Vec<Box<dyn RemoteTransport>>,
}

impl RemoteDetector {
    pub fn new() -> Self {
        Self { transports: Vec::new() }
    }

    pub fn with_transport(mut self, transport: Box<dyn RemoteTransport>) -> Self {
        self.transports.push(transport);
        self
    }

    pub fn push(&mut self, transport: Box<dyn RemoteTransport>) {
        self.transports.push(transport);
    }

    pub fn is_available(&self) -> bool {
        self.transports.iter().any(|transport| transport.is_available())
    }

    pub async fn detect(&self, request: DetectRequest) -> Result<DetectResponse> {
        let Some(transport) = self.transports.iter().find(|transport| transport.is_available())
        else {
            return Err(RemoteError::Unavailable);
        };
        tracing::debug!(transport = transport.name(), "dispatching remote detection");
        transport.detect(request).await
    }
}
