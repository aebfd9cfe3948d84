//! Remote fallback detection.
//!
//! When every local strategy comes up empty, the engine packages the text
//! window, rolling context, anchor, and profile hints into a single request
//! and sends it to an external detector backend. Desktop hosts wire an
//! in-process channel; web hosts point at an HTTP endpoint. Both speak the
//! same contract, so the engine picks whichever transport reports itself
//! available.
//!
//! Responses are never trusted as-is. [`validate`] re-scores each returned
//! scripture against the current anchor and drops anything below the
//! configured confidence floor before it can touch the live session.

mod detector;
mod schema;
mod transport;
pub mod validate;

pub use detector::RemoteDetector;
pub use schema::{DetectRequest, DetectResponse, PastorHints, RemoteScripture};
pub use transport::{ChannelRequest, ChannelTransport, HttpTransport, RemoteTransport};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("no remote transport is available")]
    Unavailable,

    #[error("http request failed: {0}")]
    Http(String),

    #[error("channel transport failed: {0}")]
    Channel(String),

    #[error("remote detector timed out")]
    Timeout,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, RemoteError>;
