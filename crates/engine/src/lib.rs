//! Live scripture detection engine.
//!
//! Wires the whole pipeline together: transcript fragments flow into a
//! [`DetectionSession`] word window, the synchronous matcher chain decides
//! on every fragment, and a debounced runner consults the semantic and
//! remote fallbacks when the fast path stays quiet. Detections leave
//! through a [`DetectionSink`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pulpit_engine::{DetectionEngine, EngineConfig};
//! use pulpit_events::NullSink;
//! use pulpit_scripture::StaticVerseSource;
//!
//! # async fn run() {
//! let engine = DetectionEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(StaticVerseSource::new()),
//!     Arc::new(NullSink),
//! );
//! engine.start();
//! engine.add_text("turn with me to john chapter three verse sixteen", true).await;
//! # }
//! ```
//!
//! [`DetectionSession`]: pulpit_session::DetectionSession
//! [`DetectionSink`]: pulpit_events::DetectionSink

mod config;
mod engine;

pub use config::EngineConfig;
pub use engine::DetectionEngine;
