//! Detection sink abstraction for decoupled emission.
//!
//! The engine pushes finished batches through a trait object, so the core
//! pipeline can be tested without a host and reused across desktop and
//! server deployments.

use std::sync::{Arc, Mutex};

use crate::{DetectedScripture, DetectionSignal, NavigationCommand};

/// One emission from the engine: everything detected for a single decision.
#[derive(Debug, Clone)]
pub struct DetectionBatch {
    pub scriptures: Vec<DetectedScripture>,
    pub commands: Vec<NavigationCommand>,
    pub signal: DetectionSignal,
    /// How many verses the display should show, for range detections.
    pub verse_count: Option<u8>,
}

/// Receiver for detection batches.
///
/// Implementations must be cheap and non-blocking; the engine calls this
/// from its hot path.
pub trait DetectionSink: Send + Sync {
    fn on_detect(&self, batch: DetectionBatch);
}

/// Type alias for shared sink reference.
pub type DetectionSinkRef = Arc<dyn DetectionSink>;

/// In-memory sink for testing.
///
/// Captures all emitted batches for later inspection.
#[derive(Default)]
pub struct InMemorySink {
    batches: Mutex<Vec<DetectionBatch>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured batches.
    pub fn batches(&self) -> Vec<DetectionBatch> {
        self.batches.lock().unwrap().clone()
    }

    /// All scriptures across every captured batch, in emission order.
    pub fn scriptures(&self) -> Vec<DetectedScripture> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .flat_map(|b| b.scriptures.iter().cloned())
            .collect()
    }

    /// All commands across every captured batch, in emission order.
    pub fn commands(&self) -> Vec<NavigationCommand> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .flat_map(|b| b.commands.iter().cloned())
            .collect()
    }

    pub fn last(&self) -> Option<DetectionBatch> {
        self.batches.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.batches.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.lock().unwrap().is_empty()
    }
}

impl DetectionSink for InMemorySink {
    fn on_detect(&self, batch: DetectionBatch) {
        self.batches.lock().unwrap().push(batch);
    }
}

/// No-op sink that discards all batches.
pub struct NullSink;

impl DetectionSink for NullSink {
    fn on_detect(&self, _batch: DetectionBatch) {
        // Intentionally empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchType;

    fn sample_scripture() -> DetectedScripture {
        DetectedScripture {
            book: "John".to_string(),
            chapter: 3,
            verse: 16,
            verse_end: None,
            text: "For God so loved the world".to_string(),
            reference: "John 3:16".to_string(),
            confidence: 95,
            match_type: MatchType::Exact,
            version: None,
            song_data: None,
        }
    }

    #[test]
    fn in_memory_sink_captures_batches() {
        let sink = InMemorySink::new();

        sink.on_detect(DetectionBatch {
            scriptures: vec![sample_scripture()],
            commands: vec![],
            signal: DetectionSignal::Switch,
            verse_count: None,
        });
        sink.on_detect(DetectionBatch {
            scriptures: vec![],
            commands: vec![NavigationCommand::NextVerse],
            signal: DetectionSignal::Switch,
            verse_count: None,
        });

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.scriptures().len(), 1);
        assert_eq!(sink.commands(), vec![NavigationCommand::NextVerse]);
        assert_eq!(sink.last().unwrap().commands.len(), 1);
    }

    #[test]
    fn in_memory_sink_clears() {
        let sink = InMemorySink::new();
        sink.on_detect(DetectionBatch {
            scriptures: vec![],
            commands: vec![NavigationCommand::Clear],
            signal: DetectionSignal::Switch,
            verse_count: None,
        });
        assert!(!sink.is_empty());

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn null_sink_discards() {
        let sink = NullSink;
        sink.on_detect(DetectionBatch {
            scriptures: vec![sample_scripture()],
            commands: vec![],
            signal: DetectionSignal::Hold,
            verse_count: None,
        });
    }
}
