//! Worker wire protocol.
//!
//! The worker may live in-process (a tokio task) or out-of-process (a
//! sidecar speaking JSON over stdio); both use these shapes. Responses are
//! paired to requests by the envelope correlation ID.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A request or response tagged with its correlation ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self { id: Uuid::new_v4(), payload }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerRequest {
    /// Load the embedding model.
    Load,
    /// Rank the text against the verse index.
    #[serde(rename_all = "camelCase")]
    Search {
        text: String,
        threshold: f32,
        max_results: usize,
    },
    /// Embed the given verses into a fresh index.
    BuildIndex { verses: Vec<VerseSeed> },
    /// Stop the worker.
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerResponse {
    Loaded,
    Results { results: Vec<VerseHit> },
    #[serde(rename_all = "camelCase")]
    BuildComplete { verse_count: usize },
    Error { message: String },
}

/// Input to index building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseSeed {
    pub reference: String,
    pub text: String,
}

/// One ranked search result; confidence is the similarity scaled to 0-100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseHit {
    pub reference: String,
    pub text: String,
    pub confidence: u8,
}

/// Index build progress, streamed while embedding runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildProgress {
    pub processed: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_tag_kebab_case() {
        let json = serde_json::to_value(WorkerRequest::Load).unwrap();
        assert_eq!(json["type"], "load");

        let json = serde_json::to_value(WorkerRequest::Search {
            text: "for god so loved".into(),
            threshold: 0.5,
            max_results: 4,
        })
        .unwrap();
        assert_eq!(json["type"], "search");
        assert_eq!(json["maxResults"], 4);

        let json = serde_json::to_value(WorkerRequest::BuildIndex { verses: vec![] }).unwrap();
        assert_eq!(json["type"], "build-index");
    }

    #[test]
    fn responses_round_trip() {
        let response = WorkerResponse::Results {
            results: vec![VerseHit {
                reference: "John 3:16".into(),
                text: "For God so loved the world".into(),
                confidence: 87,
            }],
        };
        let json = serde_json::to_string(&response).unwrap();
        let back: WorkerResponse = serde_json::from_str(&json).unwrap();
        match back {
            WorkerResponse::Results { results } => {
                assert_eq!(results[0].reference, "John 3:16");
                assert_eq!(results[0].confidence, 87);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn envelope_flattens_payload() {
        let envelope = Envelope::new(WorkerRequest::Load);
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["id"].is_string());
        assert_eq!(json["type"], "load");
    }

    #[test]
    fn build_complete_uses_camel_case() {
        let json = serde_json::to_value(WorkerResponse::BuildComplete { verse_count: 31102 }).unwrap();
        assert_eq!(json["type"], "build-complete");
        assert_eq!(json["verseCount"], 31102);
    }
}
