//! Verse embedding index.

use std::cmp::Ordering;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::{Result, SemanticError};

/// One indexed verse: reference, display text, embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub reference: String,
    pub text: String,
    pub vector: Vec<f32>,
}

/// Flat cosine-similarity index over verse embeddings.
///
/// A translation is ~31k verses; brute force over that is a couple of
/// milliseconds and needs no ANN structure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VerseEmbeddingIndex {
    entries: Vec<IndexEntry>,
}

impl VerseEmbeddingIndex {
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Loads a JSON index previously written by [`Self::to_json`].
    pub fn from_json(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| SemanticError::Index(e.to_string()))
    }

    pub fn to_json(&self, writer: impl Write) -> Result<()> {
        serde_json::to_writer(writer, self).map_err(|e| SemanticError::Index(e.to_string()))
    }

    /// Entries scoring at least `threshold` against the query, best first,
    /// at most `max_results` of them.
    pub fn rank(&self, query: &[f32], threshold: f32, max_results: usize) -> Vec<(f32, &IndexEntry)> {
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let similarity = cosine_similarity(query, &entry.vector);
                (similarity >= threshold).then_some((similarity, entry))
            })
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(max_results);
        scored
    }
}

/// Cosine similarity; 0.0 for mismatched dimensions or zero-norm inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
