//! Embedding model abstraction.

use crate::Result;

/// Turns text into a dense vector.
///
/// Implementations wrap whatever model the host ships (ONNX sentence
/// encoders in practice). Embedding is synchronous CPU work; the worker
/// task owns the only instance, so implementations never need interior
/// mutability.
pub trait TextEmbedder: Send {
    /// Embeds one text into a vector of [`Self::dimension`] components.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Output vector width.
    fn dimension(&self) -> usize;

    /// Model identifier for logs.
    fn model_name(&self) -> &str;
}
