//! Semantic verse matching.
//!
//! A paraphrased quote ("God loved the world so much that he gave his only
//! son") never survives regex matching. This crate embeds the transcript
//! window and ranks it against a prebuilt verse vector index by cosine
//! similarity. The embedding model lives behind [`TextEmbedder`] in a
//! dedicated worker task; the engine talks to it through [`WorkerHandle`]
//! with correlation IDs and a hard timeout, so a wedged model can never
//! stall detection.

mod embedder;
mod index;
mod protocol;
mod worker;

use thiserror::Error;

pub use embedder::TextEmbedder;
pub use index::{cosine_similarity, IndexEntry, VerseEmbeddingIndex};
pub use protocol::{BuildProgress, Envelope, VerseHit, VerseSeed, WorkerRequest, WorkerResponse};
pub use worker::{WorkerHandle, DEFAULT_RPC_TIMEOUT};

#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("embedding worker is not running")]
    WorkerGone,

    #[error("worker call timed out")]
    Timeout,

    #[error("worker error: {0}")]
    Worker(String),

    #[error("unexpected worker response")]
    UnexpectedResponse,

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("index load failed: {0}")]
    Index(String),
}

pub type Result<T> = std::result::Result<T, SemanticError>;
