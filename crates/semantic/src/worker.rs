//! The embedding worker task and its handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::embedder::TextEmbedder;
use crate::index::{IndexEntry, VerseEmbeddingIndex};
use crate::protocol::{BuildProgress, VerseHit, VerseSeed, WorkerRequest, WorkerResponse};
use crate::{Result, SemanticError};

/// Hard ceiling on one worker round-trip.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(3);

/// Progress is reported every this many embedded verses.
const PROGRESS_EVERY: usize = 250;

const REQUEST_BUFFER: usize = 32;

type EmbedderLoader = Box<dyn FnOnce() -> Result<Box<dyn TextEmbedder>> + Send>;

struct Rpc {
    id: Uuid,
    request: WorkerRequest,
    reply: oneshot::Sender<WorkerResponse>,
    progress: Option<mpsc::Sender<BuildProgress>>,
}

/// Client side of the worker.
///
/// Every call is a correlated request/reply pair behind one timeout policy;
/// a reply that never arrives drops the oneshot receiver, so timed-out
/// calls leave nothing registered.
#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::Sender<Rpc>,
    ready: Arc<AtomicBool>,
    timeout: Duration,
}

impl WorkerHandle {
    /// Spawns the worker task. The loader runs when the first `load`
    /// request arrives, not at spawn, because model init is expensive and
    /// hosts decide when to pay for it.
    pub fn spawn<L>(loader: L, index: Option<VerseEmbeddingIndex>, timeout: Duration) -> Self
    where
        L: FnOnce() -> Result<Box<dyn TextEmbedder>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(REQUEST_BUFFER);
        let ready = Arc::new(AtomicBool::new(false));
        let worker = EmbeddingWorker {
            loader: Some(Box::new(loader)),
            embedder: None,
            index,
            ready: ready.clone(),
        };
        tokio::spawn(worker.run(rx));
        Self { tx, ready, timeout }
    }

    /// True once the model is loaded and a non-empty index is present.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Loads the embedding model.
    pub async fn load(&self) -> Result<()> {
        match self.request(WorkerRequest::Load).await? {
            WorkerResponse::Loaded => Ok(()),
            WorkerResponse::Error { message } => Err(SemanticError::Worker(message)),
            _ => Err(SemanticError::UnexpectedResponse),
        }
    }

    /// Ranks `text` against the index; empty result means nothing cleared
    /// the threshold.
    pub async fn search(
        &self,
        text: &str,
        threshold: f32,
        max_results: usize,
    ) -> Result<Vec<VerseHit>> {
        let request = WorkerRequest::Search {
            text: text.to_string(),
            threshold,
            max_results,
        };
        match self.request(request).await? {
            WorkerResponse::Results { results } => Ok(results),
            WorkerResponse::Error { message } => Err(SemanticError::Worker(message)),
            _ => Err(SemanticError::UnexpectedResponse),
        }
    }

    /// Embeds `verses` into a fresh index, streaming progress to
    /// `progress` when given. The timeout here is an inactivity timeout:
    /// each progress event resets it, so a long build survives as long as
    /// it keeps moving.
    pub async fn build_index(
        &self,
        verses: Vec<VerseSeed>,
        progress: Option<mpsc::Sender<BuildProgress>>,
    ) -> Result<usize> {
        let id = Uuid::new_v4();
        let (reply_tx, mut reply_rx) = oneshot::channel();
        let (progress_tx, mut progress_rx) = mpsc::channel(8);
        let rpc = Rpc {
            id,
            request: WorkerRequest::BuildIndex { verses },
            reply: reply_tx,
            progress: Some(progress_tx),
        };
        self.tx.send(rpc).await.map_err(|_| SemanticError::WorkerGone)?;

        // Progress drains ahead of the reply so the final update is always
        // forwarded before the call returns.
        let mut progress_open = true;
        let response = loop {
            tokio::select! {
                biased;
                event = progress_rx.recv(), if progress_open => {
                    match event {
                        Some(update) => {
                            tracing::trace!(request_id = %id, processed = update.processed, total = update.total, "index build progress");
                            if let Some(out) = &progress {
                                let _ = out.try_send(update);
                            }
                        }
                        None => progress_open = false,
                    }
                }
                reply = &mut reply_rx => {
                    break reply.map_err(|_| SemanticError::WorkerGone)?;
                }
                _ = tokio::time::sleep(self.timeout) => {
                    tracing::warn!(request_id = %id, "index build went silent");
                    return Err(SemanticError::Timeout);
                }
            }
        };
        match response {
            WorkerResponse::BuildComplete { verse_count } => Ok(verse_count),
            WorkerResponse::Error { message } => Err(SemanticError::Worker(message)),
            _ => Err(SemanticError::UnexpectedResponse),
        }
    }

    /// Asks the worker to stop after in-flight work.
    pub fn shutdown(&self) {
        let (reply, _) = oneshot::channel();
        let _ = self.tx.try_send(Rpc {
            id: Uuid::new_v4(),
            request: WorkerRequest::Shutdown,
            reply,
            progress: None,
        });
    }

    async fn request(&self, request: WorkerRequest) -> Result<WorkerResponse> {
        let id = Uuid::new_v4();
        let (reply_tx, reply_rx) = oneshot::channel();
        let rpc = Rpc { id, request, reply: reply_tx, progress: None };
        self.tx.send(rpc).await.map_err(|_| SemanticError::WorkerGone)?;
        match tokio::time::timeout(self.timeout, reply_rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(SemanticError::WorkerGone),
            Err(_) => {
                tracing::warn!(request_id = %id, "worker call timed out");
                Err(SemanticError::Timeout)
            }
        }
    }
}

struct EmbeddingWorker {
    loader: Option<EmbedderLoader>,
    embedder: Option<Box<dyn TextEmbedder>>,
    index: Option<VerseEmbeddingIndex>,
    ready: Arc<AtomicBool>,
}

impl EmbeddingWorker {
    async fn run(mut self, mut rx: mpsc::Receiver<Rpc>) {
        self.publish_ready();
        while let Some(rpc) = rx.recv().await {
            if matches!(rpc.request, WorkerRequest::Shutdown) {
                tracing::debug!("embedding worker shutting down");
                break;
            }
            let response = self.handle(rpc.request, rpc.progress.as_ref());
            if let WorkerResponse::Error { message } = &response {
                tracing::debug!(request_id = %rpc.id, error = %message, "worker request failed");
            }
            let _ = rpc.reply.send(response);
            self.publish_ready();
        }
    }

    fn handle(
        &mut self,
        request: WorkerRequest,
        progress: Option<&mpsc::Sender<BuildProgress>>,
    ) -> WorkerResponse {
        match request {
            WorkerRequest::Load => self.handle_load(),
            WorkerRequest::Search { text, threshold, max_results } => {
                self.handle_search(&text, threshold, max_results)
            }
            WorkerRequest::BuildIndex { verses } => self.handle_build(verses, progress),
            WorkerRequest::Shutdown => WorkerResponse::Error {
                message: "shutdown handled by the run loop".to_string(),
            },
        }
    }

    fn handle_load(&mut self) -> WorkerResponse {
        if self.embedder.is_some() {
            return WorkerResponse::Loaded;
        }
        let Some(loader) = self.loader.take() else {
            return WorkerResponse::Error { message: "embedder loader already consumed".to_string() };
        };
        match loader() {
            Ok(embedder) => {
                tracing::info!(model = %embedder.model_name(), dimension = embedder.dimension(), "embedding model loaded");
                self.embedder = Some(embedder);
                WorkerResponse::Loaded
            }
            Err(e) => WorkerResponse::Error { message: e.to_string() },
        }
    }

    fn handle_search(&self, text: &str, threshold: f32, max_results: usize) -> WorkerResponse {
        let Some(embedder) = &self.embedder else {
            return WorkerResponse::Error { message: "model not loaded".to_string() };
        };
        let Some(index) = &self.index else {
            return WorkerResponse::Error { message: "index not loaded".to_string() };
        };
        match embedder.embed(text) {
            Ok(query) => {
                let results = index
                    .rank(&query, threshold, max_results)
                    .into_iter()
                    .map(|(similarity, entry)| VerseHit {
                        reference: entry.reference.clone(),
                        text: entry.text.clone(),
                        confidence: (similarity * 100.0).round().clamp(0.0, 100.0) as u8,
                    })
                    .collect();
                WorkerResponse::Results { results }
            }
            Err(e) => WorkerResponse::Error { message: e.to_string() },
        }
    }

    fn handle_build(
        &mut self,
        verses: Vec<VerseSeed>,
        progress: Option<&mpsc::Sender<BuildProgress>>,
    ) -> WorkerResponse {
        let Some(embedder) = &self.embedder else {
            return WorkerResponse::Error { message: "model not loaded".to_string() };
        };
        let total = verses.len();
        let mut entries = Vec::with_capacity(total);
        for (i, seed) in verses.into_iter().enumerate() {
            match embedder.embed(&seed.text) {
                Ok(vector) => entries.push(IndexEntry {
                    reference: seed.reference,
                    text: seed.text,
                    vector,
                }),
                Err(e) => {
                    return WorkerResponse::Error {
                        message: format!("embedding {} failed: {e}", seed.reference),
                    };
                }
            }
            let processed = i + 1;
            if processed % PROGRESS_EVERY == 0 || processed == total {
                if let Some(tx) = progress {
                    let _ = tx.try_send(BuildProgress { processed, total });
                }
            }
        }
        self.index = Some(VerseEmbeddingIndex::from_entries(entries));
        WorkerResponse::BuildComplete { verse_count: total }
    }

    fn publish_ready(&self) {
        let ready =
            self.embedder.is_some() && self.index.as_ref().is_some_and(|i| !i.is_empty());
        self.ready.store(ready, Ordering::Release);
    }
}
