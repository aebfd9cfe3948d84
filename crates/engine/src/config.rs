use std::time::Duration;

use pulpit_matchers::ChainOptions;
use pulpit_session::{DEFAULT_CONTEXT_CHARS, DEFAULT_WINDOW_WORDS};

/// Engine tunables. The defaults are tuned for live preaching: quick enough
/// that a verse is on screen before the speaker finishes the sentence, slow
/// enough that repeated or corrected words do not flicker the display.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Words kept in the matching window.
    pub window_words: usize,
    /// Characters of rolling transcript kept as remote backend context.
    pub context_chars: usize,
    /// Quiet time after an unmatched fragment before the fallbacks run.
    pub debounce: Duration,
    /// Minimum interval between firings of the same command key.
    pub command_cooldown: Duration,
    /// Window for suppressing duplicate verse emissions.
    pub recency_window: Duration,
    /// Minimum window length before the semantic fallback is consulted.
    pub semantic_min_chars: usize,
    /// Cosine similarity floor for semantic hits.
    pub semantic_threshold: f32,
    /// Most verses one semantic search may return.
    pub semantic_max_results: usize,
    /// Confidence floor for remote scriptures, applied after anchor boosting.
    pub remote_min_confidence: u8,
    /// Translation used for lookups until the speaker switches.
    pub default_version: Option<String>,
    /// Fast-path chain tunables.
    pub chain: ChainOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_words: DEFAULT_WINDOW_WORDS,
            context_chars: DEFAULT_CONTEXT_CHARS,
            debounce: Duration::from_millis(250),
            command_cooldown: Duration::from_millis(2500),
            recency_window: Duration::from_secs(5),
            semantic_min_chars: 20,
            semantic_threshold: 0.5,
            semantic_max_results: 4,
            remote_min_confidence: 60,
            default_version: None,
            chain: ChainOptions::default(),
        }
    }
}
