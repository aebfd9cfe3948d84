//! The per-service session aggregate.

use std::fmt;
use std::time::Duration;

use crate::cooldown::{CooldownStore, RecencyStore};
use crate::window::WordWindow;

pub const DEFAULT_WINDOW_WORDS: usize = 20;
pub const DEFAULT_CONTEXT_CHARS: usize = 300;

/// Where the congregation currently is: a book and chapter.
///
/// Set by every successful scripture detection; consumed by relative
/// navigation ("verse seventeen") and by remote-confidence boosting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAnchor {
    pub book: String,
    pub chapter: u16,
}

impl ContextAnchor {
    pub fn new(book: impl Into<String>, chapter: u16) -> Self {
        Self { book: book.into(), chapter }
    }
}

impl fmt::Display for ContextAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book, self.chapter)
    }
}

/// Recency key for one verse.
pub fn reference_key(book: &str, chapter: u16, verse: u16) -> String {
    format!("{book}:{chapter}:{verse}")
}

/// Rolling tail of finalized transcript, capped by characters, trimmed at
/// word boundaries. Gives the remote backend sermon context beyond the
/// short matching window.
#[derive(Debug)]
struct RollingContext {
    text: String,
    cap: usize,
}

impl RollingContext {
    fn new(cap: usize) -> Self {
        Self { text: String::new(), cap }
    }

    fn push(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(fragment);

        let count = self.text.chars().count();
        if count <= self.cap {
            return;
        }
        let mut cut = 0;
        for (chars_seen, (idx, c)) in self.text.char_indices().enumerate() {
            if chars_seen >= count - self.cap && c == ' ' {
                cut = idx + 1;
                break;
            }
        }
        if cut > 0 {
            self.text.drain(..cut);
        }
    }

    fn clear(&mut self) {
        self.text.clear();
    }
}

/// Immutable view of session state, taken under the lock and used by the
/// slow path after releasing it.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub window_text: String,
    pub context_text: String,
    pub anchor: Option<ContextAnchor>,
    pub current_version: Option<String>,
    pub last_reference: Option<String>,
    pub generation: u64,
}

/// All mutable detection state for one service.
#[derive(Debug)]
pub struct DetectionSession {
    window: WordWindow,
    rolling: RollingContext,
    anchor: Option<ContextAnchor>,
    cooldowns: CooldownStore,
    recency: RecencyStore,
    current_version: Option<String>,
    last_reference: Option<String>,
    generation: u64,
}

impl DetectionSession {
    pub fn new(window_words: usize, context_chars: usize) -> Self {
        Self {
            window: WordWindow::new(window_words),
            rolling: RollingContext::new(context_chars),
            anchor: None,
            cooldowns: CooldownStore::new(),
            recency: RecencyStore::new(),
            current_version: None,
            last_reference: None,
            generation: 0,
        }
    }

    /// Ingests one transcript fragment and returns the text to examine.
    ///
    /// Finals become durable window and rolling-context content. Interims
    /// are unioned on for this one examination and then forgotten.
    pub fn push_fragment(&mut self, text: &str, is_final: bool) -> String {
        if is_final {
            self.window.push_final(text);
            self.rolling.push(text);
            self.window.text()
        } else {
            self.window.examined_with(text)
        }
    }

    pub fn window_text(&self) -> String {
        self.window.text()
    }

    pub fn context_text(&self) -> &str {
        &self.rolling.text
    }

    /// Clears the window after a detection or a deliberate suppression, and
    /// bumps the generation so stale slow-path results get discarded.
    pub fn consume_window(&mut self) {
        self.window.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Monotonic counter identifying the current window contents.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn anchor(&self) -> Option<&ContextAnchor> {
        self.anchor.as_ref()
    }

    pub fn set_anchor(&mut self, book: impl Into<String>, chapter: u16) {
        let next = ContextAnchor::new(book, chapter);
        if self.anchor.as_ref() != Some(&next) {
            tracing::debug!(anchor = %next, "context anchor moved");
        }
        self.anchor = Some(next);
    }

    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    pub fn current_version(&self) -> Option<&str> {
        self.current_version.as_deref()
    }

    pub fn set_current_version(&mut self, version: impl Into<String>) {
        self.current_version = Some(version.into());
    }

    pub fn last_reference(&self) -> Option<&str> {
        self.last_reference.as_deref()
    }

    /// True when the command may fire now; records the firing.
    pub fn command_allowed(&mut self, kind_key: &str, cooldown: Duration) -> bool {
        self.cooldowns.check_and_update(kind_key, cooldown)
    }

    /// True when this verse was emitted within `window`.
    pub fn recently_emitted(&self, book: &str, chapter: u16, verse: u16, window: Duration) -> bool {
        self.recency.is_recent(&reference_key(book, chapter, verse), window)
    }

    /// Records a verse emission for recency dedup and remote context.
    pub fn note_emitted(&mut self, book: &str, chapter: u16, verse: u16, reference: &str) {
        self.recency.mark(&reference_key(book, chapter, verse));
        self.last_reference = Some(reference.to_string());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            window_text: self.window.text(),
            context_text: self.rolling.text.clone(),
            anchor: self.anchor.clone(),
            current_version: self.current_version.clone(),
            last_reference: self.last_reference.clone(),
            generation: self.generation,
        }
    }

    /// Returns the session to its initial state (new service, new speaker).
    pub fn reset(&mut self) {
        self.window.clear();
        self.rolling.clear();
        self.anchor = None;
        self.cooldowns.clear();
        self.recency.clear();
        self.current_version = None;
        self.last_reference = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Default for DetectionSession {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_WORDS, DEFAULT_CONTEXT_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finals_persist_interims_do_not() {
        let mut session = DetectionSession::default();
        let examined = session.push_fragment("turn to john", true);
        assert_eq!(examined, "turn to john");

        let examined = session.push_fragment("chapter three", false);
        assert_eq!(examined, "turn to john chapter three");
        assert_eq!(session.window_text(), "turn to john");
    }

    #[test]
    fn consume_clears_window_and_bumps_generation() {
        let mut session = DetectionSession::default();
        session.push_fragment("john 3 16", true);
        let before = session.generation();

        session.consume_window();
        assert_eq!(session.window_text(), "");
        assert_eq!(session.generation(), before + 1);
    }

    #[test]
    fn anchor_lifecycle() {
        let mut session = DetectionSession::default();
        assert!(session.anchor().is_none());

        session.set_anchor("John", 3);
        assert_eq!(session.anchor().unwrap().to_string(), "John 3");

        session.set_anchor("John", 4);
        assert_eq!(session.anchor().unwrap().chapter, 4);

        session.clear_anchor();
        assert!(session.anchor().is_none());
    }

    #[test]
    fn rolling_context_outlives_window() {
        let mut session = DetectionSession::new(3, DEFAULT_CONTEXT_CHARS);
        session.push_fragment("in the beginning god created", true);
        session.push_fragment("the heavens and the earth", true);
        // Window only keeps the last 3 words.
        assert_eq!(session.window_text(), "and the earth");
        assert!(session.context_text().starts_with("in the beginning"));
    }

    #[test]
    fn rolling_context_trims_at_word_boundary() {
        let mut session = DetectionSession::new(20, 30);
        session.push_fragment("alpha beta gamma delta epsilon zeta", true);
        session.push_fragment("eta theta", true);
        let context = session.context_text();
        assert!(context.chars().count() <= 30);
        assert!(!context.starts_with(' '));
        assert!(context.ends_with("eta theta"));
        // No mid-word cut at the front.
        assert!(["gamma", "delta", "epsilon", "zeta", "eta", "theta"]
            .contains(&context.split_whitespace().next().unwrap()));
    }

    #[test]
    fn emission_recency_round_trip() {
        let mut session = DetectionSession::default();
        assert!(!session.recently_emitted("John", 3, 16, Duration::from_secs(5)));

        session.note_emitted("John", 3, 16, "John 3:16");
        assert!(session.recently_emitted("John", 3, 16, Duration::from_secs(5)));
        assert_eq!(session.last_reference(), Some("John 3:16"));
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut session = DetectionSession::default();
        session.push_fragment("john 3 16", true);
        session.set_anchor("John", 3);
        session.set_current_version("NIV");
        session.note_emitted("John", 3, 16, "John 3:16");
        let generation = session.generation();

        session.reset();
        assert_eq!(session.window_text(), "");
        assert_eq!(session.context_text(), "");
        assert!(session.anchor().is_none());
        assert!(session.current_version().is_none());
        assert!(session.last_reference().is_none());
        assert!(!session.recently_emitted("John", 3, 16, Duration::from_secs(5)));
        assert_eq!(session.generation(), generation + 1);
    }
}
