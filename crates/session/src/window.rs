//! Rolling transcript word window.

use std::collections::VecDeque;

/// The last N words of finalized transcript.
///
/// Final fragments append durably; interim fragments never enter the window
/// and are only unioned on for a single examination. Dropping old words from
/// the front keeps matching O(window), not O(sermon).
#[derive(Debug)]
pub struct WordWindow {
    words: VecDeque<String>,
    cap: usize,
}

impl WordWindow {
    pub fn new(cap: usize) -> Self {
        Self { words: VecDeque::with_capacity(cap), cap }
    }

    /// Appends a finalized fragment, evicting the oldest words past the cap.
    pub fn push_final(&mut self, text: &str) {
        for word in text.split_whitespace() {
            self.words.push_back(word.to_string());
        }
        while self.words.len() > self.cap {
            self.words.pop_front();
        }
    }

    /// Durable window content.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for word in &self.words {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }

    /// Durable content plus a transient interim fragment, for one-shot
    /// examination. The interim is not retained.
    pub fn examined_with(&self, interim: &str) -> String {
        let interim = interim.trim();
        let mut out = self.text();
        if !interim.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(interim);
        }
        out
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}
