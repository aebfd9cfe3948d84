//! Time-keyed suppression tables.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-command cooldown table.
///
/// Keys are command kind keys ("next_verse", "switch_translation:NIV"), so
/// distinct commands never suppress each other. A suppressed check does not
/// refresh the timestamp; the original firing alone defines the window.
#[derive(Debug, Default)]
pub struct CooldownStore {
    last_fired: HashMap<String, Instant>,
}

impl CooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the key is allowed to fire now; records the firing.
    pub fn check_and_update(&mut self, key: &str, cooldown: Duration) -> bool {
        let now = Instant::now();
        if let Some(last) = self.last_fired.get(key) {
            if now.duration_since(*last) < cooldown {
                return false;
            }
        }
        self.last_fired.insert(key.to_string(), now);
        true
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }

    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}

/// Recent-emission table keyed by reference.
///
/// Lets the slow path drop detections the congregation just saw. Entries
/// expire by comparison, never by collection; a session table stays small
/// enough that sweeping is not worth it.
#[derive(Debug, Default)]
pub struct RecencyStore {
    seen: HashMap<String, Instant>,
}

impl RecencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the key was marked within `window`.
    pub fn is_recent(&self, key: &str, window: Duration) -> bool {
        self.seen
            .get(key)
            .is_some_and(|at| at.elapsed() < window)
    }

    pub fn mark(&mut self, key: &str) {
        self.seen.insert(key.to_string(), Instant::now());
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fire_allowed_repeat_suppressed() {
        let mut store = CooldownStore::new();
        assert!(store.check_and_update("next_verse", Duration::from_secs(60)));
        assert!(!store.check_and_update("next_verse", Duration::from_secs(60)));
    }

    #[test]
    fn distinct_keys_do_not_interfere() {
        let mut store = CooldownStore::new();
        assert!(store.check_and_update("next_verse", Duration::from_secs(60)));
        assert!(store.check_and_update("prev_verse", Duration::from_secs(60)));
        assert!(store.check_and_update("switch_translation:NIV", Duration::from_secs(60)));
        assert!(!store.check_and_update("switch_translation:NIV", Duration::from_secs(60)));
        assert!(store.check_and_update("switch_translation:ESV", Duration::from_secs(60)));
    }

    #[test]
    fn expired_cooldown_fires_again() {
        let mut store = CooldownStore::new();
        assert!(store.check_and_update("clear", Duration::from_millis(10)));
        std::thread::sleep(Duration::from_millis(20));
        assert!(store.check_and_update("clear", Duration::from_millis(10)));
    }

    #[test]
    fn suppressed_check_does_not_extend_window() {
        let mut store = CooldownStore::new();
        assert!(store.check_and_update("clear", Duration::from_millis(30)));
        std::thread::sleep(Duration::from_millis(20));
        // Still inside the window; must not refresh the timestamp.
        assert!(!store.check_and_update("clear", Duration::from_millis(30)));
        std::thread::sleep(Duration::from_millis(15));
        // 35ms since the original firing.
        assert!(store.check_and_update("clear", Duration::from_millis(30)));
    }

    #[test]
    fn recency_marks_and_expires() {
        let mut store = RecencyStore::new();
        assert!(!store.is_recent("John:3:16", Duration::from_secs(5)));

        store.mark("John:3:16");
        assert!(store.is_recent("John:3:16", Duration::from_secs(5)));
        assert!(!store.is_recent("John:3:17", Duration::from_secs(5)));

        std::thread::sleep(Duration::from_millis(15));
        assert!(!store.is_recent("John:3:16", Duration::from_millis(10)));
    }
}
