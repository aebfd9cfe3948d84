//! Spoken navigation commands ("next verse", "clear the screen").

use std::sync::LazyLock;

use regex::Regex;

use pulpit_events::NavigationCommand;
use pulpit_lexicon::normalize;
use pulpit_session::DetectionSession;

use crate::{MatchContext, MatchDecision, Matcher};

static COMMAND_PATTERNS: LazyLock<Vec<(Regex, NavigationCommand)>> = LazyLock::new(|| {
    let patterns = [
        (r"\b(?:next|following) verse\b", NavigationCommand::NextVerse),
        (
            r"\b(?:previous|prior) verse\b|\b(?:go )?back (?:a|one) verse\b",
            NavigationCommand::PrevVerse,
        ),
        (r"\b(?:next|following) chapter\b", NavigationCommand::NextChapter),
        (
            r"\b(?:previous|prior) chapter\b|\b(?:go )?back (?:a|one) chapter\b",
            NavigationCommand::PrevChapter,
        ),
        (
            r"\bclear (?:the )?(?:screen|display|projector)\b|\bblank (?:the )?screen\b|\btake (?:it|that) down\b",
            NavigationCommand::Clear,
        ),
    ];
    patterns
        .into_iter()
        .map(|(src, cmd)| {
            let re = Regex::new(src).unwrap_or_else(|e| panic!("command pattern failed: {e}"));
            (re, cmd)
        })
        .collect()
});

/// Matches verse/chapter stepping and screen-clear phrases.
///
/// In strict mode a wake word must appear somewhere before the command
/// phrase, so side chatter like "the next verse says" in a strict setup
/// never moves the display.
pub struct NavigationMatcher {
    strict: bool,
    wake_words: Vec<String>,
}

impl NavigationMatcher {
    pub fn new(strict: bool, wake_words: Vec<String>) -> Self {
        let wake_words = wake_words.iter().map(|w| normalize(w)).collect();
        Self { strict, wake_words }
    }

    fn wake_precedes(&self, text: &str, command_start: usize) -> bool {
        self.wake_words
            .iter()
            .filter(|w| !w.is_empty())
            .any(|w| text[..command_start].contains(w.as_str()))
    }
}

impl Matcher for NavigationMatcher {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn try_match(
        &self,
        text: &str,
        _session: &DetectionSession,
        _ctx: &MatchContext<'_>,
    ) -> Option<MatchDecision> {
        let text = normalize(text);
        for (pattern, command) in COMMAND_PATTERNS.iter() {
            if let Some(found) = pattern.find(&text) {
                if self.strict && !self.wake_precedes(&text, found.start()) {
                    continue;
                }
                return Some(MatchDecision::Command(command.clone()));
            }
        }
        None
    }
}
