//! Spoken translation switches ("put it in the King James").

use pulpit_events::NavigationCommand;
use pulpit_lexicon::normalize;
use pulpit_scripture::scan_aliases;
use pulpit_session::DetectionSession;

use crate::{MatchContext, MatchDecision, Matcher};

const COMMAND_VERBS: [&str; 8] = [
    "use", "switch to", "change to", "give me", "show me", "put up", "put it in", "read from",
];

const QUALIFIERS: [&str; 3] = ["version", "translation", "bible"];

/// Matches Bible translation aliases in running speech.
///
/// Safe aliases fire on sight. Risky aliases only fire next to a command
/// verb or a trailing qualifier, so "the message of the cross" never
/// switches the projector to The Message.
pub struct TranslationMatcher {
    strict: bool,
    wake_words: Vec<String>,
}

impl TranslationMatcher {
    pub fn new(strict: bool, wake_words: Vec<String>) -> Self {
        let wake_words = wake_words.iter().map(|w| normalize(w)).collect();
        Self { strict, wake_words }
    }

    fn risky_alias_justified(before: &str, after: &str) -> bool {
        let has_verb = COMMAND_VERBS
            .iter()
            .any(|verb| before.contains(&format!(" {verb} ")));
        if has_verb {
            return true;
        }
        let after = after.trim_start();
        QUALIFIERS.iter().any(|q| {
            after.starts_with(q) && after[q.len()..].chars().next().map_or(true, |c| c == ' ')
        })
    }
}

impl Matcher for TranslationMatcher {
    fn name(&self) -> &'static str {
        "translation"
    }

    fn try_match(
        &self,
        text: &str,
        _session: &DetectionSession,
        _ctx: &MatchContext<'_>,
    ) -> Option<MatchDecision> {
        let text = normalize(text);
        if text.is_empty() {
            return None;
        }
        // Space padding gives every alias word boundaries on both sides.
        let padded = format!(" {text} ");
        for alias in scan_aliases() {
            if alias.normalized.is_empty() {
                continue;
            }
            let needle = format!(" {} ", alias.normalized);
            let Some(pos) = padded.find(&needle) else {
                continue;
            };
            let before = &padded[..pos + 1];
            let after = &padded[pos + needle.len() - 1..];
            if self.strict
                && !self
                    .wake_words
                    .iter()
                    .filter(|w| !w.is_empty())
                    .any(|w| before.contains(w.as_str()))
            {
                continue;
            }
            if alias.risky && !Self::risky_alias_justified(before, after) {
                tracing::debug!(alias = %alias.normalized, "risky translation alias without command context");
                continue;
            }
            return Some(MatchDecision::Command(NavigationCommand::SwitchTranslation {
                version: alias.info.code.to_string(),
            }));
        }
        None
    }
}
