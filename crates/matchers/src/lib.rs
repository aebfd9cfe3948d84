//! Synchronous fast-path matching.
//!
//! Five matchers run in fixed priority order against every examined window:
//! navigation commands, translation switches, relative navigation, explicit
//! references, then song lyrics. The first hit wins and the chain stops.
//! Matchers are pure: they read the window text and session state and
//! return a decision, while the engine owns every mutation and emission.

mod explicit;
mod lyrics;
mod navigation;
mod relative;
mod translation;

pub use explicit::ExplicitRefMatcher;
pub use lyrics::LyricsMatcher;
pub use navigation::NavigationMatcher;
pub use relative::RelativeNavMatcher;
pub use translation::TranslationMatcher;

use pulpit_events::{MatchType, NavigationCommand, SongMatch};
use pulpit_library::{SongLibrary, SpeakerProfile};
use pulpit_scripture::BibleRef;
use pulpit_session::DetectionSession;

/// Read-only inputs shared by the whole chain for one evaluation.
pub struct MatchContext<'a> {
    pub songs: &'a SongLibrary,
    /// Speaker hints; lets a chapter jump resolve against a focus book
    /// before any anchor exists.
    pub profile: Option<&'a SpeakerProfile>,
}

/// What a matcher decided about the current window.
#[derive(Debug, Clone)]
pub enum MatchDecision {
    /// A spoken navigation or translation command.
    Command(NavigationCommand),
    /// A scripture target to resolve and display.
    Reference {
        target: BibleRef,
        match_type: MatchType,
        confidence: u8,
        /// Verses the display should advance through, for ranges.
        verse_count: Option<u8>,
    },
    /// A song slide hit.
    Song {
        song: SongMatch,
        match_type: MatchType,
        confidence: u8,
    },
}

pub trait Matcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Examines the window; `None` means this matcher has nothing to say
    /// and the chain moves on.
    fn try_match(
        &self,
        text: &str,
        session: &DetectionSession,
        ctx: &MatchContext<'_>,
    ) -> Option<MatchDecision>;
}

/// Tunables for the standard chain.
#[derive(Debug, Clone)]
pub struct ChainOptions {
    /// Require a wake word before spoken commands.
    pub strict_commands: bool,
    /// Wake words honored in strict mode.
    pub wake_words: Vec<String>,
    /// Minimum window length before lyric matching runs.
    pub lyric_min_chars: usize,
    /// Dice score needed for a lyric hit.
    pub lyric_threshold: f32,
    /// Dice score treated as an exact lyric match.
    pub lyric_exact_cutoff: f32,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            strict_commands: false,
            wake_words: vec!["projector".to_string()],
            lyric_min_chars: 20,
            lyric_threshold: 0.45,
            lyric_exact_cutoff: 0.9,
        }
    }
}

/// The fixed-priority matcher chain.
pub struct MatcherChain {
    matchers: Vec<Box<dyn Matcher>>,
}

impl MatcherChain {
    /// Builds the canonical five-matcher chain.
    pub fn standard(options: &ChainOptions) -> Self {
        Self {
            matchers: vec![
                Box::new(NavigationMatcher::new(
                    options.strict_commands,
                    options.wake_words.clone(),
                )),
                Box::new(TranslationMatcher::new(
                    options.strict_commands,
                    options.wake_words.clone(),
                )),
                Box::new(RelativeNavMatcher::new()),
                Box::new(ExplicitRefMatcher::new()),
                Box::new(LyricsMatcher::new(
                    options.lyric_min_chars,
                    options.lyric_threshold,
                    options.lyric_exact_cutoff,
                )),
            ],
        }
    }

    /// Runs the chain; first decision wins.
    pub fn evaluate(
        &self,
        text: &str,
        session: &DetectionSession,
        ctx: &MatchContext<'_>,
    ) -> Option<(&'static str, MatchDecision)> {
        for matcher in &self.matchers {
            if let Some(decision) = matcher.try_match(text, session, ctx) {
                tracing::debug!(matcher = matcher.name(), "fast path matched");
                return Some((matcher.name(), decision));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
