//! Shared detection contracts.
//!
//! This crate defines the formal DTOs that cross the engine boundary:
//! detections going out to whatever renders them, navigation commands, and
//! the transcript fragments coming in. Using shared types prevents runtime
//! deserialization errors from mismatched field names.
//!
//! Also provides the [`DetectionSink`] trait for decoupled emission.

mod sink;

pub use sink::{DetectionBatch, DetectionSink, DetectionSinkRef, InMemorySink, NullSink};

use serde::{Deserialize, Serialize};

/// How a detection was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// A spoken reference or verbatim quote.
    Exact,
    /// A close but imperfect quote, e.g. a fuzzy lyric hit.
    Partial,
    /// Recognized by meaning rather than wording.
    Paraphrase,
}

/// What the display layer should do with this batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSignal {
    /// Nothing actionable yet; keep listening.
    Wait,
    /// Display the detected content now.
    Switch,
    /// Keep whatever is currently displayed.
    Hold,
}

/// A scripture (or song slide) ready for display.
///
/// Producers: detection engine
/// Consumers: host presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedScripture {
    /// Canonical book name. Song detections reuse this field for the title.
    pub book: String,
    /// Chapter number; 0 for song detections.
    pub chapter: u16,
    /// Verse number; 0 for song detections.
    pub verse: u16,
    /// Inclusive range end when the detection spans verses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_end: Option<u16>,
    /// Display text: verse content or slide content.
    pub text: String,
    /// Written reference ("John 3:16") or song title.
    pub reference: String,
    /// Confidence 0-100.
    pub confidence: u8,
    pub match_type: MatchType,
    /// Translation code when a specific one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Present only for song lyric detections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_data: Option<SongMatch>,
}

/// Song lyric detection payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongMatch {
    pub title: String,
    /// Index of the matched slide within the song.
    pub slide_index: usize,
    pub slide_content: String,
}

/// A navigation action relative to whatever is on screen.
///
/// Producers: detection engine (spoken commands, remote backend)
/// Consumers: host presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationCommand {
    NextVerse,
    PrevVerse,
    NextChapter,
    PrevChapter,
    JumpToVerse { verse: u16 },
    SwitchTranslation { version: String },
    /// Blank the display and drop chapter context.
    Clear,
}

impl NavigationCommand {
    /// Stable key for cooldown tracking; parameterized commands include
    /// their payload so "switch to NIV" and "switch to ESV" cool down
    /// independently.
    pub fn kind_key(&self) -> String {
        match self {
            Self::NextVerse => "next_verse".to_string(),
            Self::PrevVerse => "prev_verse".to_string(),
            Self::NextChapter => "next_chapter".to_string(),
            Self::PrevChapter => "prev_chapter".to_string(),
            Self::JumpToVerse { verse } => format!("jump_to_verse:{verse}"),
            Self::SwitchTranslation { version } => format!("switch_translation:{version}"),
            Self::Clear => "clear".to_string(),
        }
    }
}

/// A transcript fragment entering the engine.
///
/// Producers: host transcription layer
/// Consumers: detection engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptFragment {
    pub text: String,
    /// Final fragments become durable window content; interims are
    /// examined once and discarded.
    pub is_final: bool,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub ts_ms: Option<i64>,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Detection batch emitted toward the display layer.
    pub const DETECTION_RESULT: &str = "detect:result";
    /// Transcript fragment entering the engine.
    pub const TRANSCRIPT_FRAGMENT: &str = "detect:transcript";
    /// Semantic index build progress.
    pub const INDEX_PROGRESS: &str = "detect:index_progress";
}
