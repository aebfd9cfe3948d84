use pulpit_events::{DetectionSignal, MatchType, NavigationCommand};
use serde::{Deserialize, Serialize};

/// Request sent to the remote detector backend.
///
/// Producers: detection engine
/// Consumers: remote backend (HTTP endpoint or host-side channel worker)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    /// Current word window, exactly as the matchers saw it.
    pub text: String,
    /// Rolling transcript context preceding the window.
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pastor_hints: Option<PastorHints>,
    /// Last emitted reference, written form ("John 3:16").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_verse: Option<String>,
    /// Current anchor, written form ("John 3").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_context: Option<String>,
}

/// Read-only speaker profile hints that bias the backend's guess.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastorHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sermon_theme: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_books: Vec<String>,
}

/// Response from the remote detector.
///
/// Every field is defaulted so a sparse or partially malformed backend
/// payload coerces to an empty WAIT response instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    #[serde(default)]
    pub scriptures: Vec<RemoteScripture>,
    #[serde(default)]
    pub commands: Vec<NavigationCommand>,
    #[serde(default = "wait_signal")]
    pub signal: DetectionSignal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_reason: Option<String>,
    /// How many verses the speaker seems to be working through, when the
    /// backend can tell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_count: Option<u8>,
}

impl DetectResponse {
    /// An empty WAIT response, used when a failed call degrades to
    /// "no detection".
    pub fn empty() -> Self {
        Self {
            scriptures: Vec::new(),
            commands: Vec::new(),
            signal: DetectionSignal::Wait,
            signal_reason: None,
            verse_count: None,
        }
    }
}

/// One scripture candidate returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteScripture {
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_end: Option<u16>,
    /// Backend confidence 0-100, re-scored locally before acceptance.
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Verse text as the backend saw it; kept as a lookup fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default = "paraphrase")]
    pub match_type: MatchType,
}

fn wait_signal() -> DetectionSignal {
    DetectionSignal::Wait
}

fn paraphrase() -> MatchType {
    MatchType::Paraphrase
}
