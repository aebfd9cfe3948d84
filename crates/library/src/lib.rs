//! Song library and speaker profile.
//!
//! The host loads whatever setlist is planned for the service and hands it
//! to the engine; the lyric matcher then scans slide text on every window
//! evaluation. Slides keep a pre-normalized copy of their content so that
//! scan never re-normalizes the whole library.

use serde::{Deserialize, Serialize};

use pulpit_lexicon::normalize;

/// One projected slide of a song.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSlide {
    pub content: String,
    /// Filled by [`SongLibrary::reindex`]; skipped on the wire.
    #[serde(skip)]
    normalized: String,
}

impl SongSlide {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let normalized = normalize(&content);
        Self { content, normalized }
    }

    /// Lower-cased, punctuation-stripped slide text.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// A song with its slides in presentation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongEntry {
    pub title: String,
    pub slides: Vec<SongSlide>,
}

impl SongEntry {
    pub fn new(title: impl Into<String>, slides: Vec<SongSlide>) -> Self {
        Self { title: title.into(), slides }
    }

    /// Splits full lyric text into slides on blank lines.
    pub fn from_lyrics(title: impl Into<String>, lyrics: &str) -> Self {
        let slides = lyrics
            .split("\n\n")
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(SongSlide::new)
            .collect();
        Self { title: title.into(), slides }
    }
}

/// The setlist the engine matches lyrics against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongLibrary {
    pub songs: Vec<SongEntry>,
}

impl SongLibrary {
    pub fn new(songs: Vec<SongEntry>) -> Self {
        let mut library = Self { songs };
        library.reindex();
        library
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    pub fn slide_count(&self) -> usize {
        self.songs.iter().map(|s| s.slides.len()).sum()
    }

    /// Recomputes normalized slide text. Serde skips the normalized copy,
    /// so anything deserialized must pass through here before matching.
    pub fn reindex(&mut self) {
        for song in &mut self.songs {
            for slide in &mut song.slides {
                slide.normalized = normalize(&slide.content);
            }
        }
    }
}

/// Optional hints about tonight's speaker, forwarded to the remote backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sermon_theme: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_books: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slides_carry_normalized_text() {
        let slide = SongSlide::new("Amazing Grace, how sweet the sound!");
        assert_eq!(slide.normalized(), "amazing grace how sweet the sound");
    }

    #[test]
    fn from_lyrics_splits_on_blank_lines() {
        let song = SongEntry::from_lyrics(
            "Amazing Grace",
            "Amazing grace how sweet the sound\nthat saved a wretch like me\n\nI once was lost but now am found",
        );
        assert_eq!(song.slides.len(), 2);
        assert!(song.slides[1].content.starts_with("I once was lost"));
    }

    #[test]
    fn reindex_restores_normalized_after_deserialize() {
        let library = SongLibrary::new(vec![SongEntry::from_lyrics("Test", "Hello, World!")]);
        let json = serde_json::to_string(&library).unwrap();

        let mut back: SongLibrary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.songs[0].slides[0].normalized(), "");

        back.reindex();
        assert_eq!(back.songs[0].slides[0].normalized(), "hello world");
    }

    #[test]
    fn counts() {
        let library = SongLibrary::new(vec![
            SongEntry::from_lyrics("One", "a\n\nb"),
            SongEntry::from_lyrics("Two", "c"),
        ]);
        assert_eq!(library.song_count(), 2);
        assert_eq!(library.slide_count(), 3);
        assert!(!library.is_empty());
    }
}
