//! Canonical scripture references.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use pulpit_lexicon::books;

/// A resolved reference: canonical book, chapter, verse, optional range end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleRef {
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_end: Option<u16>,
}

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*(?P<book>{})\s+(?P<chapter>\d{{1,3}})(?:\s*:\s*(?P<verse>\d{{1,3}})(?:\s*-\s*(?P<end>\d{{1,3}}))?)?\s*$",
        books::book_pattern_source()
    ))
    .unwrap_or_else(|e| panic!("reference pattern failed to compile: {e}"))
});

impl BibleRef {
    pub fn new(book: impl Into<String>, chapter: u16, verse: u16) -> Self {
        Self { book: book.into(), chapter, verse, verse_end: None }
    }

    pub fn with_end(book: impl Into<String>, chapter: u16, verse: u16, end: u16) -> Self {
        Self { book: book.into(), chapter, verse, verse_end: Some(end) }
    }

    /// Number of verses the reference spans, 1 for a single verse.
    pub fn span(&self) -> u16 {
        match self.verse_end {
            Some(end) if end > self.verse => end - self.verse + 1,
            _ => 1,
        }
    }

    /// Parses a written reference like `"John 3:16"` or `"Psalm 119:105-107"`.
    /// Chapter-only forms (`"John 3"`) resolve to verse 1. Book names go
    /// through the alias registry so `"first john 1:9"` parses too.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = REFERENCE_PATTERN.captures(text)?;
        let book = books::canonical_book(caps.name("book")?.as_str())?;
        let chapter: u16 = caps.name("chapter")?.as_str().parse().ok()?;
        let verse: u16 = match caps.name("verse") {
            Some(m) => m.as_str().parse().ok()?,
            None => 1,
        };
        let verse_end = match caps.name("end") {
            Some(m) => {
                let end: u16 = m.as_str().parse().ok()?;
                (end > verse).then_some(end)
            }
            None => None,
        };
        if chapter == 0 || verse == 0 {
            return None;
        }
        Some(Self { book: book.to_string(), chapter, verse, verse_end })
    }
}

impl fmt::Display for BibleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)?;
        if let Some(end) = self.verse_end {
            write!(f, "-{end}")?;
        }
        Ok(())
    }
}
