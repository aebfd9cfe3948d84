//! Relative navigation inside the anchored chapter.
//!
//! Once a chapter is anchored, a bare "seventeen" or "verse nineteen" jumps
//! within it. Two guards keep this from being a foot-gun: without an anchor
//! only a chapter jump against a profile focus book may fire, and any
//! recognizable book name in the window defers to the explicit matcher.

use std::sync::LazyLock;

use regex::Regex;

use pulpit_events::MatchType;
use pulpit_lexicon::{books, normalize, numbers};
use pulpit_scripture::BibleRef;
use pulpit_session::DetectionSession;

use crate::{MatchContext, MatchDecision, Matcher};

/// Most verses a spoken range will advance through.
pub const MAX_RANGE_SPAN: u8 = 3;

const RELATIVE_CONFIDENCE: u8 = 90;

struct Patterns {
    range: Regex,
    digit_range: Regex,
    chapter: Regex,
    verse_keyword: Regex,
    bare_number: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| {
    let num = numbers::spoken_number_pattern();
    let build = |src: String| {
        Regex::new(&src).unwrap_or_else(|e| panic!("relative pattern failed: {e}"))
    };
    Patterns {
        range: build(format!(
            r"\bverses? ({num}) (?:to|through|thru) ({num})\b"
        )),
        // Normalization turns "16-18" into "16 18"; plural "verses" plus two
        // digit runs reads as a range.
        digit_range: build(r"\bverses (\d{1,3}) (\d{1,3})\b".to_string()),
        chapter: build(format!(r"\bchapter ({num})")),
        verse_keyword: build(format!(r"\bverse ({num})")),
        bare_number: build(format!(
            r"^(?:(?:and|now|then|okay|ok) )*({num})$"
        )),
    }
});

pub struct RelativeNavMatcher;

impl RelativeNavMatcher {
    pub fn new() -> Self {
        Self
    }

    fn range_decision(book: &str, chapter: u16, start: u16, end: u16) -> MatchDecision {
        let span = if end > start {
            ((end - start + 1) as u8).min(MAX_RANGE_SPAN)
        } else {
            1
        };
        let verse_end = (span > 1).then(|| start + span as u16 - 1);
        MatchDecision::Reference {
            target: BibleRef { book: book.to_string(), chapter, verse: start, verse_end },
            match_type: MatchType::Exact,
            confidence: RELATIVE_CONFIDENCE,
            verse_count: Some(span),
        }
    }

    /// Scans for a chapter jump ("chapter five", "chapter 5 verse 2").
    ///
    /// Common words ("chapter later") regex-match the loose number branch
    /// and fail validation; keep scanning for a later valid candidate.
    fn chapter_decision(book: &str, text: &str) -> Option<MatchDecision> {
        for caps in PATTERNS.chapter.captures_iter(text) {
            if let Some(chapter) = parse_number_capture(&caps[1]) {
                // The greedy number branch can absorb a following "verse"
                // word, so the verse target is resolved by a second scan
                // from the chapter mention onward.
                let start = caps.get(0).map_or(0, |m| m.start());
                let verse = PATTERNS
                    .verse_keyword
                    .captures_iter(&text[start..])
                    .find_map(|c| parse_number_capture(&c[1]))
                    .unwrap_or(1);
                return Some(MatchDecision::Reference {
                    target: BibleRef::new(book, chapter, verse),
                    match_type: MatchType::Exact,
                    confidence: RELATIVE_CONFIDENCE,
                    verse_count: None,
                });
            }
        }
        None
    }
}

impl Default for RelativeNavMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher for RelativeNavMatcher {
    fn name(&self) -> &'static str {
        "relative_nav"
    }

    fn try_match(
        &self,
        text: &str,
        session: &DetectionSession,
        ctx: &MatchContext<'_>,
    ) -> Option<MatchDecision> {
        let text = normalize(text);
        if text.is_empty() || books::contains_book_name(&text) {
            return None;
        }
        let p = &*PATTERNS;

        let Some(anchor) = session.anchor() else {
            // No live chapter yet. A chapter jump can still resolve against
            // the speaker's first focus book; everything else needs an anchor.
            let book = ctx
                .profile
                .and_then(|profile| profile.focus_books.first())
                .and_then(|name| books::canonical_book(name))?;
            return Self::chapter_decision(book, &text);
        };

        for range in [&p.range, &p.digit_range] {
            if let Some(caps) = range.captures(&text) {
                let start = parse_number_capture(&caps[1]);
                let end = parse_number_capture(&caps[2]);
                if let (Some(start), Some(end)) = (start, end) {
                    return Some(Self::range_decision(&anchor.book, anchor.chapter, start, end));
                }
            }
        }

        if let Some(decision) = Self::chapter_decision(&anchor.book, &text) {
            return Some(decision);
        }

        let verse = p
            .verse_keyword
            .captures_iter(&text)
            .find_map(|caps| parse_number_capture(&caps[1]))
            .or_else(|| {
                p.bare_number
                    .captures(&text)
                    .and_then(|caps| parse_number_capture(&caps[1]))
            })?;
        Some(MatchDecision::Reference {
            target: BibleRef::new(anchor.book.clone(), anchor.chapter, verse),
            match_type: MatchType::Exact,
            confidence: RELATIVE_CONFIDENCE,
            verse_count: None,
        })
    }
}

/// Parses a number capture, retrying progressively shorter word prefixes
/// because greedy captures can absorb a trailing non-number word.
fn parse_number_capture(capture: &str) -> Option<u16> {
    if let Some(n) = numbers::parse_spoken_number(capture) {
        return Some(n);
    }
    let words: Vec<&str> = capture.split_whitespace().collect();
    for end in (1..words.len()).rev() {
        if let Some(n) = numbers::parse_spoken_number(&words[..end].join(" ")) {
            return Some(n);
        }
    }
    None
}
