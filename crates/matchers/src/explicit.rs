//! Explicit scripture references ("John 3:16", "psalm one hundred nineteen
//! verse one hundred five").
//!
//! Works on normalized text, where "3:16" has already become "3 16". Three
//! pattern shapes cover spoken and dictated forms; regex hits are only
//! candidates until their number captures validate, because the loose word
//! branches happily match things like "john said unto them".

use std::sync::LazyLock;

use regex::Regex;

use pulpit_events::MatchType;
use pulpit_lexicon::{books, normalize, numbers};
use pulpit_scripture::BibleRef;
use pulpit_session::DetectionSession;

use crate::relative::MAX_RANGE_SPAN;
use crate::{MatchContext, MatchDecision, Matcher};

const EXPLICIT_CONFIDENCE: u8 = 95;

struct Patterns {
    /// "john chapter three verse sixteen", "john 3 verse 16 to 18"
    verse_keyword: Regex,
    /// "john 3 16", "psalm 23", "genesis 1 1 to 3"
    digits: Regex,
    /// "john chapter three"
    chapter_keyword: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| {
    let book = books::book_pattern_source();
    let num = numbers::spoken_number_pattern();
    let build = |src: String| {
        Regex::new(&src).unwrap_or_else(|e| panic!("explicit pattern failed: {e}"))
    };
    Patterns {
        verse_keyword: build(format!(
            r"\b(?P<book>{book}) (?:chapter )?(?P<chapter>{num}) (?:and )?verse (?P<verse>{num})(?: (?:to|through|thru) (?P<end>{num}))?"
        )),
        digits: build(format!(
            r"\b(?P<book>{book}) (?P<chapter>\d{{1,3}})(?: (?P<verse>\d{{1,3}})(?: (?:to|through|thru) (?P<end>\d{{1,3}}))?)?\b"
        )),
        chapter_keyword: build(format!(
            r"\b(?P<book>{book}) chapter (?P<chapter>{num})"
        )),
    }
});

pub struct ExplicitRefMatcher;

impl ExplicitRefMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExplicitRefMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher for ExplicitRefMatcher {
    fn name(&self) -> &'static str {
        "explicit_ref"
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
        let p = &*PATTERNS;
        for pattern in [&p.verse_keyword, &p.digits, &p.chapter_keyword] {
            for caps in pattern.captures_iter(&text) {
                let Some(book) = books::canonical_book(&caps["book"]) else {
                    continue;
                };
                let Some(chapter) = parse_number_capture(&caps["chapter"]) else {
                    continue;
                };
                let verse = match caps.name("verse") {
                    Some(m) => match parse_number_capture(m.as_str()) {
                        Some(v) => v,
                        None => continue,
                    },
                    None => 1,
                };
                let end = caps
                    .name("end")
                    .and_then(|m| parse_number_capture(m.as_str()))
                    .filter(|&e| e > verse);

                let (verse_end, verse_count) = match end {
                    Some(e) => {
                        let span = ((e - verse + 1) as u8).min(MAX_RANGE_SPAN);
                        (Some(verse + span as u16 - 1), Some(span))
                    }
                    None => (None, None),
                };
                return Some(MatchDecision::Reference {
                    target: BibleRef { book: book.to_string(), chapter, verse, verse_end },
                    match_type: MatchType::Exact,
                    confidence: EXPLICIT_CONFIDENCE,
                    verse_count,
                });
            }
        }
        None
    }
}

/// Validates a number capture, retrying shorter word prefixes when the
/// greedy branch absorbed a trailing word.
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

#[cfg(test)]
mod tests {
    use super::*;
    use pulpit_library::SongLibrary;

    fn try_text(text: &str) -> Option<MatchDecision> {
        let session = DetectionSession::default();
        let songs = SongLibrary::default();
        let ctx = MatchContext { songs: &songs, profile: None };
        ExplicitRefMatcher::new().try_match(text, &session, &ctx)
    }

    fn expect_reference(decision: Option<MatchDecision>) -> (BibleRef, Option<u8>) {
        match decision {
            Some(MatchDecision::Reference { target, verse_count, .. }) => (target, verse_count),
            other => panic!("expected reference, got {other:?}"),
        }
    }

    #[test]
    fn scenario_dictated_reference() {
        let (target, count) = expect_reference(try_text("John 3:16"));
        assert_eq!(target, BibleRef::new("John", 3, 16));
        assert_eq!(count, None);
    }

    #[test]
    fn scenario_reference_mid_sentence() {
        let (target, _) = expect_reference(try_text("turn with me to genesis 1 1 tonight"));
        assert_eq!(target, BibleRef::new("Genesis", 1, 1));
    }

    #[test]
    fn scenario_fully_spoken_reference() {
        let (target, _) = expect_reference(try_text("john chapter three verse sixteen"));
        assert_eq!(target, BibleRef::new("John", 3, 16));
    }

    #[test]
    fn scenario_spoken_without_chapter_keyword() {
        let (target, _) = expect_reference(try_text("john three verse sixteen"));
        assert_eq!(target, BibleRef::new("John", 3, 16));
    }

    #[test]
    fn scenario_long_psalm() {
        let (target, _) =
            expect_reference(try_text("psalm one hundred nineteen verse one hundred seventy six"));
        assert_eq!(target, BibleRef::new("Psalms", 119, 176));
    }

    #[test]
    fn scenario_ordinal_book() {
        let (target, _) = expect_reference(try_text("first john 1 9"));
        assert_eq!(target, BibleRef::new("1 John", 1, 9));
    }

    #[test]
    fn chapter_only_lands_on_verse_one() {
        let (target, _) = expect_reference(try_text("psalm 23"));
        assert_eq!(target, BibleRef::new("Psalms", 23, 1));

        let (target, _) = expect_reference(try_text("matthew chapter five"));
        assert_eq!(target, BibleRef::new("Matthew", 5, 1));
    }

    #[test]
    fn chapter_keyword_with_trailing_words() {
        let (target, _) = expect_reference(try_text("john chapter three tonight friends"));
        assert_eq!(target, BibleRef::new("John", 3, 1));
    }

    #[test]
    fn range_with_connector() {
        let (target, count) = expect_reference(try_text("john 3 16 to 18"));
        assert_eq!(target, BibleRef::with_end("John", 3, 16, 18));
        assert_eq!(count, Some(3));
    }

    #[test]
    fn oversized_range_clamps() {
        let (target, count) = expect_reference(try_text("matthew 5 1 through 12"));
        assert_eq!(target, BibleRef::with_end("Matthew", 5, 1, 3));
        assert_eq!(count, Some(3));
    }

    #[test]
    fn book_name_alone_is_not_a_reference() {
        assert!(try_text("the gospel of john tells us").is_none());
        assert!(try_text("john said unto them").is_none());
    }

    #[test]
    fn out_of_range_numbers_rejected() {
        assert!(try_text("john 200 16").is_none());
        // Verse out of range invalidates the verse capture; the digits
        // pattern has no valid candidate left.
        assert!(try_text("psalm 119 500").is_none());
    }

    #[test]
    fn later_candidate_recovers_from_earlier_false_hit() {
        // "job well done" regex-matches the digits pattern? No digits follow,
        // so only "john chapter three" is a candidate.
        let (target, _) = expect_reference(try_text("great job everyone now john chapter three"));
        assert_eq!(target, BibleRef::new("John", 3, 1));
    }

    #[test]
    fn no_match_on_plain_speech() {
        assert!(try_text("and they were amazed at his teaching").is_none());
        assert!(try_text("").is_none());
    }
}
