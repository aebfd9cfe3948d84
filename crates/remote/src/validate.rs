//! Field-by-field validation of backend responses.
//!
//! A stale or malformed response must never move the live anchor, so every
//! scripture is re-scored and filtered here before the engine resolves it.

use crate::schema::{DetectResponse, RemoteScripture};
use pulpit_events::DetectionSignal;

/// Boost applied when a scripture shares the anchor's book.
const SAME_BOOK_BOOST: u8 = 15;
/// Additional boost when it also lands within two chapters of the anchor.
const NEAR_CHAPTER_BOOST: u8 = 10;
const NEAR_CHAPTER_SPAN: u16 = 2;

/// Re-scores one scripture against the current anchor.
///
/// The speaker rarely jumps books mid-thought, so candidates that agree
/// with the anchor get a head start over the raw backend confidence.
pub fn boosted_confidence(scripture: &RemoteScripture, anchor: Option<(&str, u16)>) -> u8 {
    let Some((book, chapter)) = anchor else {
        return scripture.confidence.min(100);
    };
    let mut confidence = scripture.confidence;
    if scripture.book.eq_ignore_ascii_case(book) {
        confidence = confidence.saturating_add(SAME_BOOK_BOOST);
        if scripture.chapter.abs_diff(chapter) <= NEAR_CHAPTER_SPAN {
            confidence = confidence.saturating_add(NEAR_CHAPTER_BOOST);
        }
    }
    confidence.min(100)
}

/// Rewrites every scripture's confidence in place.
pub fn apply_anchor_boost(scriptures: &mut [RemoteScripture], anchor: Option<(&str, u16)>) {
    for scripture in scriptures {
        scripture.confidence = boosted_confidence(scripture, anchor);
    }
}

/// Drops scriptures below the confidence floor or with nonsense coordinates.
/// Runs after [`apply_anchor_boost`] so anchor-adjacent candidates get their
/// head start before the cut.
pub fn retain_confident(scriptures: &mut Vec<RemoteScripture>, min_confidence: u8) {
    scriptures.retain(|scripture| {
        if scripture.chapter == 0 || scripture.verse == 0 {
            tracing::debug!(book = %scripture.book, "dropping remote scripture with zero coordinates");
            return false;
        }
        if scripture.confidence < min_confidence {
            tracing::debug!(
                book = %scripture.book,
                chapter = scripture.chapter,
                verse = scripture.verse,
                confidence = scripture.confidence,
                min_confidence,
                "dropping low-confidence remote scripture"
            );
            return false;
        }
        true
    });
}

/// A response earns an emission only by carrying a scripture, a command, or
/// an explicit SWITCH. Empty WAIT and HOLD responses are dropped silently.
pub fn should_emit(response: &DetectResponse) -> bool {
    !response.scriptures.is_empty()
        || !response.commands.is_empty()
        || response.signal == DetectionSignal::Switch
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulpit_events::NavigationCommand;

    fn scripture(book: &str, chapter: u16, verse: u16, confidence: u8) -> RemoteScripture {
        RemoteScripture {
            book: book.to_string(),
            chapter,
            verse,
            verse_end: None,
            confidence,
            version: None,
            text: None,
            match_type: pulpit_events::MatchType::Paraphrase,
        }
    }

    #[test]
    fn same_book_gets_fifteen() {
        let candidate = scripture("John", 11, 35, 60);
        assert_eq!(boosted_confidence(&candidate, Some(("John", 3))), 75);
    }

    #[test]
    fn same_book_near_chapter_gets_twenty_five() {
        let candidate = scripture("John", 4, 7, 60);
        assert_eq!(boosted_confidence(&candidate, Some(("John", 3))), 85);
        let same_chapter = scripture("john", 3, 17, 60);
        assert_eq!(boosted_confidence(&same_chapter, Some(("John", 3))), 85);
    }

    #[test]
    fn different_book_is_untouched() {
        let candidate = scripture("Romans", 3, 23, 60);
        assert_eq!(boosted_confidence(&candidate, Some(("John", 3))), 60);
    }

    #[test]
    fn boost_caps_at_one_hundred() {
        let candidate = scripture("John", 3, 17, 90);
        assert_eq!(boosted_confidence(&candidate, Some(("John", 3))), 100);
    }

    #[test]
    fn no_anchor_means_no_boost() {
        let candidate = scripture("John", 3, 16, 88);
        assert_eq!(boosted_confidence(&candidate, None), 88);
    }

    #[test]
    fn filter_drops_low_confidence_and_zero_coordinates() {
        let mut scriptures = vec![
            scripture("John", 3, 16, 80),
            scripture("Romans", 8, 28, 40),
            scripture("Psalms", 0, 1, 95),
            scripture("Genesis", 1, 0, 95),
        ];
        retain_confident(&mut scriptures, 60);
        assert_eq!(scriptures.len(), 1);
        assert_eq!(scriptures[0].book, "John");
    }

    #[test]
    fn boost_rescues_anchor_adjacent_candidate_from_filter() {
        let mut scriptures = vec![scripture("John", 4, 7, 50)];
        apply_anchor_boost(&mut scriptures, Some(("John", 3)));
        retain_confident(&mut scriptures, 60);
        assert_eq!(scriptures.len(), 1);
        assert_eq!(scriptures[0].confidence, 75);
    }

    #[test]
    fn emission_requires_content_or_switch() {
        let mut response = DetectResponse::empty();
        assert!(!should_emit(&response));

        response.signal = DetectionSignal::Hold;
        assert!(!should_emit(&response));

        response.signal = DetectionSignal::Switch;
        assert!(should_emit(&response));

        let mut with_command = DetectResponse::empty();
        with_command.commands.push(NavigationCommand::NextVerse);
        assert!(should_emit(&with_command));

        let mut with_scripture = DetectResponse::empty();
        with_scripture.scriptures.push(scripture("John", 3, 16, 90));
        assert!(should_emit(&with_scripture));
    }
}
