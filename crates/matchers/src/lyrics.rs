//! Fuzzy song lyric matching against the loaded setlist.

use pulpit_events::{MatchType, SongMatch};
use pulpit_lexicon::{dice_coefficient, normalize};
use pulpit_session::DetectionSession;

use crate::{MatchContext, MatchDecision, Matcher};

/// Shortest normalized length either side must have before containment
/// alone counts as an exact hit.
const CONTAINMENT_MIN_CHARS: usize = 15;

/// Scores the window against every slide of every song, best slide wins.
///
/// Short windows never run; a few words of ordinary speech would otherwise
/// fuzzy-match half a songbook.
pub struct LyricsMatcher {
    min_chars: usize,
    threshold: f32,
    exact_cutoff: f32,
}

impl LyricsMatcher {
    pub fn new(min_chars: usize, threshold: f32, exact_cutoff: f32) -> Self {
        Self { min_chars, threshold, exact_cutoff }
    }
}

fn containment(a: &str, b: &str) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    short.chars().count() >= CONTAINMENT_MIN_CHARS && long.contains(short)
}

impl Matcher for LyricsMatcher {
    fn name(&self) -> &'static str {
        "lyrics"
    }

    fn try_match(
        &self,
        text: &str,
        _session: &DetectionSession,
        ctx: &MatchContext<'_>,
    ) -> Option<MatchDecision> {
        if ctx.songs.is_empty() {
            return None;
        }
        let window = normalize(text);
        if window.chars().count() < self.min_chars {
            return None;
        }

        let mut best: Option<(f32, usize, usize)> = None;
        for (song_idx, song) in ctx.songs.songs.iter().enumerate() {
            for (slide_idx, slide) in song.slides.iter().enumerate() {
                let slide_norm = slide.normalized();
                if slide_norm.is_empty() {
                    continue;
                }
                let mut score = dice_coefficient(&window, slide_norm);
                if score < 1.0 && containment(&window, slide_norm) {
                    score = 1.0;
                }
                if best.is_none_or(|(b, _, _)| score > b) {
                    best = Some((score, song_idx, slide_idx));
                }
            }
        }

        let (score, song_idx, slide_idx) = best?;
        if score < self.threshold {
            return None;
        }
        let song = &ctx.songs.songs[song_idx];
        let match_type = if score >= self.exact_cutoff {
            MatchType::Exact
        } else {
            MatchType::Partial
        };
        tracing::debug!(title = %song.title, slide = slide_idx, score, "lyric hit");
        Some(MatchDecision::Song {
            song: SongMatch {
                title: song.title.clone(),
                slide_index: slide_idx,
                slide_content: song.slides[slide_idx].content.clone(),
            },
            match_type,
            confidence: (score * 100.0).round().clamp(0.0, 100.0) as u8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulpit_library::{SongEntry, SongLibrary};

    fn library() -> SongLibrary {
        SongLibrary::new(vec![
            SongEntry::from_lyrics(
                "Amazing Grace",
                "Amazing grace how sweet the sound that saved a wretch like me\n\n\
                 I once was lost but now am found was blind but now I see",
            ),
            SongEntry::from_lyrics(
                "How Great Thou Art",
                "O Lord my God when I in awesome wonder consider all the worlds thy hands have made",
            ),
        ])
    }

    fn try_text(matcher: &LyricsMatcher, songs: &SongLibrary, text: &str) -> Option<MatchDecision> {
        let session = DetectionSession::default();
        let ctx = MatchContext { songs, profile: None };
        matcher.try_match(text, &session, &ctx)
    }

    fn default_matcher() -> LyricsMatcher {
        LyricsMatcher::new(20, 0.45, 0.9)
    }

    #[test]
    fn scenario_exact_lyric_line() {
        let songs = library();
        let decision = try_text(
            &default_matcher(),
            &songs,
            "amazing grace how sweet the sound that saved a wretch like me",
        )
        .unwrap();
        match decision {
            MatchDecision::Song { song, match_type, confidence } => {
                assert_eq!(song.title, "Amazing Grace");
                assert_eq!(song.slide_index, 0);
                assert_eq!(match_type, MatchType::Exact);
                assert_eq!(confidence, 100);
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn partial_lyric_scores_between_thresholds() {
        let songs = library();
        // Close to slide 2 but with drifted wording.
        let decision = try_text(
            &default_matcher(),
            &songs,
            "i once was lost but now i am found was blind and now i can see",
        )
        .unwrap();
        match decision {
            MatchDecision::Song { song, match_type, confidence } => {
                assert_eq!(song.title, "Amazing Grace");
                assert_eq!(song.slide_index, 1);
                assert_eq!(match_type, MatchType::Partial);
                assert!((45..90).contains(&(confidence as i32)), "confidence {confidence}");
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn containment_promotes_to_exact() {
        let songs = library();
        // A verbatim chunk of the slide, shorter than the whole slide.
        let decision = try_text(
            &default_matcher(),
            &songs,
            "when i in awesome wonder consider",
        )
        .unwrap();
        match decision {
            MatchDecision::Song { song, match_type, .. } => {
                assert_eq!(song.title, "How Great Thou Art");
                assert_eq!(match_type, MatchType::Exact);
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn short_windows_never_run() {
        let songs = library();
        assert!(try_text(&default_matcher(), &songs, "amazing grace").is_none());
    }

    #[test]
    fn unrelated_speech_scores_below_threshold() {
        let songs = library();
        assert!(try_text(
            &default_matcher(),
            &songs,
            "please open your bulletins to the announcements section"
        )
        .is_none());
    }

    #[test]
    fn empty_library_is_a_no_op() {
        let songs = SongLibrary::default();
        assert!(try_text(
            &default_matcher(),
            &songs,
            "amazing grace how sweet the sound that saved a wretch like me"
        )
        .is_none());
    }
}
