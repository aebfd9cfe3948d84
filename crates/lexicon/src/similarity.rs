//! Text normalization and fuzzy similarity.
//!
//! The lyric matcher compares a live transcript window against slide text
//! with the Sørensen–Dice coefficient over character bigrams. Both sides go
//! through [`normalize`] first so punctuation and casing never influence the
//! score.

use std::collections::HashMap;

/// Lower-cases, strips punctuation, collapses whitespace runs.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            for lc in c.to_lowercase() {
                out.push(lc);
            }
        } else {
            pending_space = true;
        }
    }
    out
}

fn bigrams(s: &str) -> Vec<[char; 2]> {
    let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    chars.windows(2).map(|w| [w[0], w[1]]).collect()
}

/// Sørensen–Dice coefficient over character bigrams, in `0.0..=1.0`.
///
/// Bigram counts are treated as multisets, so repeated fragments weigh in
/// proportionally. Inputs shorter than one bigram only score 1.0 on exact
/// equality.
pub fn dice_coefficient(a: &str, b: &str) -> f32 {
    let a_grams = bigrams(a);
    let b_grams = bigrams(b);
    if a_grams.is_empty() || b_grams.is_empty() {
        return if !a.is_empty() && a == b { 1.0 } else { 0.0 };
    }

    let mut counts: HashMap<[char; 2], u32> = HashMap::with_capacity(a_grams.len());
    for gram in &a_grams {
        *counts.entry(*gram).or_insert(0) += 1;
    }
    let mut overlap = 0u32;
    for gram in &b_grams {
        if let Some(count) = counts.get_mut(gram) {
            if *count > 0 {
                *count -= 1;
                overlap += 1;
            }
        }
    }
    (2.0 * overlap as f32) / (a_grams.len() + b_grams.len()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Amazing Grace, how sweet!"), "amazing grace how sweet");
        assert_eq!(normalize("  John   3:16  "), "john 3 16");
        assert_eq!(normalize("...!?"), "");
    }

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(dice_coefficient("amazing grace", "amazing grace"), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(dice_coefficient("abcd", "wxyz"), 0.0);
    }

    #[test]
    fn near_matches_score_high() {
        let score = dice_coefficient("amazing grace how sweet the sound", "amazing grace how sweet the son");
        assert!(score > 0.9, "score {score}");
    }

    #[test]
    fn unrelated_text_scores_low() {
        let score = dice_coefficient("amazing grace how sweet the sound", "turn with me to the book of romans");
        assert!(score < 0.45, "score {score}");
    }

    #[test]
    fn short_inputs_only_match_exactly() {
        assert_eq!(dice_coefficient("a", "a"), 1.0);
        assert_eq!(dice_coefficient("a", "b"), 0.0);
        assert_eq!(dice_coefficient("", ""), 0.0);
    }

    #[test]
    fn repeated_bigrams_weigh_as_multisets() {
        // "aaaa" has three "aa" bigrams, "aa" has one; overlap is capped by counts
        let score = dice_coefficient("aaaa", "aa");
        assert!((score - 0.5).abs() < 1e-6, "score {score}");
    }
}
