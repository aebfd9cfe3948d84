//! Spoken-number resolution for verse and chapter targets.
//!
//! Transcripts carry numbers both as digits ("17") and as words
//! ("seventeen", "one hundred and nineteen"). The table below covers every
//! spoken form in the accepted range so matchers can resolve either shape
//! with a single lookup.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Highest verse or chapter number a spoken target may resolve to.
/// Psalm 119 tops out at 176 verses, the longest chapter in the canon.
pub const MAX_VERSE_NUMBER: u16 = 176;

const UNITS: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Every spoken form for 1..=[`MAX_VERSE_NUMBER`], lower-cased.
static NUMBER_WORDS: LazyLock<HashMap<String, u16>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    for n in 1..=MAX_VERSE_NUMBER {
        for form in spoken_forms(n) {
            table.insert(form, n);
        }
    }
    table
});

fn tens_forms(n: u16) -> Vec<String> {
    let tens = TENS[(n / 10) as usize];
    let unit = (n % 10) as usize;
    if unit == 0 {
        vec![tens.to_string()]
    } else {
        vec![
            format!("{tens}-{}", UNITS[unit]),
            format!("{tens} {}", UNITS[unit]),
        ]
    }
}

fn spoken_forms(n: u16) -> Vec<String> {
    match n {
        1..=19 => vec![UNITS[n as usize].to_string()],
        20..=99 => tens_forms(n),
        100 => vec![
            "one hundred".to_string(),
            "a hundred".to_string(),
            "hundred".to_string(),
        ],
        101..=MAX_VERSE_NUMBER => {
            let rest = n - 100;
            let tails = if rest <= 19 {
                vec![UNITS[rest as usize].to_string()]
            } else {
                tens_forms(rest)
            };
            let mut forms = Vec::with_capacity(tails.len() * 3);
            for tail in &tails {
                forms.push(format!("one hundred {tail}"));
                forms.push(format!("one hundred and {tail}"));
                forms.push(format!("a hundred and {tail}"));
            }
            forms
        }
        _ => Vec::new(),
    }
}

/// True when `n` is a plausible verse or chapter number.
pub fn in_verse_range(n: u16) -> bool {
    (1..=MAX_VERSE_NUMBER).contains(&n)
}

/// Resolves a digit run or a spoken number phrase to an integer.
///
/// Returns `None` for anything outside 1..=[`MAX_VERSE_NUMBER`], so callers
/// get implausible targets ("verse 500") rejected for free.
pub fn parse_spoken_number(text: &str) -> Option<u16> {
    let key = text.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    if key.chars().all(|c| c.is_ascii_digit()) {
        let n: u16 = key.parse().ok()?;
        return in_verse_range(n).then_some(n);
    }
    NUMBER_WORDS.get(key.as_str()).copied()
}

/// Regex fragment matching a digit run or a spoken number phrase.
///
/// The word branches are deliberately loose; callers must validate captures
/// with [`parse_spoken_number`] and treat a failed parse as no match.
pub fn spoken_number_pattern() -> &'static str {
    r"\d{1,3}|(?:one|a)\s+hundred(?:\s+(?:and\s+)?[a-z]+(?:[\s-][a-z]+)?)?|[a-z]+(?:[\s-][a-z]+)?"
}
