//! Bible book registry.
//!
//! One entry per canonical book, carrying the lower-cased spoken aliases a
//! transcript may contain ("first john", "psalm", "revelations") and the
//! alternate spellings a verse provider may want when the canonical name
//! misses ("Psalms" vs "Psalm", "Song of Solomon" vs "Song of Songs").

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::similarity::normalize;

#[derive(Debug)]
pub struct BookInfo {
    /// Canonical display name used in references.
    pub canonical: &'static str,
    /// Lower-case spoken forms that resolve to this book, canonical included.
    pub aliases: &'static [&'static str],
    /// Alternate spellings tried when a provider rejects the canonical name.
    pub lookup_variants: &'static [&'static str],
}

macro_rules! book {
    ($canonical:literal, [$($alias:literal),* $(,)?]) => {
        BookInfo { canonical: $canonical, aliases: &[$($alias),*], lookup_variants: &[] }
    };
    ($canonical:literal, [$($alias:literal),* $(,)?], variants [$($variant:literal),* $(,)?]) => {
        BookInfo { canonical: $canonical, aliases: &[$($alias),*], lookup_variants: &[$($variant),*] }
    };
}

/// All 66 books in canonical order.
pub static BOOKS: [BookInfo; 66] = [
    book!("Genesis", ["genesis"]),
    book!("Exodus", ["exodus"]),
    book!("Leviticus", ["leviticus"]),
    book!("Numbers", ["numbers"]),
    book!("Deuteronomy", ["deuteronomy"]),
    book!("Joshua", ["joshua"]),
    book!("Judges", ["judges"]),
    book!("Ruth", ["ruth"]),
    book!("1 Samuel", ["1 samuel", "first samuel", "1st samuel"]),
    book!("2 Samuel", ["2 samuel", "second samuel", "2nd samuel"]),
    book!("1 Kings", ["1 kings", "first kings", "1st kings"]),
    book!("2 Kings", ["2 kings", "second kings", "2nd kings"]),
    book!("1 Chronicles", ["1 chronicles", "first chronicles", "1st chronicles"]),
    book!("2 Chronicles", ["2 chronicles", "second chronicles", "2nd chronicles"]),
    book!("Ezra", ["ezra"]),
    book!("Nehemiah", ["nehemiah"]),
    book!("Esther", ["esther"]),
    book!("Job", ["job"]),
    book!("Psalms", ["psalms", "psalm"], variants["Psalm"]),
    book!("Proverbs", ["proverbs", "proverb"]),
    book!("Ecclesiastes", ["ecclesiastes"]),
    book!(
        "Song of Solomon",
        ["song of solomon", "songs of solomon", "song of songs"],
        variants["Song of Songs"]
    ),
    book!("Isaiah", ["isaiah"]),
    book!("Jeremiah", ["jeremiah"]),
    book!("Lamentations", ["lamentations"]),
    book!("Ezekiel", ["ezekiel"]),
    book!("Daniel", ["daniel"]),
    book!("Hosea", ["hosea"]),
    book!("Joel", ["joel"]),
    book!("Amos", ["amos"]),
    book!("Obadiah", ["obadiah"]),
    book!("Jonah", ["jonah"]),
    book!("Micah", ["micah"]),
    book!("Nahum", ["nahum"]),
    book!("Habakkuk", ["habakkuk"]),
    book!("Zephaniah", ["zephaniah"]),
    book!("Haggai", ["haggai"]),
    book!("Zechariah", ["zechariah"]),
    book!("Malachi", ["malachi"]),
    book!("Matthew", ["matthew"]),
    book!("Mark", ["mark"]),
    book!("Luke", ["luke"]),
    book!("John", ["john"]),
    book!("Acts", ["acts", "acts of the apostles"]),
    book!("Romans", ["romans"]),
    book!("1 Corinthians", ["1 corinthians", "first corinthians", "1st corinthians"]),
    book!("2 Corinthians", ["2 corinthians", "second corinthians", "2nd corinthians"]),
    book!("Galatians", ["galatians"]),
    book!("Ephesians", ["ephesians"]),
    book!("Philippians", ["philippians"]),
    book!("Colossians", ["colossians"]),
    book!("1 Thessalonians", ["1 thessalonians", "first thessalonians", "1st thessalonians"]),
    book!("2 Thessalonians", ["2 thessalonians", "second thessalonians", "2nd thessalonians"]),
    book!("1 Timothy", ["1 timothy", "first timothy", "1st timothy"]),
    book!("2 Timothy", ["2 timothy", "second timothy", "2nd timothy"]),
    book!("Titus", ["titus"]),
    book!("Philemon", ["philemon"]),
    book!("Hebrews", ["hebrews"]),
    book!("James", ["james"]),
    book!("1 Peter", ["1 peter", "first peter", "1st peter"]),
    book!("2 Peter", ["2 peter", "second peter", "2nd peter"]),
    book!("1 John", ["1 john", "first john", "1st john"]),
    book!("2 John", ["2 john", "second john", "2nd john"]),
    book!("3 John", ["3 john", "third john", "3rd john"]),
    book!("Jude", ["jude"]),
    book!("Revelation", ["revelation", "revelations", "the revelation"]),
];

static ALIAS_INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    let mut index = HashMap::new();
    for (i, book) in BOOKS.iter().enumerate() {
        for alias in book.aliases {
            index.insert(*alias, i);
        }
    }
    index
});

/// Alternation over every alias, longest first, for embedding in larger
/// patterns. Spaces inside aliases match any whitespace run.
static BOOK_PATTERN_SOURCE: LazyLock<String> = LazyLock::new(|| {
    let mut aliases: Vec<&str> = BOOKS.iter().flat_map(|b| b.aliases.iter().copied()).collect();
    aliases.sort_by_key(|a| std::cmp::Reverse(a.len()));
    let branches: Vec<String> = aliases.iter().map(|a| a.replace(' ', r"\s+")).collect();
    branches.join("|")
});

static BOOK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", *BOOK_PATTERN_SOURCE))
        .unwrap_or_else(|e| panic!("book pattern failed to compile: {e}"))
});

/// Resolves any spoken alias to the canonical book name.
pub fn canonical_book(name: &str) -> Option<&'static str> {
    let key = normalize(name);
    ALIAS_INDEX.get(key.as_str()).map(|&i| BOOKS[i].canonical)
}

/// Registry entry for a canonical name.
pub fn book_info(canonical: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|b| b.canonical == canonical)
}

/// True when the text mentions any recognizable book name.
pub fn contains_book_name(text: &str) -> bool {
    BOOK_PATTERN.is_match(text)
}

/// Alias alternation for embedding in larger regexes (no boundaries, no
/// case flag; callers add their own).
pub fn book_pattern_source() -> &'static str {
    &BOOK_PATTERN_SOURCE
}

/// Names to try against a verse provider, canonical first.
pub fn lookup_variants(canonical: &str) -> Vec<&'static str> {
    match book_info(canonical) {
        Some(book) => {
            let mut names = Vec::with_capacity(1 + book.lookup_variants.len());
            names.push(book.canonical);
            names.extend_from_slice(book.lookup_variants);
            names
        }
        None => Vec::new(),
    }
}
