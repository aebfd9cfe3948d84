//! Bible translation registry.
//!
//! Spoken aliases come in two grades. Safe aliases ("niv", "king james")
//! basically never occur outside a translation request. Risky aliases
//! ("the message", "the voice", "standard") collide with ordinary sermon
//! speech, so the matcher only honors them next to a command verb or a
//! trailing qualifier.

use std::sync::LazyLock;

use pulpit_lexicon::normalize;

#[derive(Debug)]
pub struct TranslationInfo {
    /// Short code used in navigation commands and lookups.
    pub code: &'static str,
    /// Full display name.
    pub name: &'static str,
    /// Spoken forms safe to act on directly.
    pub aliases: &'static [&'static str],
    /// Spoken forms that collide with ordinary speech.
    pub risky_aliases: &'static [&'static str],
}

macro_rules! translation {
    ($code:literal, $name:literal, [$($alias:literal),* $(,)?]) => {
        TranslationInfo { code: $code, name: $name, aliases: &[$($alias),*], risky_aliases: &[] }
    };
    ($code:literal, $name:literal, [$($alias:literal),* $(,)?], risky [$($risky:literal),* $(,)?]) => {
        TranslationInfo { code: $code, name: $name, aliases: &[$($alias),*], risky_aliases: &[$($risky),*] }
    };
}

pub static TRANSLATIONS: [TranslationInfo; 24] = [
    translation!("KJV", "King James Version", ["kjv", "king james version", "king james"]),
    translation!("NKJV", "New King James Version", ["nkjv", "new king james version", "new king james"]),
    translation!("NIV", "New International Version", ["niv", "new international version", "new international"]),
    translation!("ESV", "English Standard Version", ["esv", "english standard version", "english standard"], risky["standard"]),
    translation!("NLT", "New Living Translation", ["nlt", "new living translation", "new living"]),
    translation!("NASB", "New American Standard Bible", ["nasb", "new american standard bible", "new american standard"]),
    translation!("AMP", "Amplified Bible", ["amplified bible", "amplified"], risky["amp"]),
    translation!("MSG", "The Message", ["msg"], risky["the message", "message"]),
    translation!("CSB", "Christian Standard Bible", ["csb", "christian standard bible", "christian standard"]),
    translation!("HCSB", "Holman Christian Standard Bible", ["hcsb", "holman christian standard", "holman"]),
    translation!("RSV", "Revised Standard Version", ["rsv", "revised standard version", "revised standard"]),
    translation!("NRSV", "New Revised Standard Version", ["nrsv", "new revised standard version", "new revised standard"]),
    translation!("ASV", "American Standard Version", ["asv", "american standard version", "american standard"]),
    translation!("CEV", "Contemporary English Version", ["cev", "contemporary english version", "contemporary english"]),
    translation!("GNT", "Good News Translation", ["gnt", "good news translation", "good news bible"], risky["good news"]),
    translation!("TPT", "The Passion Translation", ["tpt", "passion translation"], risky["the passion", "passion"]),
    translation!("VOICE", "The Voice", ["voice bible"], risky["the voice", "voice"]),
    translation!("WEB", "World English Bible", ["world english bible", "world english"], risky["web"]),
    translation!("YLT", "Young's Literal Translation", ["ylt", "young's literal translation", "young's literal"]),
    translation!("TLB", "The Living Bible", ["tlb", "living bible"]),
    translation!("NCV", "New Century Version", ["ncv", "new century version", "new century"]),
    translation!("ERV", "Easy-to-Read Version", ["erv", "easy to read version", "easy to read"]),
    translation!("GW", "God's Word Translation", ["god's word translation"], risky["god's word", "the word"]),
    translation!("NET", "New English Translation", ["net bible"], risky["net"]),
];

/// A pre-normalized alias ready for transcript scanning.
#[derive(Debug)]
pub struct ScanAlias {
    /// Alias after [`normalize`], matching how transcript text is prepared.
    pub normalized: String,
    pub info: &'static TranslationInfo,
    pub risky: bool,
}

static SCAN_ALIASES: LazyLock<Vec<ScanAlias>> = LazyLock::new(|| {
    let mut out = Vec::new();
    for info in &TRANSLATIONS {
        for alias in info.aliases {
            out.push(ScanAlias { normalized: normalize(alias), info, risky: false });
        }
        for alias in info.risky_aliases {
            out.push(ScanAlias { normalized: normalize(alias), info, risky: true });
        }
    }
    // Longest first so "new king james" wins over "king james".
    out.sort_by_key(|a| std::cmp::Reverse(a.normalized.len()));
    out
});

/// All spoken aliases, normalized, longest first.
pub fn scan_aliases() -> &'static [ScanAlias] {
    &SCAN_ALIASES
}

/// Case-insensitive lookup by short code.
pub fn translation_by_code(code: &str) -> Option<&'static TranslationInfo> {
    TRANSLATIONS.iter().find(|t| t.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_resolve_case_insensitively() {
        assert_eq!(translation_by_code("niv").map(|t| t.code), Some("NIV"));
        assert_eq!(translation_by_code("Esv").map(|t| t.code), Some("ESV"));
        assert!(translation_by_code("XYZ").is_none());
    }

    #[test]
    fn scan_aliases_are_sorted_longest_first() {
        let aliases = scan_aliases();
        for pair in aliases.windows(2) {
            assert!(pair[0].normalized.len() >= pair[1].normalized.len());
        }
    }

    #[test]
    fn risky_flag_survives_scan_table() {
        let message = scan_aliases()
            .iter()
            .find(|a| a.normalized == "the message")
            .unwrap();
        assert!(message.risky);
        assert_eq!(message.info.code, "MSG");

        let niv = scan_aliases().iter().find(|a| a.normalized == "niv").unwrap();
        assert!(!niv.risky);
    }

    #[test]
    fn aliases_normalize_apostrophes() {
        // "god's word" normalizes the same way transcript text does
        let gods_word = scan_aliases()
            .iter()
            .find(|a| a.info.code == "GW" && a.risky && a.normalized.starts_with("god"))
            .unwrap();
        assert_eq!(gods_word.normalized, normalize("God's word"));
    }
}
