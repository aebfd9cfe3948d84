//! Shared spoken-language lexicon.
//!
//! Everything in this crate is pure data and pure functions: the Bible book
//! registry with its spoken aliases, the spoken-number table used for verse
//! and chapter targets, and the normalization / similarity primitives the
//! matchers are built on. No IO, no async, no state.

pub mod books;
pub mod numbers;
pub mod similarity;

pub use books::{book_info, canonical_book, contains_book_name, lookup_variants, BookInfo, BOOKS};
pub use numbers::{in_verse_range, parse_spoken_number, MAX_VERSE_NUMBER};
pub use similarity::{dice_coefficient, normalize};
