//! Scripture domain types.
//!
//! [`BibleRef`] is the canonical reference shape flowing through the
//! pipeline. [`VerseSource`] abstracts wherever verse text actually comes
//! from (bundled database, HTTP API, host callback) so the engine never
//! couples to a provider.

mod reference;
mod source;
mod versions;

use thiserror::Error;

pub use reference::BibleRef;
pub use source::{lookup_range_with_variants, lookup_with_variants, StaticVerseSource, VerseSource};
pub use versions::{scan_aliases, translation_by_code, ScanAlias, TranslationInfo, TRANSLATIONS};

#[derive(Debug, Error)]
pub enum ScriptureError {
    #[error("verse lookup failed: {0}")]
    Lookup(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

pub type Result<T> = std::result::Result<T, ScriptureError>;
