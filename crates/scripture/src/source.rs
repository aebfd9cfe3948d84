//! Verse text providers.

use std::collections::HashMap;

use async_trait::async_trait;

use pulpit_lexicon::books;

use crate::{BibleRef, Result};

/// Wherever verse text comes from: a bundled database, an HTTP API, or a
/// host-side callback. Lookups are keyed by book name as the provider
/// spells it, which is why callers go through [`lookup_with_variants`].
#[async_trait]
pub trait VerseSource: Send + Sync {
    /// Returns the verse text, `None` when the provider has no such verse.
    async fn verse_text(
        &self,
        book: &str,
        chapter: u16,
        verse: u16,
        version: Option<&str>,
    ) -> Result<Option<String>>;
}

/// Looks up a single verse, retrying alternate book spellings when the
/// canonical name comes back empty.
pub async fn lookup_with_variants(
    source: &dyn VerseSource,
    reference: &BibleRef,
    version: Option<&str>,
) -> Result<Option<String>> {
    let mut names = books::lookup_variants(&reference.book);
    if names.is_empty() {
        // Book name from outside the registry, e.g. a remote backend; try as-is.
        return source
            .verse_text(&reference.book, reference.chapter, reference.verse, version)
            .await;
    }
    let canonical = names.remove(0);
    if let Some(text) = source
        .verse_text(canonical, reference.chapter, reference.verse, version)
        .await?
    {
        return Ok(Some(text));
    }
    for name in names {
        if let Some(text) = source
            .verse_text(name, reference.chapter, reference.verse, version)
            .await?
        {
            tracing::debug!(book = %reference.book, variant = %name, "verse found under variant spelling");
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Looks up a verse range, joining consecutive verses with a space.
///
/// The first verse decides which spelling works; later verses in the range
/// that are missing are skipped rather than failing the whole lookup.
pub async fn lookup_range_with_variants(
    source: &dyn VerseSource,
    reference: &BibleRef,
    version: Option<&str>,
) -> Result<Option<String>> {
    let Some(first) = lookup_with_variants(source, reference, version).await? else {
        return Ok(None);
    };
    let Some(end) = reference.verse_end else {
        return Ok(Some(first));
    };

    let mut joined = first;
    for verse in reference.verse + 1..=end {
        let next = BibleRef::new(reference.book.clone(), reference.chapter, verse);
        if let Some(text) = lookup_with_variants(source, &next, version).await? {
            joined.push(' ');
            joined.push_str(&text);
        }
    }
    Ok(Some(joined))
}

/// In-memory [`VerseSource`] for demos and tests.
#[derive(Debug, Default)]
pub struct StaticVerseSource {
    verses: HashMap<(String, u16, u16), String>,
}

impl StaticVerseSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, book: &str, chapter: u16, verse: u16, text: &str) {
        self.verses
            .insert((book.to_string(), chapter, verse), text.to_string());
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

#[async_trait]
impl VerseSource for StaticVerseSource {
    async fn verse_text(
        &self,
        book: &str,
        chapter: u16,
        verse: u16,
        _version: Option<&str>,
    ) -> Result<Option<String>> {
        Ok(self
            .verses
            .get(&(book.to_string(), chapter, verse))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_source() -> StaticVerseSource {
        let mut source = StaticVerseSource::new();
        source.insert("John", 3, 16, "For God so loved the world");
        source.insert("John", 3, 17, "For God did not send his Son to condemn");
        source.insert("Psalm", 23, 1, "The Lord is my shepherd");
        source
    }

    #[tokio::test]
    async fn direct_lookup_hits() {
        let source = sample_source();
        let text = lookup_with_variants(&source, &BibleRef::new("John", 3, 16), None)
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("For God so loved the world"));
    }

    #[tokio::test]
    async fn variant_spelling_recovers_miss() {
        // Source stores "Psalm" singular; canonical is "Psalms".
        let source = sample_source();
        let text = lookup_with_variants(&source, &BibleRef::new("Psalms", 23, 1), None)
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("The Lord is my shepherd"));
    }

    #[tokio::test]
    async fn unknown_book_tried_as_is() {
        let mut source = StaticVerseSource::new();
        source.insert("Odes", 1, 1, "not canon");
        let text = lookup_with_variants(&source, &BibleRef::new("Odes", 1, 1), None)
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("not canon"));
    }

    #[tokio::test]
    async fn missing_verse_is_none() {
        let source = sample_source();
        let text = lookup_with_variants(&source, &BibleRef::new("John", 99, 1), None)
            .await
            .unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn range_lookup_joins_verses() {
        let source = sample_source();
        let text = lookup_range_with_variants(&source, &BibleRef::with_end("John", 3, 16, 17), None)
            .await
            .unwrap()
            .unwrap();
        assert!(text.starts_with("For God so loved"));
        assert!(text.ends_with("condemn"));
    }

    #[tokio::test]
    async fn range_skips_missing_tail_verses() {
        let source = sample_source();
        let text = lookup_range_with_variants(&source, &BibleRef::with_end("John", 3, 16, 18), None)
            .await
            .unwrap()
            .unwrap();
        // verse 18 missing from the source; range still renders 16-17
        assert!(text.contains("condemn"));
    }
}
