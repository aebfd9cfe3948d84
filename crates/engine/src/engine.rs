//! The detection engine: transcript fragments in, detection batches out.
//!
//! Every fragment is matched synchronously against the fast-path chain
//! under one short lock. Anything the chain decides is committed to the
//! session right there, before any text lookup is awaited, so two fragments
//! arriving back to back can never race an anchor update. When the chain
//! finds nothing, the fallback runner waits out a debounce and consults the
//! semantic worker, then the remote backend, exactly one of which may emit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use pulpit_events::{
    DetectedScripture, DetectionBatch, DetectionSignal, DetectionSinkRef, MatchType,
    NavigationCommand, SongMatch,
};
use pulpit_lexicon::{books, numbers};
use pulpit_library::{SongLibrary, SpeakerProfile};
use pulpit_matchers::{MatchContext, MatchDecision, MatcherChain};
use pulpit_remote::{validate, DetectRequest, PastorHints, RemoteDetector};
use pulpit_scripture::{lookup_range_with_variants, BibleRef, VerseSource};
use pulpit_semantic::{VerseHit, WorkerHandle};
use pulpit_session::{ContextAnchor, DetectionSession, SessionSnapshot};

use crate::config::EngineConfig;

/// Host-replaceable inputs read during matching.
struct SharedState {
    session: DetectionSession,
    songs: Arc<SongLibrary>,
    profile: Option<SpeakerProfile>,
}

/// Fallback wiring, attached by the host when the pieces come online.
#[derive(Default)]
struct Fallbacks {
    semantic: Option<WorkerHandle>,
    remote: Option<Arc<RemoteDetector>>,
}

/// What a committed decision still owes the sink. Session mutations are
/// already done by the time one of these exists; only I/O remains.
enum EmissionPlan {
    Commands(Vec<NavigationCommand>),
    Scripture {
        target: BibleRef,
        match_type: MatchType,
        confidence: u8,
        verse_count: Option<u8>,
        version: Option<String>,
    },
    Song {
        song: SongMatch,
        match_type: MatchType,
        confidence: u8,
    },
    /// Cooldown ate the command; the window is consumed, nothing goes out.
    Suppressed,
}

struct EngineInner {
    config: EngineConfig,
    chain: MatcherChain,
    shared: Mutex<SharedState>,
    fallbacks: Mutex<Fallbacks>,
    verses: Arc<dyn VerseSource>,
    sink: DetectionSinkRef,
    activity: Notify,
    running: AtomicBool,
    cancel: Mutex<CancellationToken>,
}

/// The live detection pipeline.
///
/// Cheap to clone; all clones share one session. [`start`] spawns the
/// fallback runner; without it the fast path still works, which is how
/// most unit tests drive the engine.
///
/// [`start`]: DetectionEngine::start
#[derive(Clone)]
pub struct DetectionEngine {
    inner: Arc<EngineInner>,
}

impl DetectionEngine {
    pub fn new(config: EngineConfig, verses: Arc<dyn VerseSource>, sink: DetectionSinkRef) -> Self {
        let chain = MatcherChain::standard(&config.chain);
        let session = DetectionSession::new(config.window_words, config.context_chars);
        Self {
            inner: Arc::new(EngineInner {
                config,
                chain,
                shared: Mutex::new(SharedState {
                    session,
                    songs: Arc::new(SongLibrary::default()),
                    profile: None,
                }),
                fallbacks: Mutex::new(Fallbacks::default()),
                verses,
                sink,
                activity: Notify::new(),
                running: AtomicBool::new(false),
                cancel: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    /// Attaches the embedding worker used by the semantic fallback.
    pub fn set_semantic_worker(&self, worker: WorkerHandle) {
        self.inner.fallbacks.lock().unwrap().semantic = Some(worker);
    }

    /// Attaches the remote backend used as the last-resort detector.
    pub fn set_remote_detector(&self, detector: RemoteDetector) {
        self.inner.fallbacks.lock().unwrap().remote = Some(Arc::new(detector));
    }

    /// Spawns the fallback runner. Must be called from within a tokio
    /// runtime. Safe to call again after [`shutdown`](DetectionEngine::shutdown).
    pub fn start(&self) {
        if self.inner.running.swap(true, Ordering::AcqRel) {
            tracing::warn!("detection engine already running");
            return;
        }
        let token = CancellationToken::new();
        let child = token.child_token();
        if let Ok(mut cancel) = self.inner.cancel.lock() {
            *cancel = token;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tracing::info!(debounce_ms = inner.config.debounce.as_millis() as u64, "fallback runner started");
            'outer: loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break 'outer,
                    _ = inner.activity.notified() => {}
                }
                // Debounce: each new fragment pushes the deadline back.
                loop {
                    tokio::select! {
                        biased;
                        _ = child.cancelled() => break 'outer,
                        _ = inner.activity.notified() => {}
                        _ = tokio::time::sleep(inner.config.debounce) => break,
                    }
                }
                inner.run_fallbacks().await;
            }
            inner.running.store(false, Ordering::Release);
            tracing::info!("fallback runner stopped");
        });
    }

    /// Stops the fallback runner. Session state survives; use
    /// [`reset`](DetectionEngine::reset) to also discard it.
    pub fn shutdown(&self) {
        if let Ok(cancel) = self.inner.cancel.lock() {
            cancel.cancel();
        }
        self.inner.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Feeds one transcript fragment through the pipeline.
    ///
    /// This is the `addText` entry point: call it once per ASR result,
    /// final or interim. Matching and every session mutation happen
    /// synchronously before the first await.
    pub async fn add_text(&self, text: &str, is_final: bool) {
        let plan = {
            let mut guard = self.inner.shared.lock().unwrap();
            let shared = &mut *guard;
            let examined = shared.session.push_fragment(text, is_final);
            if examined.trim().is_empty() {
                return;
            }
            let ctx = MatchContext {
                songs: shared.songs.as_ref(),
                profile: shared.profile.as_ref(),
            };
            match self.inner.chain.evaluate(&examined, &shared.session, &ctx) {
                Some((matcher, decision)) => {
                    Some(self.inner.commit(&mut shared.session, matcher, decision))
                }
                None => None,
            }
        };

        match plan {
            Some(plan) => self.inner.deliver(plan).await,
            // Nothing matched; arm the debounced fallbacks.
            None => self.inner.activity.notify_one(),
        }
    }

    /// Discards all session state: window, anchor, cooldowns, version.
    pub fn reset(&self) {
        self.inner.shared.lock().unwrap().session.reset();
        tracing::info!("detection session reset");
    }

    /// Swaps in a fresh song library snapshot.
    pub fn set_song_library(&self, mut songs: SongLibrary) {
        songs.reindex();
        let mut shared = self.inner.shared.lock().unwrap();
        tracing::debug!(songs = songs.song_count(), slides = songs.slide_count(), "song library replaced");
        shared.songs = Arc::new(songs);
    }

    pub fn set_profile(&self, profile: Option<SpeakerProfile>) {
        self.inner.shared.lock().unwrap().profile = profile;
    }

    pub fn anchor(&self) -> Option<ContextAnchor> {
        self.inner.shared.lock().unwrap().session.anchor().cloned()
    }

    pub fn current_version(&self) -> Option<String> {
        self.inner
            .shared
            .lock()
            .unwrap()
            .session
            .current_version()
            .map(str::to_string)
    }
}

impl EngineInner {
    /// Applies a fast-path decision to the session. Runs under the shared
    /// lock; must not await.
    fn commit(
        &self,
        session: &mut DetectionSession,
        matcher: &'static str,
        decision: MatchDecision,
    ) -> EmissionPlan {
        match decision {
            MatchDecision::Command(command) => {
                let key = command.kind_key();
                if !session.command_allowed(&key, self.config.command_cooldown) {
                    // Spoken again for emphasis; swallow the words so they
                    // cannot re-fire, emit nothing.
                    tracing::debug!(matcher, command = %key, "command suppressed by cooldown");
                    session.consume_window();
                    return EmissionPlan::Suppressed;
                }
                match &command {
                    NavigationCommand::SwitchTranslation { version } => {
                        session.set_current_version(version.clone());
                    }
                    NavigationCommand::Clear => {
                        session.clear_anchor();
                    }
                    _ => {}
                }
                session.consume_window();
                tracing::info!(matcher, command = %key, "command detected");
                EmissionPlan::Commands(vec![command])
            }
            MatchDecision::Reference { target, match_type, confidence, verse_count } => {
                session.set_anchor(target.book.clone(), target.chapter);
                session.note_emitted(
                    &target.book,
                    target.chapter,
                    target.verse,
                    &target.to_string(),
                );
                let version = session
                    .current_version()
                    .map(str::to_string)
                    .or_else(|| self.config.default_version.clone());
                session.consume_window();
                tracing::info!(matcher, reference = %target, confidence, "scripture detected");
                EmissionPlan::Scripture { target, match_type, confidence, verse_count, version }
            }
            MatchDecision::Song { song, match_type, confidence } => {
                session.consume_window();
                tracing::info!(matcher, title = %song.title, confidence, "song detected");
                EmissionPlan::Song { song, match_type, confidence }
            }
        }
    }

    /// Resolves text and pushes the batch out. The session is already
    /// committed; a failed lookup here drops the emission and nothing else.
    async fn deliver(&self, plan: EmissionPlan) {
        match plan {
            EmissionPlan::Suppressed => {}
            EmissionPlan::Commands(commands) => {
                self.sink.on_detect(DetectionBatch {
                    scriptures: Vec::new(),
                    commands,
                    signal: DetectionSignal::Switch,
                    verse_count: None,
                });
            }
            EmissionPlan::Scripture { target, match_type, confidence, verse_count, version } => {
                let text = match lookup_range_with_variants(
                    self.verses.as_ref(),
                    &target,
                    version.as_deref(),
                )
                .await
                {
                    Ok(Some(text)) => text,
                    Ok(None) => {
                        tracing::warn!(reference = %target, "verse text not found, dropping detection");
                        return;
                    }
                    Err(e) => {
                        tracing::warn!(reference = %target, error = %e, "verse lookup failed, dropping detection");
                        return;
                    }
                };
                self.sink.on_detect(DetectionBatch {
                    scriptures: vec![DetectedScripture {
                        book: target.book.clone(),
                        chapter: target.chapter,
                        verse: target.verse,
                        verse_end: target.verse_end,
                        text,
                        reference: target.to_string(),
                        confidence,
                        match_type,
                        version,
                        song_data: None,
                    }],
                    commands: Vec::new(),
                    signal: DetectionSignal::Switch,
                    verse_count,
                });
            }
            EmissionPlan::Song { song, match_type, confidence } => {
                self.sink.on_detect(DetectionBatch {
                    scriptures: vec![DetectedScripture {
                        book: song.title.clone(),
                        chapter: 0,
                        verse: 0,
                        verse_end: None,
                        text: song.slide_content.clone(),
                        reference: song.title.clone(),
                        confidence,
                        match_type,
                        version: None,
                        song_data: Some(song),
                    }],
                    commands: Vec::new(),
                    signal: DetectionSignal::Switch,
                    verse_count: None,
                });
            }
        }
    }

    /// One debounced slow-path cycle: semantic first, then remote, at most
    /// one emission between them.
    async fn run_fallbacks(&self) {
        let (snapshot, profile, semantic, remote) = {
            let shared = self.shared.lock().unwrap();
            let fallbacks = self.fallbacks.lock().unwrap();
            (
                shared.session.snapshot(),
                shared.profile.clone(),
                fallbacks.semantic.clone(),
                fallbacks.remote.clone(),
            )
        };
        if snapshot.window_text.trim().is_empty() {
            return;
        }

        if let Some(worker) = semantic {
            if self.try_semantic(&worker, &snapshot).await {
                return;
            }
        }
        if let Some(detector) = remote {
            self.try_remote(detector.as_ref(), &snapshot, profile.as_ref()).await;
        }
    }

    /// Returns true when this cycle is finished, either because the
    /// semantic path emitted or because a newer detection superseded it.
    async fn try_semantic(&self, worker: &WorkerHandle, snapshot: &SessionSnapshot) -> bool {
        if snapshot.window_text.chars().count() < self.config.semantic_min_chars
            || !worker.is_ready()
        {
            return false;
        }

        let hits = match worker
            .search(
                &snapshot.window_text,
                self.config.semantic_threshold,
                self.config.semantic_max_results,
            )
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, "semantic search failed");
                return false;
            }
        };

        // Hits whose reference does not parse carry no usable coordinates.
        let parsed: Vec<(BibleRef, VerseHit)> = hits
            .into_iter()
            .filter_map(|hit| match BibleRef::parse(&hit.reference) {
                Some(target) => Some((target, hit)),
                None => {
                    tracing::debug!(reference = %hit.reference, "unparseable semantic reference");
                    None
                }
            })
            .collect();
        if parsed.is_empty() {
            return false;
        }

        let version = {
            let mut shared = self.shared.lock().unwrap();
            if shared.session.generation() != snapshot.generation {
                tracing::debug!("semantic result superseded by a newer detection");
                return true;
            }
            let session = &mut shared.session;
            // Reversed so the top hit ends up as the current reference.
            for (target, _) in parsed.iter().rev() {
                session.note_emitted(
                    &target.book,
                    target.chapter,
                    target.verse,
                    &target.to_string(),
                );
            }
            let (top, _) = &parsed[0];
            session.set_anchor(top.book.clone(), top.chapter);
            session.consume_window();
            session
                .current_version()
                .map(str::to_string)
                .or_else(|| self.config.default_version.clone())
        };

        let scriptures: Vec<DetectedScripture> = parsed
            .into_iter()
            .map(|(target, hit)| DetectedScripture {
                book: target.book.clone(),
                chapter: target.chapter,
                verse: target.verse,
                verse_end: target.verse_end,
                text: hit.text,
                reference: target.to_string(),
                confidence: hit.confidence,
                match_type: MatchType::Paraphrase,
                version: version.clone(),
                song_data: None,
            })
            .collect();
        tracing::info!(
            top = %scriptures[0].reference,
            hits = scriptures.len(),
            "semantic fallback matched"
        );
        self.sink.on_detect(DetectionBatch {
            scriptures,
            commands: Vec::new(),
            signal: DetectionSignal::Switch,
            verse_count: None,
        });
        true
    }

    async fn try_remote(
        &self,
        detector: &RemoteDetector,
        snapshot: &SessionSnapshot,
        profile: Option<&SpeakerProfile>,
    ) {
        if !detector.is_available() {
            return;
        }
        // With no anchor yet, the speaker's first focus book still narrows
        // the backend's guess.
        let chapter_context = snapshot
            .anchor
            .as_ref()
            .map(|a| a.to_string())
            .or_else(|| profile.and_then(|p| p.focus_books.first().cloned()));
        let request = DetectRequest {
            text: snapshot.window_text.clone(),
            context: snapshot.context_text.clone(),
            pastor_hints: profile.map(|p| PastorHints {
                sermon_theme: p.sermon_theme.clone(),
                focus_books: p.focus_books.clone(),
            }),
            current_verse: snapshot.last_reference.clone(),
            chapter_context,
        };

        let mut response = match detector.detect(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "remote detection failed");
                return;
            }
        };

        let anchor_pair = snapshot.anchor.as_ref().map(|a| (a.book.as_str(), a.chapter));
        validate::apply_anchor_boost(&mut response.scriptures, anchor_pair);
        validate::retain_confident(&mut response.scriptures, self.config.remote_min_confidence);
        // Canonicalize book names and reject implausible verses before
        // anything can touch the session.
        response.scriptures.retain_mut(|scripture| {
            if !numbers::in_verse_range(scripture.verse) {
                tracing::debug!(book = %scripture.book, verse = scripture.verse, "rejecting out-of-range remote verse");
                return false;
            }
            if let Some(canonical) = books::canonical_book(&scripture.book) {
                scripture.book = canonical.to_string();
            }
            true
        });
        if !validate::should_emit(&response) {
            tracing::debug!("remote response carries nothing actionable");
            return;
        }

        // Session mutations happen here, synchronously, before any lookup.
        let (accepted, commands, version) = {
            let mut shared = self.shared.lock().unwrap();
            if shared.session.generation() != snapshot.generation {
                tracing::debug!("remote result superseded by a newer detection");
                return;
            }
            let session = &mut shared.session;

            let mut accepted = Vec::new();
            for scripture in response.scriptures.drain(..) {
                let target = BibleRef {
                    book: scripture.book.clone(),
                    chapter: scripture.chapter,
                    verse: scripture.verse,
                    verse_end: scripture.verse_end,
                };
                if session.recently_emitted(
                    &target.book,
                    target.chapter,
                    target.verse,
                    self.config.recency_window,
                ) {
                    tracing::debug!(reference = %target, "deduplicating recently emitted verse");
                    continue;
                }
                session.set_anchor(target.book.clone(), target.chapter);
                session.note_emitted(
                    &target.book,
                    target.chapter,
                    target.verse,
                    &target.to_string(),
                );
                accepted.push((target, scripture));
            }

            let mut commands = Vec::new();
            for command in response.commands.drain(..) {
                let key = command.kind_key();
                if !session.command_allowed(&key, self.config.command_cooldown) {
                    tracing::debug!(command = %key, "remote command suppressed by cooldown");
                    continue;
                }
                if let NavigationCommand::SwitchTranslation { version } = &command {
                    session.set_current_version(version.clone());
                }
                if matches!(command, NavigationCommand::Clear) {
                    session.clear_anchor();
                }
                commands.push(command);
            }

            if accepted.is_empty()
                && commands.is_empty()
                && response.signal != DetectionSignal::Switch
            {
                // Everything got deduplicated or cooled down.
                return;
            }
            session.consume_window();
            let version = session
                .current_version()
                .map(str::to_string)
                .or_else(|| self.config.default_version.clone());
            (accepted, commands, version)
        };

        let mut scriptures = Vec::with_capacity(accepted.len());
        for (target, scripture) in accepted {
            let lookup_version = scripture.version.clone().or_else(|| version.clone());
            let text = match lookup_range_with_variants(
                self.verses.as_ref(),
                &target,
                lookup_version.as_deref(),
            )
            .await
            {
                Ok(Some(text)) => text,
                Ok(None) => match scripture.text {
                    // The backend saw the verse; trust its copy of the text.
                    Some(text) => {
                        tracing::debug!(reference = %target, "lookup missed, using backend text");
                        text
                    }
                    None => {
                        tracing::warn!(reference = %target, "dropping remote scripture with no resolvable text");
                        continue;
                    }
                },
                Err(e) => {
                    tracing::warn!(reference = %target, error = %e, "verse lookup failed for remote scripture");
                    match scripture.text {
                        Some(text) => text,
                        None => continue,
                    }
                }
            };
            scriptures.push(DetectedScripture {
                book: target.book.clone(),
                chapter: target.chapter,
                verse: target.verse,
                verse_end: target.verse_end,
                text,
                reference: target.to_string(),
                confidence: scripture.confidence,
                match_type: scripture.match_type,
                version: lookup_version,
                song_data: None,
            });
        }

        tracing::info!(
            scriptures = scriptures.len(),
            commands = commands.len(),
            signal = ?response.signal,
            "remote fallback emitted"
        );
        self.sink.on_detect(DetectionBatch {
            scriptures,
            commands,
            signal: response.signal,
            verse_count: response.verse_count,
        });
    }
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        if let Ok(cancel) = self.cancel.lock() {
            cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulpit_events::InMemorySink;
    use pulpit_library::SongEntry;
    use pulpit_scripture::StaticVerseSource;

    fn sample_source() -> Arc<StaticVerseSource> {
        let mut source = StaticVerseSource::new();
        source.insert("Genesis", 1, 1, "In the beginning God created the heavens and the earth");
        source.insert("Genesis", 1, 2, "Now the earth was formless and empty");
        source.insert("John", 3, 16, "For God so loved the world");
        source.insert("John", 3, 17, "For God did not send his Son into the world to condemn");
        source.insert("John", 3, 18, "Whoever believes in him is not condemned");
        source.insert("John", 4, 1, "Now Jesus learned that the Pharisees had heard");
        Arc::new(source)
    }

    fn engine_with(sink: Arc<InMemorySink>) -> DetectionEngine {
        DetectionEngine::new(EngineConfig::default(), sample_source(), sink)
    }

    #[tokio::test]
    async fn scenario_explicit_reference_sets_anchor() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        engine.add_text("please open your bibles to genesis 1 1", true).await;

        let batch = sink.last().expect("one batch");
        assert_eq!(batch.signal, DetectionSignal::Switch);
        assert_eq!(batch.scriptures[0].reference, "Genesis 1:1");
        assert!(batch.scriptures[0].text.starts_with("In the beginning"));
        assert_eq!(engine.anchor(), Some(ContextAnchor::new("Genesis", 1)));
    }

    #[tokio::test]
    async fn scenario_bare_number_follows_anchor() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        engine.add_text("john 3 16", true).await;
        engine.add_text("verse 17", true).await;

        let scriptures = sink.scriptures();
        assert_eq!(scriptures.len(), 2);
        assert_eq!(scriptures[1].reference, "John 3:17");
        assert_eq!(engine.anchor(), Some(ContextAnchor::new("John", 3)));
    }

    #[tokio::test]
    async fn scenario_chapter_jump_updates_anchor() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        engine.add_text("john 3 16", true).await;
        engine.add_text("chapter 4", true).await;

        let scriptures = sink.scriptures();
        assert_eq!(scriptures[1].reference, "John 4:1");
        assert_eq!(engine.anchor(), Some(ContextAnchor::new("John", 4)));
    }

    #[tokio::test]
    async fn scenario_repeated_switch_cools_down() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        engine.add_text("use the niv version", true).await;
        engine.add_text("use the niv version", true).await;

        let commands = sink.commands();
        assert_eq!(
            commands,
            vec![NavigationCommand::SwitchTranslation { version: "NIV".into() }]
        );
        assert_eq!(engine.current_version(), Some("NIV".to_string()));
        // The suppressed repeat still consumed its words.
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn version_switch_tags_later_detections() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        engine.add_text("switch to the esv", true).await;
        engine.add_text("john 3 16", true).await;

        let scriptures = sink.scriptures();
        assert_eq!(scriptures[0].version.as_deref(), Some("ESV"));
    }

    #[tokio::test]
    async fn clear_command_drops_anchor() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        engine.add_text("john 3 16", true).await;
        assert!(engine.anchor().is_some());

        engine.add_text("clear the screen", true).await;
        assert!(engine.anchor().is_none());
        assert!(sink.commands().contains(&NavigationCommand::Clear));
    }

    #[tokio::test]
    async fn range_detection_carries_verse_count() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        engine.add_text("john 3 16", true).await;
        sink.clear();
        engine.add_text("verses 16 through 18", true).await;

        let batch = sink.last().expect("range batch");
        assert_eq!(batch.verse_count, Some(3));
        let scripture = &batch.scriptures[0];
        assert_eq!(scripture.verse_end, Some(18));
        assert!(scripture.text.contains("condemn"));
        assert!(scripture.text.contains("not condemned"));
    }

    #[tokio::test]
    async fn failed_lookup_drops_emission_but_keeps_anchor() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        // Obadiah is a real book, but the source has no text for it.
        engine.add_text("obadiah 1 2", true).await;

        assert!(sink.is_empty());
        assert_eq!(engine.anchor(), Some(ContextAnchor::new("Obadiah", 1)));
    }

    #[tokio::test]
    async fn song_match_carries_slide_payload() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());
        engine.set_song_library(SongLibrary::new(vec![SongEntry::from_lyrics(
            "Amazing Grace",
            "Amazing grace how sweet the sound that saved a wretch like me",
        )]));

        engine
            .add_text("amazing grace how sweet the sound that saved a wretch", true)
            .await;

        let batch = sink.last().expect("song batch");
        let scripture = &batch.scriptures[0];
        assert_eq!(scripture.book, "Amazing Grace");
        assert_eq!(scripture.chapter, 0);
        assert!(scripture.song_data.is_some());
        // A lyric hit leaves the scripture anchor alone.
        assert!(engine.anchor().is_none());
    }

    #[tokio::test]
    async fn interim_fragment_matches_without_polluting_window() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        engine.add_text("turn to john", true).await;
        engine.add_text("chapter 3 verse 16", false).await;

        assert_eq!(sink.scriptures()[0].reference, "John 3:16");
        // The interim match consumed the durable window too.
        engine.add_text("verse 17", true).await;
        assert_eq!(sink.scriptures()[1].reference, "John 3:17");
    }

    #[tokio::test]
    async fn reset_clears_anchor_and_version() {
        let sink = Arc::new(InMemorySink::new());
        let engine = engine_with(sink.clone());

        engine.add_text("use the niv version", true).await;
        engine.add_text("john 3 16", true).await;
        engine.reset();

        assert!(engine.anchor().is_none());
        assert!(engine.current_version().is_none());
        // Relative navigation has no frame again.
        engine.add_text("verse 17", true).await;
        assert_eq!(sink.scriptures().len(), 1);
    }

    #[tokio::test]
    async fn focus_book_chapter_jump_without_anchor() {
        let mut source = StaticVerseSource::new();
        source.insert("Psalms", 5, 1, "Listen to my words Lord");
        let sink = Arc::new(InMemorySink::new());
        let engine =
            DetectionEngine::new(EngineConfig::default(), Arc::new(source), sink.clone());
        engine.set_profile(Some(SpeakerProfile {
            sermon_theme: None,
            focus_books: vec!["Psalms".to_string()],
        }));

        engine.add_text("chapter five", true).await;

        assert_eq!(sink.scriptures()[0].reference, "Psalms 5:1");
        assert_eq!(engine.anchor(), Some(ContextAnchor::new("Psalms", 5)));
    }
}
