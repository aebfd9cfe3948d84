//! Example: Type sermon fragments and watch detections.
//!
//! Run with: cargo run -p pulpit-engine --example live_detect
//!
//! Each line you type is fed to the engine as one final transcript
//! fragment. Try "turn with me to john chapter three verse sixteen",
//! then "verse seventeen", then "next verse".

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use pulpit_engine::{DetectionEngine, EngineConfig};
use pulpit_events::{DetectionBatch, DetectionSink};
use pulpit_library::{SongEntry, SongLibrary};
use pulpit_scripture::StaticVerseSource;

struct PrintSink;

impl DetectionSink for PrintSink {
    fn on_detect(&self, batch: DetectionBatch) {
        let now = chrono::Local::now().format("%H:%M:%S");
        for scripture in &batch.scriptures {
            println!(
                "[{}] >> {} [{}%] {}",
                now, scripture.reference, scripture.confidence, scripture.text
            );
        }
        for command in &batch.commands {
            println!("[{}] >> command: {}", now, command.kind_key());
        }
    }
}

fn demo_source() -> StaticVerseSource {
    let mut source = StaticVerseSource::new();
    source.insert("John", 3, 16, "For God so loved the world that he gave his one and only Son, that whoever believes in him shall not perish but have eternal life.");
    source.insert("John", 3, 17, "For God did not send his Son into the world to condemn the world, but to save the world through him.");
    source.insert("John", 4, 1, "Now Jesus learned that the Pharisees had heard that he was gaining and baptizing more disciples than John.");
    source.insert("Genesis", 1, 1, "In the beginning God created the heavens and the earth.");
    source.insert("Psalms", 23, 1, "The Lord is my shepherd, I lack nothing.");
    source.insert("Romans", 8, 28, "And we know that in all things God works for the good of those who love him.");
    source
}

#[tokio::main]
async fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter("pulpit_engine=debug,pulpit_matchers=debug")
        .init();

    println!("=== Live Detection Example ===");
    println!("Type transcript fragments, one per line. Ctrl+D to quit.\n");

    let engine = DetectionEngine::new(
        EngineConfig::default(),
        Arc::new(demo_source()),
        Arc::new(PrintSink),
    );
    engine.set_song_library(SongLibrary::new(vec![SongEntry::from_lyrics(
        "Amazing Grace",
        "Amazing grace how sweet the sound that saved a wretch like me\n\nI once was lost but now am found was blind but now I see",
    )]));
    engine.start();

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush().ok();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if !line.trim().is_empty() {
            engine.add_text(&line, true).await;
        }
        // Leave room for the debounced fallbacks before the next prompt.
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        print!("> ");
        io::stdout().flush().ok();
    }

    engine.shutdown();
    println!("\nDone.");
}
