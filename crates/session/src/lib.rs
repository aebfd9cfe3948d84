//! Per-service detection state.
//!
//! One [`DetectionSession`] lives for the duration of a service. It owns the
//! transcript word window, the chapter the congregation is currently in, the
//! command cooldown table, and the recent-emission table. All of it is plain
//! synchronous state; the engine wraps it in a lock and keeps every mutation
//! on the decision path, never across an await.

mod cooldown;
mod session;
mod window;

pub use cooldown::{CooldownStore, RecencyStore};
pub use session::{
    reference_key, ContextAnchor, DetectionSession, SessionSnapshot, DEFAULT_CONTEXT_CHARS,
    DEFAULT_WINDOW_WORDS,
};
pub use window::WordWindow;
