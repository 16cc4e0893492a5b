//! Chat with the fashion assistant: messages, transcripts, and sessions.

pub mod model;
pub mod session;
pub mod transcript;

pub use model::{ChatMessage, Sender};
pub use session::{Session, SessionSend, SessionStore};
pub use transcript::{
    FALLBACK_REPLY, GREETING, SeedKind, SendOutcome, Transcript, TranscriptSnapshot, context_seed,
};
