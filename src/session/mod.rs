// ABOUTME: Session module — transcript file, context lookup, and the request/response loop.
// ABOUTME: One invocation is one session mapped to exactly one Markdown transcript.

pub mod context;
pub mod driver;
pub mod transcript;

pub use context::resolve_context;
pub use driver::{InputMode, Session, SessionParams};
pub use transcript::{Transcript, prepare_log_dir, resolve_log_path};
