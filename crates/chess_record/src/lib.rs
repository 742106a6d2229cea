// Game-record (tag pairs + movetext) parsing and long-algebraic replay
pub mod record;

// Re-export main types for convenience
pub use record::{GameRecord, RecordError, Replay};
