//! Event source port.

use crate::domain::error::CancelCheckError;

/// A finite, single-pass sequence of raw text lines.
///
/// Implementations hand out each line once, without its line terminator. An
/// `Err` item means the source failed and ingestion must abort; it is never
/// followed by more lines.
pub trait LineSource {
    fn next_line(&mut self) -> Option<Result<String, CancelCheckError>>;

    /// Human-readable name of the source for diagnostics.
    fn describe(&self) -> String {
        "<stream>".to_string()
    }
}
