//! Library error type

use std::io;

use thiserror::Error;

/// Errors surfaced while emitting trace output
///
/// Resolution problems never appear here: unresolvable entries are
/// silently dropped and malformed register identities are simulator bugs
/// that abort instead.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The sink failed to accept or flush rendered output
    #[error("trace output error: {0}")]
    Io(#[from] io::Error),
}
