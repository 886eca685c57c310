//! Server error types.

use thiserror::Error;
use urna_core::ElectionError;

/// Errors that can occur in the server.
///
/// These are startup and transport failures. Per-session protocol failures
/// never surface here; they end that one session and are logged where they
/// happen.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Transport/network error (bind failure, accept failure, etc.).
    #[error("transport error: {0}")]
    Transport(String),

    /// Invalid election configuration (empty or duplicate candidate list).
    #[error("election error: {0}")]
    Election(#[from] ElectionError),
}
