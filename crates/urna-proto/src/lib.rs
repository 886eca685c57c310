//! Wire codec for the urna voting protocol.
//!
//! The protocol is a stream of self-delimiting values over an ordered,
//! reliable byte stream (one TCP connection per client):
//!
//! - **String**: `u16` big-endian byte length, then that many bytes of UTF-8.
//! - **Integer**: 4 bytes, big-endian two's-complement `i32`.
//!
//! Client→server traffic is bare values (the name announce string, menu
//! selectors, the vote choice) and uses the [`wire`] functions directly.
//! Server→client traffic is the closed [`ServerMessage`] vocabulary, each
//! message introduced by a tag string.
//!
//! A reader awaits until a complete value is available; a handler never
//! observes a half-written value. Any read that cannot complete a value
//! yields [`WireError::ConnectionClosed`], which is fatal to that session
//! but never to the server.

mod errors;
mod message;
pub mod wire;

pub use errors::WireError;
pub use message::{
    ERROR_PREFIX, ServerMessage, TAG_OPTIONS, TAG_RESULTS, TAG_TURN_ENDED, TAG_VOTE_ACCEPTED,
};
