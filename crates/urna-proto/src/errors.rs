//! Codec error types.

use thiserror::Error;

/// Errors produced while encoding or decoding wire values.
///
/// Every variant is fatal to the session that hit it and to nothing else:
/// the server drops that connection and keeps serving, the client reports
/// the disconnect and exits.
#[derive(Debug, Error)]
pub enum WireError {
    /// The stream ended before a complete value could be read.
    ///
    /// Covers both a clean close at a value boundary and a close in the
    /// middle of a value; the protocol has no terminator frame, so the
    /// reader cannot tell the two apart and does not need to.
    #[error("connection closed before a complete value was read")]
    ConnectionClosed,

    /// An I/O error other than end-of-stream.
    #[error("i/o error: {0}")]
    Io(std::io::Error),

    /// A string value's bytes were not valid UTF-8.
    #[error("string value is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A string too long for the `u16` length prefix was encoded.
    #[error("string of {len} bytes exceeds the {max}-byte wire limit")]
    StringTooLong {
        /// Byte length of the rejected string.
        len: usize,
        /// Maximum encodable byte length.
        max: usize,
    },

    /// An options header declared a negative candidate count.
    #[error("invalid candidate count {count}")]
    InvalidCount {
        /// The declared count.
        count: i32,
    },

    /// A server message tag outside the protocol vocabulary.
    #[error("unknown message tag {tag:?}")]
    UnknownTag {
        /// The unrecognized tag string.
        tag: String,
    },
}

/// Map an I/O error to its wire-level meaning.
///
/// `UnexpectedEof` is the normal way a peer disappears mid-protocol and
/// becomes [`WireError::ConnectionClosed`]; everything else stays an I/O
/// error.
pub(crate) fn map_io(err: std::io::Error) -> WireError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        WireError::ConnectionClosed
    } else {
        WireError::Io(err)
    }
}
