//! Typed server→client message vocabulary.
//!
//! Every message the server sends is introduced by a tag string; the
//! `Options` header is additionally followed by a count and that many
//! candidate labels. [`ServerMessage`] covers the whole closed vocabulary,
//! so adding a variant forces the `encode`/`decode` matches to be updated.
//!
//! # Invariants
//!
//! - Each variant maps to exactly one tag (`Error` to the `"ERROR"` prefix
//!   family).
//! - Writing a message and reading it back yields an equal value.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    errors::WireError,
    wire::{read_i32, read_string, write_i32, write_string},
};

/// Tag introducing the candidate list.
pub const TAG_OPTIONS: &str = "OPCIONES";

/// Tag introducing the formatted results line.
pub const TAG_RESULTS: &str = "RESULTADOS";

/// Acknowledgement of an accepted vote.
pub const TAG_VOTE_ACCEPTED: &str = "OK";

/// End-of-turn signal, sent only after [`TAG_VOTE_ACCEPTED`].
pub const TAG_TURN_ENDED: &str = "ENDED";

/// Prefix shared by every error message.
pub const ERROR_PREFIX: &str = "ERROR";

/// One message from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// The candidate list: tag, count, then the pre-numbered display labels
    /// (`"1. Pepe"`, `"2. Isra"`, …) in ballot order.
    Options(Vec<String>),

    /// The formatted results line (`"Pepe: 66.67%  Isra: 33.33%"`).
    Results(String),

    /// The vote was counted.
    VoteAccepted,

    /// This session's turn is over; the server closes the connection next.
    TurnEnded,

    /// A human-readable error. The payload is the detail without the
    /// `"ERROR: "` prefix; the prefix is added and stripped at the wire.
    Error(String),
}

impl ServerMessage {
    /// Write this message as its wire encoding.
    pub async fn write_to<W>(&self, writer: &mut W) -> Result<(), WireError>
    where
        W: AsyncWrite + Unpin,
    {
        match self {
            Self::Options(labels) => {
                write_string(writer, TAG_OPTIONS).await?;
                write_i32(writer, labels.len() as i32).await?;
                for label in labels {
                    write_string(writer, label).await?;
                }
            },
            Self::Results(line) => {
                write_string(writer, TAG_RESULTS).await?;
                write_string(writer, line).await?;
            },
            Self::VoteAccepted => write_string(writer, TAG_VOTE_ACCEPTED).await?,
            Self::TurnEnded => write_string(writer, TAG_TURN_ENDED).await?,
            Self::Error(detail) => {
                write_string(writer, &format!("{ERROR_PREFIX}: {detail}")).await?;
            },
        }

        Ok(())
    }

    /// Read one message, dispatching on its tag.
    ///
    /// # Errors
    ///
    /// `WireError::UnknownTag` for a tag outside the vocabulary,
    /// `WireError::InvalidCount` for a negative options count, and the usual
    /// framing errors for a stream that ends mid-message.
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, WireError>
    where
        R: AsyncRead + Unpin,
    {
        let tag = read_string(reader).await?;

        match tag.as_str() {
            TAG_OPTIONS => {
                let count = read_i32(reader).await?;
                if count < 0 {
                    return Err(WireError::InvalidCount { count });
                }

                let mut labels = Vec::new();
                for _ in 0..count {
                    labels.push(read_string(reader).await?);
                }

                Ok(Self::Options(labels))
            },
            TAG_RESULTS => Ok(Self::Results(read_string(reader).await?)),
            TAG_VOTE_ACCEPTED => Ok(Self::VoteAccepted),
            TAG_TURN_ENDED => Ok(Self::TurnEnded),
            _ => match tag.strip_prefix(ERROR_PREFIX) {
                Some(rest) => {
                    let detail = rest.strip_prefix(": ").unwrap_or(rest);
                    Ok(Self::Error(detail.to_string()))
                },
                None => Err(WireError::UnknownTag { tag }),
            },
        }
    }
}
