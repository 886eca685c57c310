//! Per-connection session handler.
//!
//! Drives one client through the voting protocol. Each session owns its
//! connection exclusively for its whole lifetime and shares nothing with
//! other sessions except the election behind its mutex. The mutex is held
//! only around the pure tally calls, never across socket I/O.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────┐ name read  ┌──────────┐  selector 1   ┌────────┐
//! │ Greeting │───────────>│ MenuWait │──────────────>│ Voting │
//! └──────────┘            └──────────┘<──────────────└────────┘
//!      │                    │  ↑  ↑      bad choice       │
//!      │ already voted      │  │  └─────────────┐         │ vote accepted /
//!      │                    │  │ bad selector   │         │ already voted
//!      ↓                    ↓  │            ┌─────────┐   ↓
//! ┌──────┐                (stays)           │ Results │ ┌──────┐
//! │ Done │<────── any I/O failure ──────────└─────────┘ │ Done │
//! └──────┘                                              └──────┘
//! ```
//!
//! A successful vote ends the session right after the end-of-turn signal;
//! one vote per connection is enforced by never reading another selector.

use std::sync::Arc;

use tokio::{net::TcpStream, sync::Mutex};
use urna_core::{Election, SessionId, VoteError};
use urna_proto::{ServerMessage, WireError, wire};

/// Menu selector for casting a vote.
const MENU_VOTE: i32 = 1;

/// Menu selector for viewing results.
const MENU_RESULTS: i32 = 2;

/// Error detail for a session that already cast its vote.
const ALREADY_VOTED_DETAIL: &str = "Ya has votado antes. Solo se permite un voto por usuario.";

/// Error detail for an unrecognized menu selector.
const INVALID_OPTION_DETAIL: &str =
    "Opción inválida. Elige 1 para votar o 2 para ver resultados.";

/// Error detail for an out-of-range vote choice.
const INVALID_CHOICE_DETAIL: &str = "Opción de voto inválida.";

/// Session states. See the module docs for the transition diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// Waiting for the name announce; rejects an already-voted identity
    /// before any menu is shown.
    Greeting,
    /// Waiting for one menu selector.
    MenuWait,
    /// Sending the ballot and registering one vote choice.
    Voting,
    /// Sending one results snapshot.
    Results,
    /// Terminal.
    Done,
}

/// One client's session: its identity, its connection, and the shared
/// election.
pub(crate) struct Session {
    id: SessionId,
    name: String,
    stream: TcpStream,
    election: Arc<Mutex<Election>>,
}

impl Session {
    /// Create a session for a freshly accepted connection.
    pub(crate) fn new(id: SessionId, stream: TcpStream, election: Arc<Mutex<Election>>) -> Self {
        Self { id, name: String::new(), stream, election }
    }

    /// Drive the session to completion.
    ///
    /// Returns `Err` only for wire-level failures (peer gone, malformed
    /// frame); protocol-level rejections are answered on the wire and are
    /// not errors here. Either way the connection is dropped on return and
    /// committed votes stay committed.
    pub(crate) async fn run(mut self) -> Result<(), WireError> {
        let mut state = SessionState::Greeting;

        while state != SessionState::Done {
            state = match state {
                SessionState::Greeting => self.greeting().await?,
                SessionState::MenuWait => self.menu_wait().await?,
                SessionState::Voting => self.voting().await?,
                SessionState::Results => self.results().await?,
                SessionState::Done => SessionState::Done,
            };
        }

        Ok(())
    }

    /// Read the name announce and check the voted-set.
    ///
    /// A fresh session id cannot be in the voted-set; the check mirrors the
    /// wire contract for reconnect attempts regardless.
    async fn greeting(&mut self) -> Result<SessionState, WireError> {
        self.name = wire::read_string(&mut self.stream).await?;
        tracing::info!(session = %self.id, name = %self.name, "client connected");

        let already_voted = self.election.lock().await.has_voted(self.id);
        if already_voted {
            self.send(&ServerMessage::Error(ALREADY_VOTED_DETAIL.to_string())).await?;
            return Ok(SessionState::Done);
        }

        Ok(SessionState::MenuWait)
    }

    /// Read one menu selector and dispatch.
    async fn menu_wait(&mut self) -> Result<SessionState, WireError> {
        match wire::read_i32(&mut self.stream).await? {
            MENU_VOTE => Ok(SessionState::Voting),
            MENU_RESULTS => Ok(SessionState::Results),
            selector => {
                tracing::debug!(session = %self.id, selector, "invalid menu selector");
                self.send(&ServerMessage::Error(INVALID_OPTION_DETAIL.to_string())).await?;
                Ok(SessionState::MenuWait)
            },
        }
    }

    /// Send the ballot, read one choice, register it.
    async fn voting(&mut self) -> Result<SessionState, WireError> {
        let labels = self.election.lock().await.numbered_labels();
        self.send(&ServerMessage::Options(labels)).await?;

        let choice = wire::read_i32(&mut self.stream).await?;
        let outcome = self.election.lock().await.try_register_vote(self.id, choice);

        match outcome {
            Ok(()) => {
                self.send(&ServerMessage::VoteAccepted).await?;
                self.send(&ServerMessage::TurnEnded).await?;
                tracing::info!(session = %self.id, name = %self.name, choice, "vote cast");
                Ok(SessionState::Done)
            },
            Err(error @ VoteError::InvalidChoice { .. }) => {
                tracing::debug!(session = %self.id, %error, "vote rejected");
                self.send(&ServerMessage::Error(INVALID_CHOICE_DETAIL.to_string())).await?;
                Ok(SessionState::MenuWait)
            },
            Err(VoteError::AlreadyVoted) => {
                // Lost a race against another registration for this identity.
                self.send(&ServerMessage::Error(ALREADY_VOTED_DETAIL.to_string())).await?;
                Ok(SessionState::Done)
            },
        }
    }

    /// Send one consistent results snapshot.
    async fn results(&mut self) -> Result<SessionState, WireError> {
        let snapshot = self.election.lock().await.snapshot();
        self.send(&ServerMessage::Results(snapshot.results_line())).await?;
        Ok(SessionState::MenuWait)
    }

    async fn send(&mut self, message: &ServerMessage) -> Result<(), WireError> {
        message.write_to(&mut self.stream).await
    }
}
