//! Urna voting server.
//!
//! A single-election voting service over plain TCP: named clients connect,
//! cast at most one vote among a fixed set of candidates, and read live
//! tallies as percentages.
//!
//! # Architecture
//!
//! The [`Server`] owns a `TcpListener` and the one shared
//! [`Election`] behind an `Arc<tokio::sync::Mutex<_>>`. Its accept loop is
//! a single sequential loop that only spawns workers: one tokio task per
//! accepted connection, each running the session state machine against
//! its own socket. Handlers never share locks beyond the election mutex,
//! and a failed handler never affects the acceptor or any other session.
//!
//! All mutation of shared state goes through
//! [`Election::try_register_vote`] under the mutex; results reads take a
//! consistent snapshot under the same mutex. The lock is held only for
//! those calls, never across I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod session;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub use error::ServerError;
use tokio::{net::TcpListener, sync::Mutex};
use urna_core::{Election, SessionId};

use crate::session::Session;

/// Default bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:4950";

/// The demo ballot used when no candidates are configured.
pub const DEFAULT_CANDIDATES: [&str; 3] = ["Pepe", "Isra", "Luison"];

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g., `"0.0.0.0:4950"`).
    pub bind_address: String,
    /// Candidate display names, ballot order. Fixed for the process
    /// lifetime once the server is bound.
    pub candidates: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            candidates: DEFAULT_CANDIDATES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// The voting server: listener, shared election, session id source.
pub struct Server {
    /// TCP listener.
    listener: TcpListener,
    /// The one election every session shares. Process lifetime.
    election: Arc<Mutex<Election>>,
    /// Monotonic session id source; ids are never reused in a process.
    next_session_id: AtomicU64,
}

impl Server {
    /// Validate the ballot and bind the listener.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let election = Election::new(config.candidates)?;

        let listener = TcpListener::bind(&config.bind_address).await.map_err(|e| {
            ServerError::Transport(format!("failed to bind '{}': {e}", config.bind_address))
        })?;

        tracing::info!(
            candidates = election.candidate_count(),
            "election open on {}",
            config.bind_address
        );

        Ok(Self {
            listener,
            election: Arc::new(Mutex::new(election)),
            next_session_id: AtomicU64::new(1),
        })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ServerError> {
        self.listener
            .local_addr()
            .map_err(|e| ServerError::Transport(format!("failed to get local address: {e}")))
    }

    /// Run the accept loop forever.
    ///
    /// Accept errors are logged and the loop keeps serving; per-session
    /// failures end in the session task and are invisible here.
    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let id = SessionId(self.next_session_id.fetch_add(1, Ordering::Relaxed));
                    let election = Arc::clone(&self.election);

                    tracing::debug!(session = %id, %peer, "connection accepted");

                    tokio::spawn(async move {
                        if let Err(error) = Session::new(id, stream, election).run().await {
                            tracing::debug!(session = %id, %error, "session ended");
                        }
                    });
                },
                Err(error) => {
                    tracing::error!(%error, "accept error");
                },
            }
        }
    }
}
