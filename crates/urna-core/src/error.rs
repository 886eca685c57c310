//! Domain error types.

use thiserror::Error;

/// Errors constructing an [`Election`](crate::Election).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ElectionError {
    /// An election needs at least one candidate.
    #[error("candidate list is empty")]
    NoCandidates,

    /// Candidate display names must be distinct.
    #[error("duplicate candidate name {0:?}")]
    DuplicateCandidate(String),
}

/// Outcomes of a rejected vote registration.
///
/// These are ordinary values returned to the session handler, which
/// translates them into wire error messages; they are never propagated
/// past it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteError {
    /// This session already cast its vote.
    #[error("this session has already voted; one vote per session")]
    AlreadyVoted,

    /// The 1-based candidate choice is outside the ballot.
    #[error("vote choice {choice} is outside 1..={max}")]
    InvalidChoice {
        /// The rejected 1-based choice.
        choice: i32,
        /// Number of candidates on the ballot.
        max: usize,
    },
}
