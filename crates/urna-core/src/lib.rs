//! Vote tally domain logic.
//!
//! [`Election`] is the process-wide shared state of a single election: the
//! fixed candidate list, one count per candidate, and the set of sessions
//! that have already voted. It is pure — no I/O, no locking of its own. The
//! server wraps the one `Election` value in a single mutex and every
//! mutation goes through [`Election::try_register_vote`], which makes the
//! already-voted check, the count increment, and the voted-set insert one
//! atomic step. Collapsing the three prevents the check-then-act race where
//! two near-simultaneous attempts from the same session both pass the check
//! before either writes.
//!
//! Reads go through [`Election::snapshot`], which captures the candidate
//! list and all counts as of one consistent instant; percentages computed
//! from a snapshot may be stale relative to votes committed immediately
//! after it, which is acceptable.

mod election;
mod error;

pub use election::{Election, SessionId, Snapshot, TallyEntry};
pub use error::{ElectionError, VoteError};
