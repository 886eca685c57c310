//! Fuzz target for the Election state
//!
//! Drives arbitrary register/snapshot sequences against the tally.
//!
//! # Strategy
//!
//! - Small session-id space: same-session retries are common
//! - Choices straddling the valid ballot range on both sides (0, negative,
//!   N+1, i32 extremes)
//! - Snapshots interleaved at arbitrary points
//!
//! # Invariants
//!
//! - Snapshot total always equals the number of success outcomes
//! - Every session appears in the voted-set at most once
//! - A rejected registration mutates nothing
//! - Percentages sum to ~100 when total > 0, exactly 0 when total = 0
//! - No operation sequence panics

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use urna_core::{Election, SessionId, VoteError};

#[derive(Debug, Clone, Arbitrary)]
struct ElectionScenario {
    candidates: u8,
    ops: Vec<ElectionOp>,
}

#[derive(Debug, Clone, Arbitrary)]
enum ElectionOp {
    Register { session: u8, choice: i32 },
    Snapshot,
}

fuzz_target!(|scenario: ElectionScenario| {
    let count = usize::from(scenario.candidates % 8) + 1;
    let names: Vec<String> = (1..=count).map(|i| format!("Candidate {i}")).collect();
    let mut election = Election::new(names).expect("distinct non-empty ballot");

    let mut successes: u64 = 0;

    for op in scenario.ops {
        match op {
            ElectionOp::Register { session, choice } => {
                let id = SessionId(u64::from(session));
                let had_voted = election.has_voted(id);

                match election.try_register_vote(id, choice) {
                    Ok(()) => {
                        assert!(!had_voted, "a session was registered twice");
                        successes += 1;
                    }
                    Err(VoteError::AlreadyVoted) => assert!(had_voted),
                    Err(VoteError::InvalidChoice { .. }) => {
                        assert!(choice < 1 || choice as usize > count);
                        assert_eq!(election.has_voted(id), had_voted);
                    }
                }
            }
            ElectionOp::Snapshot => {
                let snapshot = election.snapshot();
                assert_eq!(snapshot.total(), successes);

                let sum: f64 = snapshot.percentages().iter().sum();
                if snapshot.total() == 0 {
                    assert_eq!(sum, 0.0);
                } else {
                    assert!((sum - 100.0).abs() < 1e-6);
                }

                let _ = snapshot.results_line();
            }
        }
    }

    let snapshot = election.snapshot();
    assert_eq!(snapshot.total(), successes);
    assert_eq!(election.voter_count() as u64, successes);
});
