//! Election state: candidate list, per-candidate counts, voted-set.

use std::collections::HashSet;

use crate::error::{ElectionError, VoteError};

/// Identity of one client connection, assigned by the acceptor.
///
/// Identities are never reused within a process, so voted-set membership
/// outlives the session that voted. This is deliberately a *connection*
/// identity, not a person: two connections under two names can both vote
/// (documented weak identity model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(
    /// Raw identity value, unique within one server process.
    pub u64,
);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// One candidate's name and current count, as captured by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyEntry {
    /// Candidate display name.
    pub name: String,
    /// Votes counted for this candidate.
    pub count: u64,
}

/// Consistent view of all counts as of a single instant.
///
/// A snapshot is a copy; votes committed after it was taken are not
/// reflected. All percentage math happens here so the display convention
/// (two decimals, all zeros when nobody voted yet) lives in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<TallyEntry>,
    total: u64,
}

impl Snapshot {
    /// Entries in ballot order.
    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    /// Total votes cast at capture time.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Percentage per candidate, in ballot order.
    ///
    /// `100 × count / total`; all exactly `0.0` when the total is zero.
    pub fn percentages(&self) -> Vec<f64> {
        self.entries
            .iter()
            .map(|entry| {
                if self.total == 0 {
                    0.0
                } else {
                    entry.count as f64 / self.total as f64 * 100.0
                }
            })
            .collect()
    }

    /// The wire results line: `"name: pp.pp%"` entries joined by two spaces.
    pub fn results_line(&self) -> String {
        self.entries
            .iter()
            .zip(self.percentages())
            .map(|(entry, percentage)| format!("{}: {:.2}%", entry.name, percentage))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Shared state of a single election.
///
/// The candidate list is fixed at construction and never mutated. Counts
/// only grow; each increment corresponds to exactly one accepted vote, and
/// happens in the same [`Election::try_register_vote`] step as the voted-set
/// insert — the two are never observable as only one having happened.
///
/// `Election` takes `&mut self` for its one write path, so the server's
/// single mutex around the value is the single point of mutation; no other
/// component can write to the counts or the voted-set.
#[derive(Debug)]
pub struct Election {
    /// Candidate display names, ballot order. 1-based on the wire.
    candidates: Vec<String>,
    /// One count per candidate, same order.
    counts: Vec<u64>,
    /// Sessions that have successfully voted.
    voted: HashSet<SessionId>,
}

impl Election {
    /// Create an election with all counts at zero.
    ///
    /// # Errors
    ///
    /// `ElectionError::NoCandidates` for an empty list,
    /// `ElectionError::DuplicateCandidate` if two names collide.
    pub fn new<I, S>(candidates: I) -> Result<Self, ElectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates: Vec<String> = candidates.into_iter().map(Into::into).collect();

        if candidates.is_empty() {
            return Err(ElectionError::NoCandidates);
        }

        let mut seen = HashSet::new();
        for name in &candidates {
            if !seen.insert(name.as_str()) {
                return Err(ElectionError::DuplicateCandidate(name.clone()));
            }
        }

        let counts = vec![0; candidates.len()];
        Ok(Self { candidates, counts, voted: HashSet::new() })
    }

    /// Candidate display names in ballot order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Number of candidates on the ballot.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// The 1-indexed display labels sent in the options header
    /// (`"1. Pepe"`, `"2. Isra"`, …).
    pub fn numbered_labels(&self) -> Vec<String> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(index, name)| format!("{}. {}", index + 1, name))
            .collect()
    }

    /// Whether this session has already cast a vote.
    pub fn has_voted(&self, session_id: SessionId) -> bool {
        self.voted.contains(&session_id)
    }

    /// Number of sessions that have voted.
    pub fn voter_count(&self) -> usize {
        self.voted.len()
    }

    /// The only write path into shared state.
    ///
    /// Checks the voted-set, validates the 1-based choice, then increments
    /// the chosen candidate's count and inserts the session into the
    /// voted-set as one step. A failed registration performs no mutation.
    pub fn try_register_vote(
        &mut self,
        session_id: SessionId,
        choice: i32,
    ) -> Result<(), VoteError> {
        if self.voted.contains(&session_id) {
            return Err(VoteError::AlreadyVoted);
        }

        let max = self.candidates.len();
        let index = match usize::try_from(choice) {
            Ok(c) if (1..=max).contains(&c) => c - 1,
            _ => return Err(VoteError::InvalidChoice { choice, max }),
        };

        self.counts[index] += 1;
        self.voted.insert(session_id);
        Ok(())
    }

    /// Capture the candidate list and all counts as of one instant.
    pub fn snapshot(&self) -> Snapshot {
        let entries = self
            .candidates
            .iter()
            .zip(&self.counts)
            .map(|(name, &count)| TallyEntry { name: name.clone(), count })
            .collect();

        Snapshot { entries, total: self.counts.iter().sum() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn election() -> Election {
        Election::new(["Pepe", "Isra", "Luison"]).unwrap()
    }

    #[test]
    fn new_election_has_zero_counts() {
        let election = election();
        let snapshot = election.snapshot();

        assert_eq!(snapshot.total(), 0);
        assert!(snapshot.entries().iter().all(|entry| entry.count == 0));
        assert_eq!(election.voter_count(), 0);
    }

    #[test]
    fn empty_candidate_list_is_rejected() {
        let result = Election::new(Vec::<String>::new());
        assert_eq!(result.unwrap_err(), ElectionError::NoCandidates);
    }

    #[test]
    fn duplicate_candidate_is_rejected() {
        let result = Election::new(["Pepe", "Isra", "Pepe"]);
        assert_eq!(result.unwrap_err(), ElectionError::DuplicateCandidate("Pepe".to_string()));
    }

    #[test]
    fn numbered_labels_are_one_indexed() {
        assert_eq!(election().numbered_labels(), ["1. Pepe", "2. Isra", "3. Luison"]);
    }

    #[test]
    fn register_vote_counts_once() {
        let mut election = election();

        election.try_register_vote(SessionId(1), 2).unwrap();

        let snapshot = election.snapshot();
        assert_eq!(snapshot.total(), 1);
        assert_eq!(snapshot.entries()[1].count, 1);
        assert!(election.has_voted(SessionId(1)));
    }

    #[test]
    fn second_vote_from_same_session_is_rejected_without_mutation() {
        let mut election = election();

        election.try_register_vote(SessionId(7), 1).unwrap();
        let before = election.snapshot();

        let result = election.try_register_vote(SessionId(7), 2);
        assert_eq!(result.unwrap_err(), VoteError::AlreadyVoted);

        assert_eq!(election.snapshot(), before);
        assert_eq!(election.voter_count(), 1);
    }

    #[test]
    fn out_of_range_choices_are_rejected_without_mutation() {
        let mut election = election();

        for choice in [0, 4, -1, i32::MIN, i32::MAX] {
            let result = election.try_register_vote(SessionId(9), choice);
            assert_eq!(result.unwrap_err(), VoteError::InvalidChoice { choice, max: 3 });
        }

        assert_eq!(election.snapshot().total(), 0);
        assert!(!election.has_voted(SessionId(9)));
    }

    #[test]
    fn rejected_choice_leaves_session_able_to_vote() {
        let mut election = election();

        let _ = election.try_register_vote(SessionId(3), 0);
        election.try_register_vote(SessionId(3), 3).unwrap();

        assert_eq!(election.snapshot().entries()[2].count, 1);
    }

    #[test]
    fn three_voters_scenario() {
        let mut election = election();

        election.try_register_vote(SessionId(1), 1).unwrap();
        election.try_register_vote(SessionId(2), 2).unwrap();
        election.try_register_vote(SessionId(3), 1).unwrap();

        let snapshot = election.snapshot();
        assert_eq!(snapshot.entries()[0].count, 2);
        assert_eq!(snapshot.entries()[1].count, 1);
        assert_eq!(snapshot.entries()[2].count, 0);

        let percentages = snapshot.percentages();
        assert!((percentages[0] - 66.67).abs() < 0.01);
        assert!((percentages[1] - 33.33).abs() < 0.01);
        assert_eq!(percentages[2], 0.0);

        assert_eq!(snapshot.results_line(), "Pepe: 66.67%  Isra: 33.33%  Luison: 0.00%");
    }

    #[test]
    fn empty_tally_percentages_are_exactly_zero() {
        let snapshot = election().snapshot();

        assert_eq!(snapshot.percentages(), [0.0, 0.0, 0.0]);
        assert_eq!(snapshot.results_line(), "Pepe: 0.00%  Isra: 0.00%  Luison: 0.00%");
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut election = election();
        let before = election.snapshot();

        election.try_register_vote(SessionId(1), 1).unwrap();

        assert_eq!(before.total(), 0);
        assert_eq!(election.snapshot().total(), 1);
    }
}
