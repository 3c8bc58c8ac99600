use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// (lobby, user, option) ordered set. A user may approve multiple
/// options; toggling the same (user, option) removes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteBoard {
    votes: HashSet<(Uuid, i32)>,
}

/// Result of tallying a [`VoteBoard`] under a voting mode, used by
/// `voting-status` and `end-voting`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteTally {
    pub counts: HashMap<i32, usize>,
    pub total_voters: usize,
    pub winning_option: Option<i32>,
    pub can_finalize: bool,
}

impl VoteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles (user, option); returns true if the vote is now present.
    pub fn toggle(&mut self, user_id: Uuid, option_number: i32) -> bool {
        let key = (user_id, option_number);
        if self.votes.remove(&key) {
            false
        } else {
            self.votes.insert(key);
            true
        }
    }

    pub fn votes_for_user(&self, user_id: Uuid) -> Vec<i32> {
        self.votes
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, o)| *o)
            .collect()
    }

    /// Majority wins on >50%, unanimous wins on 100%. `captain_override`
    /// never reports a winner from the vote tally itself — it is resolved
    /// by the captain forcing a selection at `end_voting` time (no minimum
    /// vote count required).
    pub fn tally(&self, mode: super::VotingMode, eligible_voters: usize) -> VoteTally {
        use super::VotingMode::*;

        let mut counts: HashMap<i32, usize> = HashMap::new();
        let mut voters = HashSet::new();
        for (user_id, option) in &self.votes {
            *counts.entry(*option).or_insert(0) += 1;
            voters.insert(*user_id);
        }

        let winning_option = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(option, _)| *option);

        let can_finalize = match mode {
            Majority => winning_option
                .map(|opt| counts[&opt] * 2 > eligible_voters)
                .unwrap_or(false),
            Unanimous => winning_option
                .map(|opt| counts[&opt] == eligible_voters && eligible_voters > 0)
                .unwrap_or(false),
            CaptainOverride => true,
        };

        VoteTally {
            counts,
            total_voters: voters.len(),
            winning_option,
            can_finalize,
        }
    }
}
