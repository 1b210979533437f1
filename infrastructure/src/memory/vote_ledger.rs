//! In-memory vote ledger

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tripvote_application::ports::vote_ledger::{LedgerError, VoteLedger};
use tripvote_domain::{CandidateId, TripId, UserId, Vote};

type VoteKey = (TripId, CandidateId, UserId);

/// Vote ledger keyed by (trip, candidate, voter). The last decision wins;
/// the first like is kept.
#[derive(Default)]
pub struct MemoryVoteLedger {
    votes: Mutex<HashMap<VoteKey, Vote>>,
}

impl MemoryVoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<VoteKey, Vote>>, LedgerError> {
        self.votes
            .lock()
            .map_err(|_| LedgerError::Unavailable("vote ledger lock poisoned".to_string()))
    }
}

#[async_trait]
impl VoteLedger for MemoryVoteLedger {
    async fn upsert_vote(&self, vote: Vote) -> Result<(), LedgerError> {
        let key = (vote.trip.clone(), vote.candidate.clone(), vote.voter.clone());
        let mut votes = self.lock()?;
        let vote = match votes.get(&key) {
            Some(previous) => vote.superseding(previous),
            None => vote,
        };
        votes.insert(key, vote);
        Ok(())
    }

    async fn count_positive_votes(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
    ) -> Result<usize, LedgerError> {
        Ok(self
            .lock()?
            .values()
            .filter(|v| &v.trip == trip && &v.candidate == candidate && v.has_liked())
            .count())
    }

    async fn votes_for(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
    ) -> Result<Vec<Vote>, LedgerError> {
        let mut votes: Vec<Vote> = self
            .lock()?
            .values()
            .filter(|v| &v.trip == trip && &v.candidate == candidate)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.cast_at.cmp(&b.cast_at).then_with(|| a.voter.cmp(&b.voter)));
        Ok(votes)
    }

    async fn voted_candidates(
        &self,
        trip: &TripId,
        voter: &UserId,
    ) -> Result<HashSet<CandidateId>, LedgerError> {
        Ok(self
            .lock()?
            .keys()
            .filter(|(t, _, v)| t == trip && v == voter)
            .map(|(_, c, _)| c.clone())
            .collect())
    }

    async fn candidates_with_votes(&self, trip: &TripId) -> Result<Vec<CandidateId>, LedgerError> {
        let ids: BTreeSet<CandidateId> = self
            .lock()?
            .keys()
            .filter(|(t, _, _)| t == trip)
            .map(|(_, c, _)| c.clone())
            .collect();
        Ok(ids.into_iter().collect())
    }
}
