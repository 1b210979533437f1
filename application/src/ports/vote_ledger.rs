//! Vote Ledger port
//!
//! One vote per (trip, candidate, voter). `upsert_vote` replaces any previous
//! decision for the same key, so repeated casts never double count. Likes do
//! not retract: a row keeps its `liked_at` when a pass overwrites it.

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use tripvote_domain::{CandidateId, TripId, UserId, Vote};

/// Errors that can occur in the vote ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Vote ledger unavailable: {0}")]
    Unavailable(String),

    #[error("Vote ledger storage error: {0}")]
    Storage(String),
}

/// Port for the vote ledger
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Insert or replace the vote keyed by (trip, candidate, voter),
    /// carrying the stored row's `liked_at` forward (see [`Vote::superseding`])
    async fn upsert_vote(&self, vote: Vote) -> Result<(), LedgerError>;

    /// Number of voters with a like on record for the candidate
    async fn count_positive_votes(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
    ) -> Result<usize, LedgerError>;

    /// All current rows for the candidate
    async fn votes_for(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
    ) -> Result<Vec<Vote>, LedgerError>;

    /// Candidates this voter has a row for, whatever the decision
    async fn voted_candidates(
        &self,
        trip: &TripId,
        voter: &UserId,
    ) -> Result<HashSet<CandidateId>, LedgerError>;

    /// Every candidate with at least one row in the trip, sorted by id
    async fn candidates_with_votes(&self, trip: &TripId) -> Result<Vec<CandidateId>, LedgerError>;
}
