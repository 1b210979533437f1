//! Build Deck use case
//!
//! Serves each member the next batch of candidates to swipe on. A deck holds
//! one category at a time, in the order hotel → restaurant → activity, and
//! never contains a candidate the member already voted on or one the group
//! already promoted.

use crate::ports::candidate_catalog::{CandidateCatalog, CatalogError};
use crate::ports::itinerary_store::{ItineraryError, ItineraryStore};
use crate::ports::membership_store::{MembershipError, MembershipStore};
use crate::ports::vote_ledger::{LedgerError, VoteLedger};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use tripvote_domain::{Candidate, CandidateCategory, CandidateId, TripId, UserId};

/// Errors that can occur while building a deck
#[derive(Error, Debug)]
pub enum BuildDeckError {
    #[error("User {user} is not a member of trip {trip}")]
    Unauthorized { trip: TripId, user: UserId },

    #[error("Membership error: {0}")]
    Membership(#[from] MembershipError),

    #[error("Vote ledger error: {0}")]
    VoteLedger(#[from] LedgerError),

    #[error("Itinerary error: {0}")]
    Itinerary(#[from] ItineraryError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Candidates of a single category still open for a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub category: CandidateCategory,
    pub candidates: Vec<Candidate>,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Use case for the per-member candidate feed
pub struct BuildDeckUseCase<M, V, I, C>
where
    M: MembershipStore + 'static,
    V: VoteLedger + 'static,
    I: ItineraryStore + 'static,
    C: CandidateCatalog + 'static,
{
    membership: Arc<M>,
    ledger: Arc<V>,
    itinerary: Arc<I>,
    catalog: Arc<C>,
}

impl<M, V, I, C> Clone for BuildDeckUseCase<M, V, I, C>
where
    M: MembershipStore + 'static,
    V: VoteLedger + 'static,
    I: ItineraryStore + 'static,
    C: CandidateCatalog + 'static,
{
    fn clone(&self) -> Self {
        Self {
            membership: self.membership.clone(),
            ledger: self.ledger.clone(),
            itinerary: self.itinerary.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

impl<M, V, I, C> BuildDeckUseCase<M, V, I, C>
where
    M: MembershipStore + 'static,
    V: VoteLedger + 'static,
    I: ItineraryStore + 'static,
    C: CandidateCatalog + 'static,
{
    pub fn new(membership: Arc<M>, ledger: Arc<V>, itinerary: Arc<I>, catalog: Arc<C>) -> Self {
        Self {
            membership,
            ledger,
            itinerary,
            catalog,
        }
    }

    /// The first non-empty deck for `voter`, or `None` once every category
    /// is exhausted
    pub async fn next_deck(
        &self,
        trip: &TripId,
        voter: &UserId,
    ) -> Result<Option<Deck>, BuildDeckError> {
        if !self.membership.is_member(trip, voter).await? {
            return Err(BuildDeckError::Unauthorized {
                trip: trip.clone(),
                user: voter.clone(),
            });
        }

        let voted = self.ledger.voted_candidates(trip, voter).await?;
        let promoted: HashSet<CandidateId> = self
            .itinerary
            .items(trip)
            .await?
            .into_iter()
            .map(|item| item.candidate)
            .collect();

        for category in CandidateCategory::ORDER {
            let candidates: Vec<Candidate> = self
                .catalog
                .candidates(trip, category)
                .await?
                .into_iter()
                .filter(|c| !voted.contains(&c.id) && !promoted.contains(&c.id))
                .collect();

            if !candidates.is_empty() {
                debug!(%trip, %voter, %category, size = candidates.len(), "Deck built");
                return Ok(Some(Deck {
                    category,
                    candidates,
                }));
            }
        }

        debug!(%trip, %voter, "No candidates left");
        Ok(None)
    }
}
