//! Itinerary Store port
//!
//! Holds promoted candidates. The store itself must enforce uniqueness on
//! (trip, candidate): either `insert_if_absent` is atomic and reports
//! `AlreadyPresent`, or a racing insert fails with `UniqueViolation`.
//! Callers treat both as "someone else promoted it".

use async_trait::async_trait;
use thiserror::Error;
use tripvote_domain::{CandidateId, TripId, TripItem};

/// Errors that can occur in the itinerary store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItineraryError {
    #[error("Itinerary item already exists for candidate {candidate} on trip {trip}")]
    UniqueViolation { trip: TripId, candidate: CandidateId },

    #[error("Itinerary storage error: {0}")]
    Storage(String),
}

impl ItineraryError {
    /// A concurrent writer already created the item
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, ItineraryError::UniqueViolation { .. })
    }
}

/// Result of an insert attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
}

/// Port for the shared itinerary
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    /// Whether an item exists for (trip, candidate)
    async fn exists(&self, trip: &TripId, candidate: &CandidateId) -> Result<bool, ItineraryError>;

    /// Insert the item unless one already exists for its key
    async fn insert_if_absent(&self, item: TripItem) -> Result<InsertOutcome, ItineraryError>;

    /// All items of a trip, ordered by promotion time
    async fn items(&self, trip: &TripId) -> Result<Vec<TripItem>, ItineraryError>;
}
