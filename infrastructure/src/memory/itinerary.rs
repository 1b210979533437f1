//! In-memory itinerary store
//!
//! Check and insert happen under one lock, so the uniqueness of
//! (trip, candidate) holds under any number of concurrent writers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tripvote_application::ports::itinerary_store::{
    InsertOutcome, ItineraryError, ItineraryStore,
};
use tripvote_domain::{CandidateId, TripId, TripItem};

/// How a duplicate insert is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictMode {
    /// `Ok(InsertOutcome::AlreadyPresent)`
    #[default]
    Report,
    /// `Err(ItineraryError::UniqueViolation)`, like a database unique index
    Reject,
}

/// Itinerary store holding each trip's items in promotion order
#[derive(Default)]
pub struct MemoryItineraryStore {
    items: Mutex<HashMap<TripId, Vec<TripItem>>>,
    conflicts: ConflictMode,
}

impl MemoryItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conflict_mode(mut self, mode: ConflictMode) -> Self {
        self.conflicts = mode;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TripId, Vec<TripItem>>>, ItineraryError> {
        self.items
            .lock()
            .map_err(|_| ItineraryError::Storage("itinerary lock poisoned".to_string()))
    }
}

#[async_trait]
impl ItineraryStore for MemoryItineraryStore {
    async fn exists(&self, trip: &TripId, candidate: &CandidateId) -> Result<bool, ItineraryError> {
        Ok(self
            .lock()?
            .get(trip)
            .is_some_and(|items| items.iter().any(|i| &i.candidate == candidate)))
    }

    async fn insert_if_absent(&self, item: TripItem) -> Result<InsertOutcome, ItineraryError> {
        let mut items = self.lock()?;
        let trip_items = items.entry(item.trip.clone()).or_default();

        if trip_items.iter().any(|i| i.candidate == item.candidate) {
            return match self.conflicts {
                ConflictMode::Report => Ok(InsertOutcome::AlreadyPresent),
                ConflictMode::Reject => Err(ItineraryError::UniqueViolation {
                    trip: item.trip,
                    candidate: item.candidate,
                }),
            };
        }

        trip_items.push(item);
        Ok(InsertOutcome::Inserted)
    }

    async fn items(&self, trip: &TripId) -> Result<Vec<TripItem>, ItineraryError> {
        Ok(self.lock()?.get(trip).cloned().unwrap_or_default())
    }
}
