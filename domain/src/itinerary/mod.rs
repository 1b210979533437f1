//! Shared itinerary entities
//!
//! A [`TripItem`] is a promoted candidate. There is at most one per
//! (trip, candidate); the storage layer enforces it.

use crate::trip::{CandidateId, TripId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Day bucket for promoted items that have not been scheduled yet
pub const UNSCHEDULED_DAY: u32 = 0;

/// A candidate promoted into a trip's itinerary (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripItem {
    pub trip: TripId,
    pub candidate: CandidateId,
    /// Day of the trip, `UNSCHEDULED_DAY` until someone schedules it
    pub day_index: u32,
    pub is_booked: bool,
    pub promoted_at: DateTime<Utc>,
}

impl TripItem {
    /// A freshly promoted, unscheduled and unbooked item
    pub fn promoted(trip: TripId, candidate: CandidateId) -> Self {
        Self {
            trip,
            candidate,
            day_index: UNSCHEDULED_DAY,
            is_booked: false,
            promoted_at: Utc::now(),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.day_index != UNSCHEDULED_DAY
    }

    /// Uniqueness key in the itinerary store
    pub fn key(&self) -> (&TripId, &CandidateId) {
        (&self.trip, &self.candidate)
    }
}

/// Broadcast to every connected member when a candidate is first promoted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionEvent {
    pub trip: TripId,
    pub candidate: CandidateId,
    pub promoted_at: DateTime<Utc>,
}

impl From<&TripItem> for PromotionEvent {
    fn from(item: &TripItem) -> Self {
        Self {
            trip: item.trip.clone(),
            candidate: item.candidate.clone(),
            promoted_at: item.promoted_at,
        }
    }
}
