//! In-memory membership store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tripvote_application::ports::membership_store::{
    MembershipChange, MembershipError, MembershipStore,
};
use tripvote_domain::{Collaborator, CollaboratorRole, Trip, TripId, UserId};

struct TripRecord {
    trip: Trip,
    /// Join order
    collaborators: Vec<Collaborator>,
}

impl TripRecord {
    fn role_of(&self, user: &UserId) -> Option<CollaboratorRole> {
        if self.trip.is_owner(user) {
            return Some(CollaboratorRole::Owner);
        }
        self.collaborators
            .iter()
            .find(|c| &c.user == user)
            .map(|c| c.role)
    }
}

/// Membership store backed by a single mutex-guarded map
#[derive(Default)]
pub struct MemoryMembershipStore {
    trips: Mutex<HashMap<TripId, TripRecord>>,
}

impl MemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_trips<T>(
        &self,
        f: impl FnOnce(&mut HashMap<TripId, TripRecord>) -> Result<T, MembershipError>,
    ) -> Result<T, MembershipError> {
        let mut trips = self
            .trips
            .lock()
            .map_err(|_| MembershipError::Storage("membership lock poisoned".to_string()))?;
        f(&mut trips)
    }
}

fn record<'a>(
    trips: &'a mut HashMap<TripId, TripRecord>,
    trip: &TripId,
) -> Result<&'a mut TripRecord, MembershipError> {
    trips
        .get_mut(trip)
        .ok_or_else(|| MembershipError::TripNotFound(trip.clone()))
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn register_trip(&self, trip: Trip) -> Result<(), MembershipError> {
        self.with_trips(|trips| {
            if trips.contains_key(&trip.id) {
                return Err(MembershipError::TripExists(trip.id));
            }
            trips.insert(
                trip.id.clone(),
                TripRecord {
                    trip,
                    collaborators: Vec::new(),
                },
            );
            Ok(())
        })
    }

    async fn trip(&self, trip: &TripId) -> Result<Option<Trip>, MembershipError> {
        self.with_trips(|trips| Ok(trips.get(trip).map(|r| r.trip.clone())))
    }

    async fn is_member(&self, trip: &TripId, user: &UserId) -> Result<bool, MembershipError> {
        self.with_trips(|trips| Ok(trips.get(trip).and_then(|r| r.role_of(user)).is_some()))
    }

    async fn collaborator_count(&self, trip: &TripId) -> Result<usize, MembershipError> {
        self.with_trips(|trips| Ok(record(trips, trip)?.collaborators.len()))
    }

    async fn role(
        &self,
        trip: &TripId,
        user: &UserId,
    ) -> Result<Option<CollaboratorRole>, MembershipError> {
        self.with_trips(|trips| Ok(trips.get(trip).and_then(|r| r.role_of(user))))
    }

    async fn add_member(
        &self,
        trip: &TripId,
        user: &UserId,
        role: CollaboratorRole,
    ) -> Result<MembershipChange, MembershipError> {
        self.with_trips(|trips| {
            let record = record(trips, trip)?;
            if record.role_of(user).is_some() {
                return Ok(MembershipChange::AlreadyMember);
            }
            record
                .collaborators
                .push(Collaborator::new(trip.clone(), user.clone(), role));
            Ok(MembershipChange::Added)
        })
    }

    async fn set_role(
        &self,
        trip: &TripId,
        user: &UserId,
        role: CollaboratorRole,
    ) -> Result<(), MembershipError> {
        self.with_trips(|trips| {
            let row = record(trips, trip)?
                .collaborators
                .iter_mut()
                .find(|c| &c.user == user)
                .ok_or_else(|| MembershipError::NotACollaborator {
                    trip: trip.clone(),
                    user: user.clone(),
                })?;
            row.role = role;
            Ok(())
        })
    }

    async fn collaborators(&self, trip: &TripId) -> Result<Vec<Collaborator>, MembershipError> {
        self.with_trips(|trips| Ok(record(trips, trip)?.collaborators.clone()))
    }
}
