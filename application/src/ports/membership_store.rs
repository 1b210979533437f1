//! Membership Store port
//!
//! Holds trips, their owners and collaborator rows. The owner is never a
//! collaborator row; adapters must answer `is_member` and `role` for the owner
//! from the trip record itself.

use async_trait::async_trait;
use thiserror::Error;
use tripvote_domain::{Collaborator, CollaboratorRole, MemberCount, Trip, TripId, UserId};

/// Errors that can occur in the membership store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    #[error("Trip already exists: {0}")]
    TripExists(TripId),

    #[error("User {user} is not a collaborator on trip {trip}")]
    NotACollaborator { trip: TripId, user: UserId },

    #[error("Membership storage error: {0}")]
    Storage(String),
}

/// Result of adding a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// A new collaborator row was created
    Added,
    /// The user was already the owner or a collaborator; nothing changed
    AlreadyMember,
}

/// Port for trip membership
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Register a new trip; fails with `TripExists` if the id is taken
    async fn register_trip(&self, trip: Trip) -> Result<(), MembershipError>;

    /// Look up a trip
    async fn trip(&self, trip: &TripId) -> Result<Option<Trip>, MembershipError>;

    /// Whether the user is the owner or a collaborator of the trip
    async fn is_member(&self, trip: &TripId, user: &UserId) -> Result<bool, MembershipError>;

    /// Number of collaborator rows, owner excluded
    async fn collaborator_count(&self, trip: &TripId) -> Result<usize, MembershipError>;

    /// The user's role, `Owner` for the owner, `None` for non-members
    async fn role(
        &self,
        trip: &TripId,
        user: &UserId,
    ) -> Result<Option<CollaboratorRole>, MembershipError>;

    /// Idempotently add a collaborator row
    async fn add_member(
        &self,
        trip: &TripId,
        user: &UserId,
        role: CollaboratorRole,
    ) -> Result<MembershipChange, MembershipError>;

    /// Change the role of an existing collaborator row
    async fn set_role(
        &self,
        trip: &TripId,
        user: &UserId,
        role: CollaboratorRole,
    ) -> Result<(), MembershipError>;

    /// All collaborator rows of the trip (owner excluded)
    async fn collaborators(&self, trip: &TripId) -> Result<Vec<Collaborator>, MembershipError>;

    /// Quorum-relevant size of the trip, owner included
    async fn member_count(&self, trip: &TripId) -> Result<MemberCount, MembershipError> {
        let collaborators = self.collaborator_count(trip).await?;
        Ok(MemberCount::from_collaborators(collaborators))
    }
}
