//! Manage Membership use case
//!
//! Joining a trip and changing collaborator roles. Both run before any vote
//! and decide who counts toward the quorum.

use crate::ports::activity_logger::{ActivityEvent, ActivityLogger};
use crate::ports::membership_store::{MembershipChange, MembershipError, MembershipStore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use tripvote_domain::{CollaboratorRole, Trip, TripId, UserId};

/// Errors that can occur while managing membership
#[derive(Error, Debug)]
pub enum ManageMembershipError {
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    #[error("User {actor} may not change roles on trip {trip}")]
    Forbidden { trip: TripId, actor: UserId },

    #[error("Invalid role change for {target}: {reason}")]
    InvalidRoleChange { target: UserId, reason: String },

    #[error("Membership error: {0}")]
    Membership(#[from] MembershipError),
}

/// Result of a join request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    Joined,
    AlreadyMember,
}

impl JoinOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinOutcome::Joined => "joined",
            JoinOutcome::AlreadyMember => "already member",
        }
    }
}

/// A role transition applied by [`ManageMembershipUseCase::escalate_role`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChange {
    pub previous: CollaboratorRole,
    pub current: CollaboratorRole,
}

/// Use case for trip membership
pub struct ManageMembershipUseCase<M: MembershipStore + 'static> {
    membership: Arc<M>,
    activity: Option<Arc<dyn ActivityLogger>>,
}

impl<M: MembershipStore + 'static> Clone for ManageMembershipUseCase<M> {
    fn clone(&self) -> Self {
        Self {
            membership: self.membership.clone(),
            activity: self.activity.clone(),
        }
    }
}

impl<M: MembershipStore + 'static> ManageMembershipUseCase<M> {
    pub fn new(membership: Arc<M>) -> Self {
        Self {
            membership,
            activity: None,
        }
    }

    pub fn with_activity_logger(mut self, logger: Arc<dyn ActivityLogger>) -> Self {
        self.activity = Some(logger);
        self
    }

    /// Register a new trip owned by `trip.owner`
    pub async fn create_trip(&self, trip: Trip) -> Result<(), ManageMembershipError> {
        let id = trip.id.clone();
        let owner = trip.owner.clone();
        self.membership.register_trip(trip).await?;
        info!(trip = %id, %owner, "Trip created");
        Ok(())
    }

    /// Join a trip as a collaborator
    ///
    /// Joining twice, or joining one's own trip, changes nothing.
    pub async fn join_trip(
        &self,
        trip: &TripId,
        user: &UserId,
    ) -> Result<JoinOutcome, ManageMembershipError> {
        if self.membership.trip(trip).await?.is_none() {
            return Err(ManageMembershipError::TripNotFound(trip.clone()));
        }

        let outcome = match self
            .membership
            .add_member(trip, user, CollaboratorRole::Collaborator)
            .await?
        {
            MembershipChange::Added => JoinOutcome::Joined,
            MembershipChange::AlreadyMember => JoinOutcome::AlreadyMember,
        };

        if outcome == JoinOutcome::Joined {
            info!(%trip, %user, "Member joined trip");
            self.log_activity("member_joined", json!({ "trip": trip, "user": user }));
        }
        Ok(outcome)
    }

    /// Change a collaborator's role between `collaborator` and `admin`
    pub async fn escalate_role(
        &self,
        trip: &TripId,
        actor: &UserId,
        target: &UserId,
        role: CollaboratorRole,
    ) -> Result<RoleChange, ManageMembershipError> {
        let Some(record) = self.membership.trip(trip).await? else {
            return Err(ManageMembershipError::TripNotFound(trip.clone()));
        };

        let actor_role = self.membership.role(trip, actor).await?;
        if !actor_role.is_some_and(|r| r.can_manage_roles()) {
            warn!(%trip, %actor, "Role change rejected");
            return Err(ManageMembershipError::Forbidden {
                trip: trip.clone(),
                actor: actor.clone(),
            });
        }

        if role == CollaboratorRole::Owner {
            return Err(invalid(target, "the owner role cannot be granted"));
        }
        if record.is_owner(target) {
            return Err(invalid(target, "the owner's role cannot be changed"));
        }

        let Some(previous) = self.membership.role(trip, target).await? else {
            return Err(MembershipError::NotACollaborator {
                trip: trip.clone(),
                user: target.clone(),
            }
            .into());
        };

        if previous != role {
            self.membership.set_role(trip, target, role).await?;
            info!(%trip, %actor, %target, from = %previous, to = %role, "Role changed");
            self.log_activity(
                "role_changed",
                json!({
                    "trip": trip,
                    "actor": actor,
                    "target": target,
                    "from": previous,
                    "to": role,
                }),
            );
        }

        Ok(RoleChange {
            previous,
            current: role,
        })
    }

    fn log_activity(&self, event_type: &'static str, payload: serde_json::Value) {
        if let Some(logger) = &self.activity {
            logger.log(ActivityEvent::new(event_type, payload));
        }
    }
}

fn invalid(target: &UserId, reason: &str) -> ManageMembershipError {
    ManageMembershipError::InvalidRoleChange {
        target: target.clone(),
        reason: reason.to_string(),
    }
}
