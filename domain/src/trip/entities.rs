//! Trip and collaborator entities.

use super::ids::{DestinationId, TripId, UserId};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    /// Members are still voting on candidates
    #[default]
    Planning,
    /// Itinerary has been booked
    Booked,
    /// Trip is over or abandoned
    Archived,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Booked => "booked",
            TripStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TripStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planning" => Ok(TripStatus::Planning),
            "booked" => Ok(TripStatus::Booked),
            "archived" => Ok(TripStatus::Archived),
            other => Err(DomainError::UnknownTripStatus(other.to_string())),
        }
    }
}

/// A group trip (Entity)
///
/// The owner is a member by construction and is never stored as a
/// [`Collaborator`] row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub owner: UserId,
    pub destination: DestinationId,
    pub title: String,
    #[serde(default)]
    pub status: TripStatus,
}

impl Trip {
    pub fn new(
        id: impl Into<TripId>,
        owner: impl Into<UserId>,
        destination: impl Into<DestinationId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            destination: destination.into(),
            title: title.into(),
            status: TripStatus::Planning,
        }
    }

    pub fn with_status(mut self, status: TripStatus) -> Self {
        self.status = status;
        self
    }

    /// Check whether the given user owns this trip
    pub fn is_owner(&self, user: &UserId) -> bool {
        &self.owner == user
    }
}

/// Role a user holds on a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorRole {
    Owner,
    Admin,
    #[default]
    Collaborator,
}

impl CollaboratorRole {
    /// Whether this role may change other members' roles
    pub fn can_manage_roles(&self) -> bool {
        matches!(self, CollaboratorRole::Owner | CollaboratorRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollaboratorRole::Owner => "owner",
            CollaboratorRole::Admin => "admin",
            CollaboratorRole::Collaborator => "collaborator",
        }
    }
}

impl std::fmt::Display for CollaboratorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CollaboratorRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(CollaboratorRole::Owner),
            "admin" => Ok(CollaboratorRole::Admin),
            "collaborator" | "member" => Ok(CollaboratorRole::Collaborator),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// A materialized membership row: at most one per (trip, user)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub trip: TripId,
    pub user: UserId,
    pub role: CollaboratorRole,
}

impl Collaborator {
    pub fn new(trip: impl Into<TripId>, user: impl Into<UserId>, role: CollaboratorRole) -> Self {
        Self {
            trip: trip.into(),
            user: user.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_defaults_to_planning() {
        let trip = Trip::new("t1", "olivia", "lisbon", "Lisbon weekend");
        assert_eq!(trip.status, TripStatus::Planning);
        assert!(trip.is_owner(&UserId::new("olivia")));
        assert!(!trip.is_owner(&UserId::new("ana")));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(
            "admin".parse::<CollaboratorRole>().ok(),
            Some(CollaboratorRole::Admin)
        );
        assert_eq!(
            "Member".parse::<CollaboratorRole>().ok(),
            Some(CollaboratorRole::Collaborator)
        );
        assert!("guest".parse::<CollaboratorRole>().is_err());
    }

    #[test]
    fn test_can_manage_roles() {
        assert!(CollaboratorRole::Owner.can_manage_roles());
        assert!(CollaboratorRole::Admin.can_manage_roles());
        assert!(!CollaboratorRole::Collaborator.can_manage_roles());
    }

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [TripStatus::Planning, TripStatus::Booked, TripStatus::Archived] {
            assert_eq!(status.as_str().parse::<TripStatus>().ok(), Some(status));
        }
    }

    #[test]
    fn test_trip_deserialize_without_status() {
        let json = r#"{"id":"t1","owner":"o","destination":"d","title":"T"}"#;
        let trip: Trip = serde_json::from_str(json).unwrap();
        assert_eq!(trip.status, TripStatus::Planning);
    }
}
