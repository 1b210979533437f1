//! Trip membership domain
//!
//! A trip has exactly one owner and any number of collaborators. Everyone in
//! either group is a *member* and may vote. The owner is implicit: it is not a
//! collaborator row, and [`MemberCount`] is the only place that adds it back.

pub mod entities;
pub mod ids;
pub mod membership;

pub use entities::{Collaborator, CollaboratorRole, Trip, TripStatus};
pub use ids::{CandidateId, DestinationId, TripId, UserId};
pub use membership::MemberCount;
