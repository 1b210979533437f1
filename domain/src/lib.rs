//! Domain layer for tripvote
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Membership
//!
//! A trip has one owner and any number of collaborators. Both vote. The owner
//! is implicit, so the quorum size is always `collaborators + 1`
//! ([`MemberCount`]).
//!
//! ## Votes and Quorum
//!
//! - **Vote**: one like/pass per (trip, candidate, voter), last write wins
//! - **Quorum**: a candidate needs `threshold` likes ([`QuorumRule`])
//! - **Promotion**: the candidate becomes a [`TripItem`], exactly once

pub mod candidate;
pub mod config;
pub mod core;
pub mod itinerary;
pub mod quorum;
pub mod trip;

// Re-export commonly used types
pub use candidate::{Candidate, CandidateCategory};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::DomainError;
pub use itinerary::{PromotionEvent, TripItem, UNSCHEDULED_DAY};
pub use quorum::{CandidateState, Decision, QuorumRule, Vote, VoteOutcome, VoteTally};
pub use trip::{
    CandidateId, Collaborator, CollaboratorRole, DestinationId, MemberCount, Trip, TripId,
    TripStatus, UserId,
};
