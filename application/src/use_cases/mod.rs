//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod build_deck;
pub mod cast_vote;
pub mod manage_membership;
pub mod run_scenario;
