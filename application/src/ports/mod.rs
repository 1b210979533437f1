//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod activity_logger;
pub mod candidate_catalog;
pub mod fanout;
pub mod itinerary_store;
pub mod membership_store;
pub mod progress;
pub mod vote_ledger;
