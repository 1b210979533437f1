//! In-memory storage adapters
//!
//! Each store guards its whole state with one mutex, so every port call is
//! atomic with respect to the others on the same store.

mod catalog;
mod itinerary;
mod membership;
mod vote_ledger;

pub use catalog::MemoryCandidateCatalog;
pub use itinerary::{ConflictMode, MemoryItineraryStore};
pub use membership::MemoryMembershipStore;
pub use vote_ledger::MemoryVoteLedger;
