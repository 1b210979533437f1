//! Application layer for tripvote
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ConsensusConfig;
pub use ports::{
    activity_logger::{ActivityEvent, ActivityLogger, NoActivityLogger},
    candidate_catalog::{CandidateCatalog, CatalogError},
    fanout::{FanoutError, FanoutNotifier, NoFanout},
    itinerary_store::{InsertOutcome, ItineraryError, ItineraryStore},
    membership_store::{MembershipChange, MembershipError, MembershipStore},
    progress::{NoScenarioProgress, ScenarioProgress},
    vote_ledger::{LedgerError, VoteLedger},
};
pub use use_cases::build_deck::{BuildDeckError, BuildDeckUseCase, Deck};
pub use use_cases::cast_vote::{CastVoteError, CastVoteInput, CastVoteUseCase};
pub use use_cases::manage_membership::{
    JoinOutcome, ManageMembershipError, ManageMembershipUseCase, RoleChange,
};
pub use use_cases::run_scenario::{
    BurstSummary, MemberDeck, RunScenarioError, RunScenarioUseCase, Scenario, ScenarioReport,
    ScenarioStep, ScenarioTrip, StepOutcome, StepReport,
};
