//! Infrastructure layer for tripvote
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod memory;
pub mod presence;
pub mod scenario;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileLoggingConfig, FileOutputConfig, FilePresenceConfig,
    FileQuorumConfig,
};
pub use logging::JsonlActivityLogger;
pub use memory::{
    ConflictMode, MemoryCandidateCatalog, MemoryItineraryStore, MemoryMembershipStore,
    MemoryVoteLedger,
};
pub use presence::BroadcastPresence;
pub use scenario::{ScenarioLoadError, ScenarioLoader};
