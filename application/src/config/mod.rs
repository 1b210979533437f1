//! Application-level configuration.
//!
//! - [`ConsensusConfig`]: quorum rule and promotion behavior for the engine

pub mod consensus_config;

pub use consensus_config::ConsensusConfig;
