//! Configuration file loading for tripvote
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `TRIPVOTE_*`
//! 2. `--config <path>` specified file
//! 3. Project root: `./tripvote.toml` or `./.tripvote.toml`
//! 4. Global: `$XDG_CONFIG_HOME/tripvote/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_CHANNEL_CAPACITY, FileConfig, FileLoggingConfig, FileOutputConfig, FilePresenceConfig,
    FileQuorumConfig,
};
pub use loader::ConfigLoader;
