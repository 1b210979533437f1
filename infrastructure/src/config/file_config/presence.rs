//! Presence configuration from TOML (`[presence]` section)

use serde::{Deserialize, Serialize};

/// Default buffer of each per-trip broadcast channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Raw presence configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePresenceConfig {
    /// Events buffered per trip before slow subscribers start lagging
    pub channel_capacity: usize,
}

impl Default for FilePresenceConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_config_deserialize() {
        let toml_str = r#"
[presence]
channel_capacity = 8
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.presence.channel_capacity, 8);
    }
}
