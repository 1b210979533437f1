//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod output;
mod presence;
mod quorum;

pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use presence::{DEFAULT_CHANNEL_CAPACITY, FilePresenceConfig};
pub use quorum::FileQuorumConfig;

use serde::{Deserialize, Serialize};
use tripvote_domain::{ConfigIssue, ConfigIssueCode, Severity};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Promotion rule
    pub quorum: FileQuorumConfig,
    /// Real-time fan-out settings
    pub presence: FilePresenceConfig,
    /// Diagnostic and activity log destinations
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.quorum.parse_rule().1);

        if self.presence.channel_capacity == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::ZeroValue {
                    field: "presence.channel_capacity".to_string(),
                },
                message: "presence.channel_capacity must be greater than 0".to_string(),
            });
        }

        issues
    }

    /// Whether any of the issues is fatal
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(ConfigIssue::is_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripvote_domain::{OutputFormat, QuorumRule};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[quorum]
rule = "unanimous"

[presence]
channel_capacity = 16

[logging]
activity_log = "activity.jsonl"

[output]
format = "itinerary"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.quorum.parse_rule().0, QuorumRule::Unanimous);
        assert_eq!(config.presence.channel_capacity, 16);
        assert_eq!(config.logging.activity_log.as_deref(), Some("activity.jsonl"));
        assert_eq!(config.output.format, Some(OutputFormat::Itinerary));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[quorum]
rule = "120%"

[presence]
channel_capacity = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(FileConfig::has_errors(&issues));
        assert!(
            issues
                .iter()
                .any(|i| matches!(&i.code, ConfigIssueCode::ZeroValue { field } if field == "presence.channel_capacity"))
        );
    }
}
