//! Quorum configuration from TOML (`[quorum]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [quorum]
//! rule = "majority"   # or "unanimous", "atleast:2", "75%"
//! ```

use serde::{Deserialize, Serialize};
use tripvote_domain::{ConfigIssue, ConfigIssueCode, QuorumRule, Severity};

/// Raw quorum configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuorumConfig {
    /// Promotion rule: "majority", "unanimous", "atleast:N", "N%"
    pub rule: String,
}

impl Default for FileQuorumConfig {
    fn default() -> Self {
        Self {
            rule: "majority".to_string(),
        }
    }
}

impl FileQuorumConfig {
    /// Parse the rule string, falling back to majority with an issue
    pub fn parse_rule(&self) -> (QuorumRule, Vec<ConfigIssue>) {
        match self.rule.parse::<QuorumRule>() {
            Ok(rule) => (rule, vec![]),
            Err(e) => {
                let issue = ConfigIssue {
                    severity: Severity::Error,
                    code: ConfigIssueCode::InvalidValue {
                        field: "quorum.rule".to_string(),
                        value: self.rule.clone(),
                        valid_values: vec![
                            "majority".to_string(),
                            "unanimous".to_string(),
                            "atleast:N".to_string(),
                            "N%".to_string(),
                        ],
                    },
                    message: format!("quorum.rule: {}", e),
                };
                (QuorumRule::default(), vec![issue])
            }
        }
    }
}
