//! Logging configuration from TOML (`[logging]` section)
//!
//! ```toml
//! [logging]
//! file = "~/.local/state/tripvote/tripvote.log"
//! activity_log = "activity.jsonl"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Diagnostic log file; tracing output is also written here when set
    pub file: Option<String>,
    /// JSONL audit trail of votes and promotions
    pub activity_log: Option<String>,
}

impl FileLoggingConfig {
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_deref().map(expand_home)
    }

    pub fn activity_log_path(&self) -> Option<PathBuf> {
        self.activity_log.as_deref().map(expand_home)
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_disabled_by_default() {
        let config = FileLoggingConfig::default();
        assert!(config.file_path().is_none());
        assert!(config.activity_log_path().is_none());
    }

    #[test]
    fn test_plain_paths_are_kept() {
        let config = FileLoggingConfig {
            file: None,
            activity_log: Some("logs/activity.jsonl".to_string()),
        };
        assert_eq!(
            config.activity_log_path(),
            Some(PathBuf::from("logs/activity.jsonl"))
        );
    }

    #[test]
    fn test_home_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config = FileLoggingConfig {
            file: Some("~/tripvote.log".to_string()),
            activity_log: None,
        };
        assert_eq!(config.file_path(), Some(home.join("tripvote.log")));
    }
}
