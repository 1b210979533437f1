//! Configuration issues reported by file-config validation.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default is used instead.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field could not be parsed into its enum/rule type.
    InvalidValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field must be greater than zero.
    ZeroValue { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ConfigIssue {
            severity: Severity::Warning,
            code: ConfigIssueCode::ZeroValue {
                field: "presence.channel_capacity".to_string(),
            },
            message: "presence.channel_capacity must be > 0".to_string(),
        };
        assert!(!issue.is_error());
        assert_eq!(
            issue.to_string(),
            "warning: presence.channel_capacity must be > 0"
        );
    }
}
