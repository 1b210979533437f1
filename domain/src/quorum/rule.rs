//! Quorum rules for promotion thresholds
//!
//! A rule turns the size of a trip's membership into the number of likes a
//! candidate needs before it is promoted into the itinerary.

use crate::core::error::DomainError;
use crate::trip::MemberCount;
use serde::{Deserialize, Serialize};

/// Rule for computing a trip's promotion threshold
///
/// - `Majority`: strict majority, `floor(total / 2) + 1` (default)
/// - `Unanimous`: every member must like the candidate
/// - `AtLeast(n)`: a fixed number of likes
/// - `Percentage(p)`: at least p% of members, rounded up
///
/// Whatever the rule, the threshold is clamped to `1..=total` so that a
/// candidate can always be promoted and a single like never suffices for a
/// group unless the rule says so.
///
/// # Example
///
/// ```
/// use tripvote_domain::{MemberCount, QuorumRule};
///
/// let rule = QuorumRule::Majority;
/// assert_eq!(rule.threshold(MemberCount::from_collaborators(2)), 2); // 3 members
/// assert_eq!(rule.threshold(MemberCount::from_collaborators(3)), 3); // 4 members
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuorumRule {
    /// More than half of the members (n/2 + 1)
    #[default]
    Majority,

    /// All members
    Unanimous,

    /// At least n likes
    AtLeast(usize),

    /// At least this percentage of members (0-100)
    Percentage(u8),
}

impl QuorumRule {
    /// Minimum number of likes required for a trip with `total` members
    pub fn min_likes_needed(&self, total: usize) -> usize {
        let raw = match self {
            QuorumRule::Majority => total / 2 + 1,
            QuorumRule::Unanimous => total,
            QuorumRule::AtLeast(n) => *n,
            QuorumRule::Percentage(p) => {
                (total as f64 * (f64::from(*p).min(100.0) / 100.0)).ceil() as usize
            }
        };
        raw.clamp(1, total.max(1))
    }

    /// Promotion threshold for the given membership
    pub fn threshold(&self, members: MemberCount) -> usize {
        self.min_likes_needed(members.total())
    }

    /// Check whether `likes` reaches the threshold for `members`
    pub fn is_reached(&self, likes: usize, members: MemberCount) -> bool {
        likes >= self.threshold(members)
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> String {
        match self {
            QuorumRule::Majority => "majority (more than half)".to_string(),
            QuorumRule::Unanimous => "unanimous (every member)".to_string(),
            QuorumRule::AtLeast(n) => format!("at least {} likes", n),
            QuorumRule::Percentage(p) => format!("at least {}% of members", p),
        }
    }
}

impl std::fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for QuorumRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "majority" => Ok(QuorumRule::Majority),
            "unanimous" => Ok(QuorumRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .unwrap_or_default()
                    .parse()
                    .map_err(|_| DomainError::InvalidRule(format!("invalid count in '{}'", s)))?;
                Ok(QuorumRule::AtLeast(n))
            }
            s if s.starts_with("percentage:") || s.ends_with('%') => {
                let num_str = s.trim_start_matches("percentage:").trim_end_matches('%');
                let p: u8 = num_str
                    .parse()
                    .map_err(|_| DomainError::InvalidRule(format!("invalid percentage in '{}'", s)))?;
                if p > 100 {
                    return Err(DomainError::InvalidRule(format!(
                        "percentage must be 0-100, got {}",
                        p
                    )));
                }
                Ok(QuorumRule::Percentage(p))
            }
            other => Err(DomainError::InvalidRule(format!(
                "unknown quorum rule '{}'. Valid: majority, unanimous, atleast:N, percentage:N or N%",
                other
            ))),
        }
    }
}
