//! Consensus engine parameters.

use serde::{Deserialize, Serialize};
use tripvote_domain::QuorumRule;

/// Parameters for [`CastVoteUseCase`](crate::use_cases::cast_vote::CastVoteUseCase).
///
/// The default is the strict-majority rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConsensusConfig {
    /// Rule used to turn member count into a promotion threshold
    pub rule: QuorumRule,
}

impl ConsensusConfig {
    pub fn new(rule: QuorumRule) -> Self {
        Self { rule }
    }

    pub fn with_rule(mut self, rule: QuorumRule) -> Self {
        self.rule = rule;
        self
    }
}
