//! Fan-out Notifier port
//!
//! Pushes itinerary changes to every connected client of a trip.

use async_trait::async_trait;
use thiserror::Error;
use tripvote_domain::PromotionEvent;

/// Errors that can occur while publishing to the presence channel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FanoutError {
    #[error("Presence channel closed")]
    ChannelClosed,

    #[error("Fan-out failed: {0}")]
    Publish(String),
}

/// Port for real-time fan-out of promotions
#[async_trait]
pub trait FanoutNotifier: Send + Sync {
    /// Announce that a candidate was promoted for the first time
    async fn publish_promotion(&self, event: &PromotionEvent) -> Result<(), FanoutError>;
}

/// No-op notifier for tests and headless runs
pub struct NoFanout;

#[async_trait]
impl FanoutNotifier for NoFanout {
    async fn publish_promotion(&self, _event: &PromotionEvent) -> Result<(), FanoutError> {
        Ok(())
    }
}
