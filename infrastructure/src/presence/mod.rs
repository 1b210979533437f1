//! Real-time presence channel
//!
//! One `tokio::sync::broadcast` channel per trip. Every connected member of a
//! trip holds a receiver; the consensus engine publishes each first promotion
//! through the [`FanoutNotifier`](tripvote_application::FanoutNotifier) port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::debug;
use tripvote_application::ports::fanout::{FanoutError, FanoutNotifier};
use tripvote_domain::{PromotionEvent, TripId};

/// Per-trip broadcast fan-out
pub struct BroadcastPresence {
    channels: Mutex<HashMap<TripId, broadcast::Sender<PromotionEvent>>>,
    capacity: usize,
}

impl BroadcastPresence {
    /// `capacity` is the number of events buffered per trip, at least 1
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn lock(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<TripId, broadcast::Sender<PromotionEvent>>>, FanoutError>
    {
        self.channels
            .lock()
            .map_err(|_| FanoutError::Publish("presence lock poisoned".to_string()))
    }

    /// Connect to a trip's channel, creating it on first use
    pub fn subscribe(&self, trip: &TripId) -> Result<broadcast::Receiver<PromotionEvent>, FanoutError> {
        let mut channels = self.lock()?;
        let sender = channels
            .entry(trip.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        Ok(sender.subscribe())
    }

    /// Number of live receivers on a trip's channel
    pub fn subscriber_count(&self, trip: &TripId) -> usize {
        self.lock()
            .ok()
            .and_then(|channels| channels.get(trip).map(|s| s.receiver_count()))
            .unwrap_or(0)
    }
}

#[async_trait]
impl FanoutNotifier for BroadcastPresence {
    async fn publish_promotion(&self, event: &PromotionEvent) -> Result<(), FanoutError> {
        let channels = self.lock()?;
        let Some(sender) = channels.get(&event.trip) else {
            debug!(trip = %event.trip, "No one connected to trip, promotion not broadcast");
            return Ok(());
        };

        // `send` only fails when every receiver is gone
        match sender.send(event.clone()) {
            Ok(receivers) => {
                debug!(trip = %event.trip, candidate = %event.candidate, receivers, "Promotion broadcast");
            }
            Err(_) => {
                debug!(trip = %event.trip, "All receivers disconnected, promotion not broadcast");
            }
        }
        Ok(())
    }
}
