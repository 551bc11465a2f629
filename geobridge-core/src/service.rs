use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    location::{LocationSample, SubscriptionConfig},
    prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq)]
/// Something a provider delivers through an active registration
pub enum ServiceEvent {
    /// A periodic fix, [None] when the provider had nothing this cycle
    Fix(Option<LocationSample>),
    /// The provider's availability changed; observed and logged, never acted upon
    Availability(bool),
}

const EVENT_QUEUE_SIZE: usize = 15;

/// Receiving half of an update registration, handed to the subscriber.
/// Calling [Self::release] (or cancelling the shared token) ends the
/// registration; the paired [SubscriptionFeed] refuses sends afterwards.
pub struct Subscription {
    events: mpsc::Receiver<ServiceEvent>,
    cancel: CancellationToken,
}

impl Subscription {
    /// Create a linked feed/subscription pair. The provider keeps the feed
    /// and delivers events through it until the registration is released.
    pub fn channel() -> (SubscriptionFeed, Subscription) {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_SIZE);
        let cancel = CancellationToken::new();
        (
            SubscriptionFeed {
                events: tx,
                cancel: cancel.clone(),
            },
            Subscription { events: rx, cancel },
        )
    }

    /// Wait for the next event. Returns [None] once the registration has
    /// been released or the provider has dropped its feed; release wins over
    /// queued events so nothing is delivered after it.
    pub async fn next_event(&mut self) -> Option<ServiceEvent> {
        tokio::select! {
            biased;

            _ = self.cancel.cancelled() => None,

            event = self.events.recv() => event,
        }
    }

    /// End the registration from the subscriber side
    pub fn release(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[derive(Debug, Clone)]
/// Sending half of an update registration, kept by the provider
pub struct SubscriptionFeed {
    events: mpsc::Sender<ServiceEvent>,
    cancel: CancellationToken,
}

impl SubscriptionFeed {
    /// Deliver an event in arrival order. Returns false once the
    /// registration is dead, the provider should stop producing then.
    pub async fn send(&self, event: ServiceEvent) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.events.send(event).await.is_ok()
    }

    /// Convenience for the common case, see [Self::send]
    pub async fn push_fix(&self, fix: Option<LocationSample>) -> bool {
        self.send(ServiceEvent::Fix(fix)).await
    }

    pub fn is_live(&self) -> bool {
        !self.cancel.is_cancelled() && !self.events.is_closed()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Platform-facing seam over whatever actually produces fixes: a fused
/// provider on device, a simulator, or a mock in tests.
pub trait LocationService: Send + Sync + 'static {
    /// Best-effort lookup of the provider's last known fix
    fn last_known(&self) -> impl Future<Output = Result<Option<LocationSample>>> + Send;

    /// Open a standing registration for periodic fixes at the given cadence.
    /// Implementations must stop producing once the registration is released.
    fn subscribe(
        &self,
        config: SubscriptionConfig,
    ) -> impl Future<Output = Result<Subscription>> + Send;
}
