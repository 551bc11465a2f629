use log::{debug, warn};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    location::{LocationSample, SubscriptionConfig},
    service::{LocationService, ServiceEvent},
};

/// Caller-side seam for continuous updates. Implementations must not block;
/// hand the fix off to a channel or queue and return.
pub trait UpdateSink: Send + Sync + 'static {
    /// Forward one delivered fix (or its absence) to the caller
    fn send_update(&self, fix: Option<LocationSample>);
}

struct ActiveUpdates {
    id: Uuid,
    cancel: CancellationToken,
}

/// Mediates between a caller and a [LocationService]: one-shot last-known
/// lookups plus an at-most-one continuous update registration. Provider
/// errors never escape this layer, they collapse to "no fix" and a log line.
pub struct LocationBridge<S: LocationService> {
    service: S,
    config: SubscriptionConfig,
    active: Mutex<Option<ActiveUpdates>>,
}

impl<S: LocationService> LocationBridge<S> {
    pub fn new(service: S, config: SubscriptionConfig) -> Self {
        Self {
            service,
            config,
            active: Mutex::new(None),
        }
    }

    /// Best known last fix, [None] when the provider has none or failed
    pub async fn last_known(&self) -> Option<LocationSample> {
        match self.service.last_known().await {
            Ok(fix) => fix,
            Err(why) => {
                warn!("Last known location lookup failed: {why:?}");
                None
            }
        }
    }

    /// Arm continuous updates into `sink`. Re-entrant: an already active
    /// registration is released before the new one is armed, so at most one
    /// sink ever receives fixes and no two delivery streams overlap.
    /// Registration failures are logged and leave the bridge inactive.
    pub async fn start_updates<U: UpdateSink>(&self, sink: U) {
        // Holding the slot lock across the subscribe makes replacement atomic
        // with respect to concurrent start/stop calls.
        let mut active = self.active.lock().await;
        if let Some(old) = active.take() {
            debug!("Replacing update registration {}", old.id);
            old.cancel.cancel();
        }

        let mut subscription = match self.service.subscribe(self.config).await {
            Ok(subscription) => subscription,
            Err(why) => {
                warn!("Failed to register for location updates: {why:?}");
                return;
            }
        };

        let id = Uuid::new_v4();
        let cancel = subscription.cancel_token();
        debug!("Armed update registration {id}");

        tokio::spawn(async move {
            while let Some(event) = subscription.next_event().await {
                match event {
                    ServiceEvent::Fix(fix) => sink.send_update(fix),
                    ServiceEvent::Availability(available) => {
                        debug!("Location availability changed for {id}: {available}");
                    }
                }
            }
            debug!("Update registration {id} closed");
        });

        *active = Some(ActiveUpdates { id, cancel });
    }

    /// Release the active registration; a no-op when none is active. Safe to
    /// call at any time, the sink is never invoked again afterwards.
    pub async fn stop_updates(&self) {
        let mut active = self.active.lock().await;
        if let Some(active) = active.take() {
            debug!("Released update registration {}", active.id);
            active.cancel.cancel();
        }
    }

    /// Whether a continuous update registration is currently armed
    pub async fn updates_active(&self) -> bool {
        self.active.lock().await.is_some()
    }
}

impl<S: LocationService> Drop for LocationBridge<S> {
    fn drop(&mut self) {
        // Teardown releases the registration so no callbacks outlive the bridge
        if let Some(active) = self.active.get_mut().take() {
            active.cancel.cancel();
        }
    }
}
