use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use geobridge_core::{
    LocationSample, LocationService, ServiceEvent, Subscription, SubscriptionConfig, prelude::*,
};
use log::{debug, info};

use crate::walker::RandomWalk;

#[derive(Debug, Clone, Copy)]
/// Configuration for the simulated provider
pub struct SimConfig {
    /// Where the simulated device starts out
    pub origin: LocationSample,
    /// Upper bound on movement between fixes, in meters
    pub step_meters: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            origin: LocationSample::new(51.4769, -0.0005),
            step_meters: 25.0,
        }
    }
}

struct SimState {
    walker: RandomWalk,
    last_fix: Option<LocationSample>,
}

/// Fused-provider stand-in: walks a [RandomWalk] on the requested cadence
/// and remembers the newest fix as the last known one. Clones share the
/// position model, so every registration sees the same device.
#[derive(Clone)]
pub struct SimulatedLocation {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedLocation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                walker: RandomWalk::new(config.origin, config.step_meters),
                last_fix: None,
            })),
        }
    }

    fn next_fix(&self) -> LocationSample {
        let mut state = self.state.lock().expect("Sim state poisoned");
        let fix = state.walker.step();
        state.last_fix = Some(fix);
        fix
    }
}

/// Pick a delivery gap between the fastest and target intervals
fn jittered_cadence(config: &SubscriptionConfig) -> Duration {
    let fastest = config.fastest_interval.min(config.interval);
    if fastest == config.interval {
        config.interval
    } else {
        rand::random_range(fastest..=config.interval)
    }
}

impl LocationService for SimulatedLocation {
    async fn last_known(&self) -> Result<Option<LocationSample>> {
        Ok(self.state.lock().expect("Sim state poisoned").last_fix)
    }

    async fn subscribe(&self, config: SubscriptionConfig) -> Result<Subscription> {
        let (feed, subscription) = Subscription::channel();
        let sim = self.clone();
        info!(
            "Simulated registration armed, target interval {:?}, high accuracy: {}",
            config.interval, config.high_accuracy
        );

        tokio::spawn(async move {
            let cancel = feed.cancel_token();

            if !feed.send(ServiceEvent::Availability(true)).await {
                return;
            }

            loop {
                let wait = jittered_cadence(&config);
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => break,

                    _ = tokio::time::sleep(wait) => {}
                }

                let fix = sim.next_fix();
                debug!("Simulated fix: {:.5}, {:.5}", fix.latitude, fix.longitude);
                if !feed.push_fix(Some(fix)).await {
                    break;
                }
            }
            debug!("Simulated registration released");
        });

        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn no_fix_before_first_delivery() {
        let sim = SimulatedLocation::new(SimConfig::default());
        assert!(sim.last_known().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_fixes_and_tracks_last_known() {
        let sim = SimulatedLocation::new(SimConfig::default());
        let mut subscription = sim.subscribe(SubscriptionConfig::default()).await.unwrap();

        assert_eq!(
            subscription.next_event().await,
            Some(ServiceEvent::Availability(true)),
            "Availability is reported when the registration arms"
        );

        let event = subscription.next_event().await;
        assert!(
            matches!(event, Some(ServiceEvent::Fix(Some(_)))),
            "Expected a fix, got {event:?}"
        );
        assert!(
            sim.last_known().await.unwrap().is_some(),
            "Delivered fixes become the last known one"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn release_halts_delivery() {
        let sim = SimulatedLocation::new(SimConfig::default());
        let mut subscription = sim.subscribe(SubscriptionConfig::default()).await.unwrap();

        subscription.release();
        assert!(subscription.next_event().await.is_none());
    }

    #[test]
    fn cadence_stays_between_fastest_and_target() {
        let config = SubscriptionConfig::default();
        for _ in 0..50 {
            let wait = jittered_cadence(&config);
            assert!(wait >= config.fastest_interval && wait <= config.interval);
        }

        let fixed = SubscriptionConfig {
            interval: Duration::from_secs(10),
            fastest_interval: Duration::from_secs(10),
            high_accuracy: false,
        };
        assert_eq!(jittered_cadence(&fixed), fixed.interval);
    }
}
