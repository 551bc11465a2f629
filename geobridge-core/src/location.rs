use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A "part" of a location
pub type LocationComponent = f64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// A single resolved fix as reported by a location provider
pub struct LocationSample {
    /// Latitude in degrees
    pub latitude: LocationComponent,
    /// Longitude in degrees
    pub longitude: LocationComponent,
}

impl LocationSample {
    pub fn new(latitude: LocationComponent, longitude: LocationComponent) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Cadence and accuracy preferences for a continuous update registration
pub struct SubscriptionConfig {
    /// Target time between fixes
    pub interval: Duration,
    /// Fastest delivery the subscriber is willing to accept
    pub fastest_interval: Duration,
    /// Prefer precise (GPS-grade) fixes over coarse ones
    pub high_accuracy: bool,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            fastest_interval: Duration::from_secs(5),
            high_accuracy: true,
        }
    }
}
