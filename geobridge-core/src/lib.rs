mod bridge;
mod location;
mod router;
mod service;

pub use bridge::{LocationBridge, UpdateSink};
pub use location::{LocationComponent, LocationSample, SubscriptionConfig};
pub use router::{BridgeRequest, BridgeResponse, CallRouter};
pub use service::{LocationService, ServiceEvent, Subscription, SubscriptionFeed};

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
