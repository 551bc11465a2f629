use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    bridge::{LocationBridge, UpdateSink},
    location::LocationSample,
    service::LocationService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// A named operation from the caller layer
pub enum BridgeRequest {
    GetLastKnownLocation,
    StartLocationUpdates,
    StopLocationUpdates,
}

impl BridgeRequest {
    /// Parse a caller-facing method name, [None] for anything unrecognized
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "getLastKnownLocation" => Some(Self::GetLastKnownLocation),
            "startLocationUpdates" => Some(Self::StartLocationUpdates),
            "stopLocationUpdates" => Some(Self::StopLocationUpdates),
            _ => None,
        }
    }

    /// The caller-facing method name for this operation
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetLastKnownLocation => "getLastKnownLocation",
            Self::StartLocationUpdates => "startLocationUpdates",
            Self::StopLocationUpdates => "stopLocationUpdates",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Answer to a [BridgeRequest]
pub enum BridgeResponse {
    /// Result of a one-shot query, [None] when no fix is available
    Fix(Option<LocationSample>),
    /// The operation was accepted; updates (if any) arrive out-of-band
    Ack,
    /// The method name is not part of the bridge contract
    NotImplemented,
}

/// Boundary adapter: receives named requests, dispatches to the matching
/// [LocationBridge] operation, and shapes the result. Continuous updates
/// flow out-of-band through the sink the router was built with.
pub struct CallRouter<S: LocationService, U: UpdateSink + Clone> {
    bridge: LocationBridge<S>,
    updates: U,
}

impl<S: LocationService, U: UpdateSink + Clone> CallRouter<S, U> {
    pub fn new(bridge: LocationBridge<S>, updates: U) -> Self {
        Self { bridge, updates }
    }

    /// Dispatch a raw method name; unrecognized names answer
    /// [BridgeResponse::NotImplemented] and leave the bridge untouched
    pub async fn dispatch(&self, method: &str) -> BridgeResponse {
        match BridgeRequest::from_method(method) {
            Some(request) => self.handle(request).await,
            None => {
                warn!("Unrecognized bridge method: {method}");
                BridgeResponse::NotImplemented
            }
        }
    }

    pub async fn handle(&self, request: BridgeRequest) -> BridgeResponse {
        match request {
            BridgeRequest::GetLastKnownLocation => {
                BridgeResponse::Fix(self.bridge.last_known().await)
            }
            BridgeRequest::StartLocationUpdates => {
                self.bridge.start_updates(self.updates.clone()).await;
                BridgeResponse::Ack
            }
            BridgeRequest::StopLocationUpdates => {
                self.bridge.stop_updates().await;
                BridgeResponse::Ack
            }
        }
    }

    pub fn bridge(&self) -> &LocationBridge<S> {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        SubscriptionConfig,
        tests::{MockService, RecordingSink, settle},
    };

    fn mk_router(service: &MockService) -> CallRouter<MockService, RecordingSink> {
        let bridge = LocationBridge::new(service.clone(), SubscriptionConfig::default());
        CallRouter::new(bridge, RecordingSink::default())
    }

    #[test]
    fn method_names_round_trip() {
        for request in [
            BridgeRequest::GetLastKnownLocation,
            BridgeRequest::StartLocationUpdates,
            BridgeRequest::StopLocationUpdates,
        ] {
            assert_eq!(BridgeRequest::from_method(request.method()), Some(request));
        }
    }

    #[tokio::test]
    async fn unrecognized_method_is_not_implemented() {
        let service = MockService::default();
        let router = mk_router(&service);

        assert_eq!(
            router.dispatch("fooBar").await,
            BridgeResponse::NotImplemented
        );
        assert!(
            !router.bridge().updates_active().await,
            "Bridge state must be unchanged"
        );
        assert_eq!(service.feed_count(), 0);
    }

    #[tokio::test]
    async fn one_shot_query_shapes_fix_or_absent() {
        let service = MockService::default();
        let router = mk_router(&service);

        assert_eq!(
            router.dispatch("getLastKnownLocation").await,
            BridgeResponse::Fix(None)
        );

        service.set_last_known(LocationSample::new(10.0, 20.0));
        assert_eq!(
            router.dispatch("getLastKnownLocation").await,
            BridgeResponse::Fix(Some(LocationSample::new(10.0, 20.0)))
        );

        service.fail_last_known();
        assert_eq!(
            router.dispatch("getLastKnownLocation").await,
            BridgeResponse::Fix(None),
            "Provider failure never surfaces as a fault"
        );
    }

    #[tokio::test]
    async fn start_and_stop_are_acknowledged() {
        let service = MockService::default();
        let router = mk_router(&service);

        assert_eq!(
            router.dispatch("startLocationUpdates").await,
            BridgeResponse::Ack
        );
        assert!(router.bridge().updates_active().await);

        let feed = service.latest_feed();
        assert!(feed.push_fix(Some(LocationSample::new(10.0, 20.0))).await);
        settle().await;

        assert_eq!(
            router.dispatch("stopLocationUpdates").await,
            BridgeResponse::Ack
        );
        assert!(!router.bridge().updates_active().await);
        assert!(!feed.push_fix(None).await);
    }
}
