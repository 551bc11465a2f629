use interprocess::local_socket::{GenericNamespaced, Name, ToNsName};
use serde::{Deserialize, Serialize};

use geobridge_core::{BridgeResponse, LocationSample};

pub mod prelude {
    pub use anyhow::{Context, anyhow, bail};
    pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
}

pub use prelude::*;

pub fn get_socket_name(base_name: String) -> Result<Name<'static>> {
    base_name
        .to_ns_name::<GenericNamespaced>()
        .context("Failed to parse socket name")
}

/// One request line from the caller layer: a bare method name, matching the
/// call contract of the bridge (unknown names are answered, not rejected)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRequest {
    pub method: String,
}

impl WireRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
        }
    }
}

/// One reply line from the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WireEvent {
    /// Direct answer to the most recent request
    Response(BridgeResponse),
    /// Out-of-band location update from an active registration
    Update(Option<LocationSample>),
    /// Something went wrong serving the connection
    Error(String),
}

impl From<BridgeResponse> for WireEvent {
    fn from(val: BridgeResponse) -> Self {
        WireEvent::Response(val)
    }
}

impl From<anyhow::Error> for WireEvent {
    fn from(value: anyhow::Error) -> Self {
        WireEvent::Error(value.to_string())
    }
}
