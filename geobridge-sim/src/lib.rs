mod service;
mod walker;

pub use service::{SimConfig, SimulatedLocation};
pub use walker::RandomWalk;
