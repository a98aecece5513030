//! Status registry module
//!
//! This module contains the service status tracking implementation split into logical components:
//! - `types`: Data structures and type definitions
//! - `keys`: Cache key and channel naming contract
//! - `store`: Status record storage and the active-name set
//! - `heartbeat`: Liveness signal recording and staleness checks
//! - `publisher`: Status and heartbeat event broadcasting

pub mod heartbeat;
pub mod keys;
pub mod publisher;
pub mod store;
pub mod types;

// Re-export public types for easier access
pub use heartbeat::HeartbeatRecorder;
pub use publisher::StatusPublisher;
pub use store::StatusStore;
pub use types::{HealthState, HeartbeatEvent, ServiceMetrics, ServiceStatus};
