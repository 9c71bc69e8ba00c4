//! Per-service configuration for the cancellation-flow orchestrator:
//! checkpoint predicates, auth-edge-case detectors, and success/failure
//! indicators, held in a small in-process registry.

mod error;
mod registry;
mod service;

pub use error::{ConfigError, ConfigResult};
pub use registry::ServiceRegistry;
pub use service::{AuthDetector, CheckpointPredicate, ServiceConfig, SnapshotPredicate};
