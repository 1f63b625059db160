//! Monitor layer
//!
//! Follows long-running deployments on the box platform until they reach a
//! terminal state or run out of time.

pub mod progress;

pub use progress::{DeploymentHandle, DeploymentMonitor, DeploymentOutcome, MonitorError};
