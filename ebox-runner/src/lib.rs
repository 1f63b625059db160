//! ElasticBox Runner
//!
//! Runs deploy-box jobs against an ElasticBox platform.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Repositories: Typed box lookups over the platform client
//! - Monitor: Deployment submission and status polling with a deadline
//! - Steps: Variable resolution and the deploy box step
//! - Jobs: Sequential step execution where earlier steps feed later ones

pub mod cancel;
pub mod config;
pub mod job;
pub mod monitor;
pub mod repository;
pub mod step;

#[cfg(test)]
mod testing;
