//! Core domain types
//!
//! These types are shared between the HTTP client (which moves them over the
//! wire) and the runner (which builds, resolves and deploys them).

pub mod binding;
pub mod boxes;
pub mod deployment;
pub mod instance;
pub mod log;
pub mod provider;
