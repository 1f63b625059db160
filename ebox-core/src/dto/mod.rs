//! Data Transfer Objects for the box platform API
//!
//! Wire bodies built from domain types. Kept apart from the domain so the
//! platform's naming does not leak into it.

pub mod deployment;
