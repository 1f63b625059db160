//! Repository layer
//!
//! Repositories fetch raw records from the box platform and hand back typed
//! results. Transport and conversion failures are reported as
//! [`RepositoryError`]s naming the workspace or box involved, so callers never
//! depend on the client's error types directly.
//!
//! All repositories are trait-based to enable testing and mocking.

mod boxes;

// Re-export traits
pub use boxes::BoxRepository;

// Re-export implementations
pub use boxes::{ApiBoxRepository, RepositoryError};
