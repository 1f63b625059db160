//! Job layer
//!
//! A job is an ordered list of deploy steps. Steps run one after another and
//! each completed step becomes an instance provider for the ones after it.

mod definition;
mod executor;

pub use definition::{JobDefinition, JobDefinitionError};
pub use executor::{JobError, JobExecutor, JobReport, StepReport};
