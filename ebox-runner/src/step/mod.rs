//! Step layer
//!
//! Build steps a job is made of. The only step kind deploys a box and, once
//! done, acts as an instance provider for the steps after it.

mod console;
mod deploy_box;

pub use console::StepLog;
pub use deploy_box::{DeployBoxStep, STEP_KIND, StepContext, StepError, generate_step_id};
