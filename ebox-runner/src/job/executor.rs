//! Job executor
//!
//! Runs the steps of a job in order. The first failing step stops the job.

use chrono::{DateTime, Utc};
use ebox_core::domain::instance::InstanceProvider;
use ebox_core::domain::log::LogEntry;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::job::JobDefinition;
use crate::step::{StepContext, StepError, StepLog};

/// A step that stopped the job
#[derive(Debug, Error)]
#[error("Step {step_id} failed: {source}")]
pub struct JobError {
    pub step_id: String,
    #[source]
    pub source: StepError,
    /// Steps that completed before the failure
    pub completed: Vec<StepReport>,
}

/// What one completed step did
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step_id: String,
    pub box_id: String,
    pub instance_id: String,
    pub resource_url: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub log: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub name: String,
    pub steps: Vec<StepReport>,
}

/// Runs job definitions against a step context
pub struct JobExecutor {
    context: StepContext,
}

impl JobExecutor {
    pub fn new(context: StepContext) -> Self {
        Self { context }
    }

    /// Runs every step of the job in order
    ///
    /// Steps that complete keep their instance id, so a job that failed
    /// halfway still shows what was deployed.
    pub async fn run(&self, job: &mut JobDefinition) -> Result<JobReport, JobError> {
        let name = job.display_name().to_string();
        let total = job.steps.len();
        info!("Running job {} ({} step(s))", name, total);

        let mut reports = Vec::with_capacity(total);

        for index in 0..total {
            let (done, rest) = job.steps.split_at_mut(index);
            let step = &mut rest[0];
            let providers: Vec<&dyn InstanceProvider> = done
                .iter()
                .map(|step| step as &dyn InstanceProvider)
                .collect();

            info!(
                "Step {}/{}: deploying box {} ({})",
                index + 1,
                total,
                step.box_id(),
                step.id()
            );

            let mut console = StepLog::new(step.id());
            let started_at = Utc::now();

            match step.perform(&self.context, &providers, &mut console).await {
                Ok(outcome) => reports.push(StepReport {
                    step_id: step.id().to_string(),
                    box_id: step.box_id().to_string(),
                    instance_id: outcome.instance_id,
                    resource_url: outcome.resource_url,
                    started_at,
                    completed_at: Utc::now(),
                    log: console.drain(),
                }),
                Err(source) => {
                    error!("Job {} stopped at step {}: {}", name, step.id(), source);
                    return Err(JobError {
                        step_id: step.id().to_string(),
                        source,
                        completed: reports,
                    });
                }
            }
        }

        info!("Job {} completed", name);
        Ok(JobReport {
            name,
            steps: reports,
        })
    }
}
