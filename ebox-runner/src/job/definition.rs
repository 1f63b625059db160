//! Job definition files

use ebox_core::resolver::PROVIDER_KEY_PREFIX;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::step::DeployBoxStep;

#[derive(Debug, Error)]
pub enum JobDefinitionError {
    #[error("Failed to read job file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid job definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Job has no steps")]
    Empty,

    #[error("Step id {0} must start with ebox.steps.")]
    InvalidStepId(String),

    #[error("Step id {0} is used more than once")]
    DuplicateStepId(String),
}

/// Deploy steps of a job, in execution order
///
/// ```json
/// {
///   "name": "staging",
///   "steps": [
///     {"id": "ebox.steps.DeployBox-db", "workspace": "ops", "box": "b-db",
///      "profile": "p-db", "environment": "staging", "instances": 1},
///     {"workspace": "ops", "box": "b-web", "profile": "p-web",
///      "environment": "staging", "instances": 2,
///      "variables": "[{\"name\":\"db\",\"type\":\"Binding\",\"value\":\"ebox.steps.DeployBox-db\"}]"}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<DeployBoxStep>,
}

impl JobDefinition {
    /// Loads and validates a job file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, JobDefinitionError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| JobDefinitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parses and validates a job definition
    pub fn from_json(json: &str) -> Result<Self, JobDefinitionError> {
        let job: Self = serde_json::from_str(json)?;
        job.validate()?;
        Ok(job)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed job")
    }

    /// Checks that every step can be referenced by the steps after it
    pub fn validate(&self) -> Result<(), JobDefinitionError> {
        if self.steps.is_empty() {
            return Err(JobDefinitionError::Empty);
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !step.id().starts_with(PROVIDER_KEY_PREFIX) {
                return Err(JobDefinitionError::InvalidStepId(step.id().to_string()));
            }
            if !seen.insert(step.id()) {
                return Err(JobDefinitionError::DuplicateStepId(step.id().to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: &str = r#"{"workspace":"W","box":"b","profile":"p","environment":"e","instances":1}"#;

    fn job_with(steps: &[&str]) -> String {
        format!(r#"{{"name":"demo","steps":[{}]}}"#, steps.join(","))
    }

    #[test]
    fn test_parse_generates_distinct_ids() {
        let job = JobDefinition::from_json(&job_with(&[STEP, STEP])).unwrap();
        assert_eq!(job.display_name(), "demo");
        assert_eq!(job.steps.len(), 2);
        assert_ne!(job.steps[0].id(), job.steps[1].id());
    }

    #[test]
    fn test_rejects_foreign_step_ids() {
        let step = r#"{"id":"build-1","workspace":"W","box":"b","profile":"p","environment":"e","instances":1}"#;
        let err = JobDefinition::from_json(&job_with(&[step])).unwrap_err();
        assert!(matches!(err, JobDefinitionError::InvalidStepId(id) if id == "build-1"));
    }

    #[test]
    fn test_rejects_duplicate_step_ids() {
        let step = r#"{"id":"ebox.steps.DeployBox-a","workspace":"W","box":"b","profile":"p","environment":"e","instances":1}"#;
        let err = JobDefinition::from_json(&job_with(&[step, step])).unwrap_err();
        assert!(matches!(err, JobDefinitionError::DuplicateStepId(_)));
    }

    #[test]
    fn test_rejects_empty_and_malformed_jobs() {
        assert!(matches!(
            JobDefinition::from_json(r#"{"steps":[]}"#),
            Err(JobDefinitionError::Empty)
        ));
        assert!(matches!(
            JobDefinition::from_json(r#"{"steps":[{"box":"b"}]}"#),
            Err(JobDefinitionError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file_reports_path() {
        let err = JobDefinition::from_file("/nonexistent/job.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/job.json"));

        let path = std::env::temp_dir().join(format!("ebox-job-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, job_with(&[STEP])).unwrap();
        let job = JobDefinition::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(job.steps.len(), 1);
    }
}
