//! Deployment domain types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::binding::VariableBinding;
use crate::error::{ModelConversionError, RequestError};

/// Everything needed to ask the platform for a deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    pub profile: String,
    pub workspace: String,
    pub environment: String,
    pub instances: u32,
    pub variables: Vec<VariableBinding>,
}

impl DeploymentRequest {
    pub fn new(
        profile: impl Into<String>,
        workspace: impl Into<String>,
        environment: impl Into<String>,
        instances: u32,
        variables: Vec<VariableBinding>,
    ) -> Result<Self, RequestError> {
        let request = Self {
            profile: profile.into(),
            workspace: workspace.into(),
            environment: environment.into(),
            instances,
            variables,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.profile.trim().is_empty() {
            return Err(RequestError::MissingField("profile"));
        }
        if self.workspace.trim().is_empty() {
            return Err(RequestError::MissingField("workspace"));
        }
        if self.environment.trim().is_empty() {
            return Err(RequestError::MissingField("environment"));
        }
        if self.instances < 1 {
            return Err(RequestError::InvalidInstanceCount(self.instances));
        }
        Ok(())
    }
}

/// Status of a deployment as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentStatus {
    Pending,
    Done,
    Failed { message: String },
}

impl DeploymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeploymentStatus::Pending)
    }

    /// Reads the status out of an instance record
    ///
    /// `done` and `unavailable` are terminal. Every other state, including
    /// ones this crate does not know, is still in progress.
    pub fn from_instance(instance: &JsonValue) -> Result<Self, ModelConversionError> {
        let id = instance
            .get("id")
            .and_then(JsonValue::as_str)
            .unwrap_or("<unknown>")
            .to_string();

        let state = match instance.get("state") {
            Some(JsonValue::String(state)) => state,
            Some(_) => {
                return Err(ModelConversionError::MalformedField {
                    id,
                    field: "state",
                    reason: "expected a string".to_string(),
                });
            }
            None => return Err(ModelConversionError::MissingField { id, field: "state" }),
        };

        let status = match state.as_str() {
            "done" => DeploymentStatus::Done,
            "unavailable" => DeploymentStatus::Failed {
                message: instance
                    .get("status_message")
                    .and_then(JsonValue::as_str)
                    .filter(|message| !message.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Instance {} is unavailable", id)),
            },
            _ => DeploymentStatus::Pending,
        };

        Ok(status)
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentStatus::Pending => write!(f, "Pending"),
            DeploymentStatus::Done => write!(f, "Done"),
            DeploymentStatus::Failed { message } => write!(f, "Failed: {}", message),
        }
    }
}
