//! Deployment DTOs

use serde::{Deserialize, Serialize};

use crate::domain::binding::VariableBinding;
use crate::domain::boxes::SCHEMA_BASE;
use crate::domain::deployment::DeploymentRequest;

/// Body of `POST /services/instances`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployInstanceRequest {
    pub schema: String,
    /// Workspace that will own the instance
    pub owner: String,
    pub profile: String,
    pub environment: String,
    pub instances: u32,
    pub variables: Vec<VariableBinding>,
}

impl From<&DeploymentRequest> for DeployInstanceRequest {
    fn from(request: &DeploymentRequest) -> Self {
        Self {
            schema: format!("{}deploy-instance-request", SCHEMA_BASE),
            owner: request.workspace.clone(),
            profile: request.profile.clone(),
            environment: request.environment.clone(),
            instances: request.instances,
            variables: request.variables.clone(),
        }
    }
}
