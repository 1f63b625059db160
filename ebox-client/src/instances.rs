//! Instance-related API endpoints

use crate::ElasticBoxClient;
use crate::error::{ClientError, Result};
use ebox_core::domain::deployment::{DeploymentRequest, DeploymentStatus};
use ebox_core::dto::deployment::DeployInstanceRequest;
use reqwest::Method;
use serde_json::Value as JsonValue;

/// What the platform hands back once a deployment has been accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedDeployment {
    /// URL of the instance being deployed, polled for progress
    pub resource_url: String,
}

impl ElasticBoxClient {
    // =============================================================================
    // Deployments
    // =============================================================================

    /// Ask the platform to deploy a profile
    ///
    /// Returns as soon as the deployment is accepted; the instance keeps
    /// processing on the platform side.
    ///
    /// # Arguments
    /// * `request` - The deployment request, variables already resolved
    pub async fn deploy(&self, request: &DeploymentRequest) -> Result<SubmittedDeployment> {
        request
            .validate()
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        let url = format!("{}/services/instances", self.endpoint_url);
        let response = self
            .request(Method::POST, &url)
            .json(&DeployInstanceRequest::from(request))
            .send()
            .await?;

        let instance: JsonValue = self.handle_response(response).await?;
        let resource_url = instance_url(&self.endpoint_url, &instance).ok_or_else(|| {
            ClientError::MissingResourceUrl {
                profile: request.profile.clone(),
            }
        })?;

        Ok(SubmittedDeployment { resource_url })
    }

    /// Fetch the raw instance record behind a resource URL
    pub async fn get_instance(&self, resource_url: &str) -> Result<JsonValue> {
        let response = self.request(Method::GET, resource_url).send().await?;

        match self.handle_response(response).await {
            Err(e) if e.is_not_found() => Err(ClientError::InstanceNotFound {
                resource_url: resource_url.to_string(),
            }),
            other => other,
        }
    }

    /// Poll the current status of a deployment
    pub async fn poll_status(&self, resource_url: &str) -> Result<DeploymentStatus> {
        let instance = self.get_instance(resource_url).await?;

        DeploymentStatus::from_instance(&instance).map_err(|source| ClientError::InvalidInstance {
            resource_url: resource_url.to_string(),
            source,
        })
    }

    /// Resource URL of an instance given only its id
    pub fn instance_url(&self, instance_id: &str) -> String {
        format!("{}/services/instances/{}", self.endpoint_url, instance_id)
    }
}

/// `uri` may be absolute or relative to the endpoint; `id` is the fallback.
fn instance_url(endpoint_url: &str, instance: &JsonValue) -> Option<String> {
    if let Some(uri) = instance.get("uri").and_then(JsonValue::as_str) {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Some(uri.to_string());
        }
        if !uri.is_empty() {
            return Some(format!("{}/{}", endpoint_url, uri.trim_start_matches('/')));
        }
    }

    instance
        .get("id")
        .and_then(JsonValue::as_str)
        .filter(|id| !id.is_empty())
        .map(|id| format!("{}/services/instances/{}", endpoint_url, id))
}
