//! API trait
//!
//! The calls the runner layers need from the platform, behind a trait so
//! repositories and monitors can be exercised against fakes.

use async_trait::async_trait;
use ebox_core::domain::deployment::{DeploymentRequest, DeploymentStatus};
use serde_json::Value as JsonValue;

use crate::ElasticBoxClient;
use crate::error::Result;
use crate::instances::SubmittedDeployment;

/// Box platform operations used by the repository and the deploy monitor
#[async_trait]
pub trait ElasticBoxApi: Send + Sync {
    /// Base URL of the platform, used to build tracking URLs
    fn endpoint_url(&self) -> &str;

    /// Raw records of every box in a workspace
    async fn get_all_boxes(&self, workspace: &str) -> Result<Vec<JsonValue>>;

    /// Raw record of a single box
    async fn get_box(&self, box_id: &str) -> Result<JsonValue>;

    /// Submits a deployment and returns without waiting for it
    async fn deploy(&self, request: &DeploymentRequest) -> Result<SubmittedDeployment>;

    /// Current status of a submitted deployment
    async fn poll_status(&self, resource_url: &str) -> Result<DeploymentStatus>;
}

#[async_trait]
impl ElasticBoxApi for ElasticBoxClient {
    fn endpoint_url(&self) -> &str {
        ElasticBoxClient::endpoint_url(self)
    }

    async fn get_all_boxes(&self, workspace: &str) -> Result<Vec<JsonValue>> {
        ElasticBoxClient::get_all_boxes(self, workspace).await
    }

    async fn get_box(&self, box_id: &str) -> Result<JsonValue> {
        ElasticBoxClient::get_box(self, box_id).await
    }

    async fn deploy(&self, request: &DeploymentRequest) -> Result<SubmittedDeployment> {
        ElasticBoxClient::deploy(self, request).await
    }

    async fn poll_status(&self, resource_url: &str) -> Result<DeploymentStatus> {
        ElasticBoxClient::poll_status(self, resource_url).await
    }
}
