//! Box-related API endpoints

use crate::ElasticBoxClient;
use crate::error::{ClientError, Result};
use reqwest::Method;
use serde_json::Value as JsonValue;

impl ElasticBoxClient {
    // =============================================================================
    // Boxes
    // =============================================================================

    /// List every box visible in a workspace
    ///
    /// Records are returned raw; classification happens in `ebox-core`.
    ///
    /// # Arguments
    /// * `workspace` - The workspace id
    pub async fn get_all_boxes(&self, workspace: &str) -> Result<Vec<JsonValue>> {
        if workspace.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "workspace id cannot be empty".to_string(),
            ));
        }

        let url = format!(
            "{}/services/workspaces/{}/boxes",
            self.endpoint_url, workspace
        );
        let response = self.request(Method::GET, &url).send().await?;

        self.handle_response(response).await
    }

    /// Get a single box record
    ///
    /// # Arguments
    /// * `box_id` - The box id
    pub async fn get_box(&self, box_id: &str) -> Result<JsonValue> {
        if box_id.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "box id cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/services/boxes/{}", self.endpoint_url, box_id);
        let response = self.request(Method::GET, &url).send().await?;

        match self.handle_response(response).await {
            Err(e) if e.is_not_found() => Err(ClientError::NotFound(format!("box {}", box_id))),
            other => other,
        }
    }
}
