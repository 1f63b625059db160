//! In-memory stand-in for the box platform used by unit tests

use async_trait::async_trait;
use ebox_client::{ClientError, ElasticBoxApi, Result, SubmittedDeployment};
use ebox_core::domain::deployment::{DeploymentRequest, DeploymentStatus};
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ENDPOINT: &str = "https://eb.example.com";

/// Fake platform
///
/// Statuses are served in order; the last one keeps being served. With no
/// statuses the deployment stays pending forever.
#[derive(Default)]
pub struct FakeApi {
    boxes: Vec<JsonValue>,
    box_record: Option<JsonValue>,
    statuses: Mutex<VecDeque<DeploymentStatus>>,
    fail_boxes: bool,
    fail_deploys: bool,
    fail_polls: bool,
    hang_polls: bool,
    box_list_calls: AtomicUsize,
    polls: AtomicUsize,
    deploys: Mutex<Vec<DeploymentRequest>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boxes(mut self, boxes: Vec<JsonValue>) -> Self {
        self.boxes = boxes;
        self
    }

    pub fn with_box(mut self, record: JsonValue) -> Self {
        self.box_record = Some(record);
        self
    }

    pub fn with_statuses(self, statuses: Vec<DeploymentStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn failing_boxes(mut self) -> Self {
        self.fail_boxes = true;
        self
    }

    pub fn failing_deploys(mut self) -> Self {
        self.fail_deploys = true;
        self
    }

    pub fn failing_polls(mut self) -> Self {
        self.fail_polls = true;
        self
    }

    /// Polls never answer
    pub fn hanging_polls(mut self) -> Self {
        self.hang_polls = true;
        self
    }

    pub fn box_list_calls(&self) -> usize {
        self.box_list_calls.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in order
    pub fn deploys(&self) -> Vec<DeploymentRequest> {
        self.deploys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ElasticBoxApi for FakeApi {
    fn endpoint_url(&self) -> &str {
        ENDPOINT
    }

    async fn get_all_boxes(&self, _workspace: &str) -> Result<Vec<JsonValue>> {
        self.box_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_boxes {
            return Err(ClientError::api_error(500, "boom"));
        }
        Ok(self.boxes.clone())
    }

    async fn get_box(&self, box_id: &str) -> Result<JsonValue> {
        self.box_record
            .clone()
            .ok_or_else(|| ClientError::NotFound(format!("box {}", box_id)))
    }

    async fn deploy(&self, request: &DeploymentRequest) -> Result<SubmittedDeployment> {
        if self.fail_deploys {
            return Err(ClientError::api_error(400, "invalid profile"));
        }
        let mut deploys = self.deploys.lock().unwrap();
        deploys.push(request.clone());
        Ok(SubmittedDeployment {
            resource_url: format!("{}/services/instances/i-{}", ENDPOINT, deploys.len()),
        })
    }

    async fn poll_status(&self, _resource_url: &str) -> Result<DeploymentStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.fail_polls {
            return Err(ClientError::api_error(502, "bad gateway"));
        }
        if self.hang_polls {
            std::future::pending::<()>().await;
        }
        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        Ok(status.unwrap_or(DeploymentStatus::Pending))
    }
}
