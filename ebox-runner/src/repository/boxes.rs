//! Box repository
//!
//! Serves the box buckets used when configuring deploy steps:
//! - Boxes that are not policies
//! - Boxes that are neither policies nor applications
//! - CloudFormation policy boxes
//! - Every other policy box
//!
//! Every call fetches a fresh collection; nothing is cached.

use async_trait::async_trait;
use ebox_client::{ClientError, ElasticBoxApi};
use ebox_core::criteria::{
    BoxCriteria, CloudFormationPolicyBoxes, NoPolicyAndNoApplicationBoxes, NoPolicyBoxes,
    NonCloudFormationPolicyBoxes,
};
use ebox_core::domain::boxes::{BoxDescriptor, PolicyBox};
use ebox_core::error::ModelConversionError;
use ebox_core::factory::{BoxFactory, GenericBoxFactory};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Errors reported by a box repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Error retrieving {bucket} boxes from API, workspace: {workspace}: {source}")]
    Fetch {
        bucket: &'static str,
        workspace: String,
        #[source]
        source: ClientError,
    },

    #[error("Error converting {bucket} boxes from JSON, workspace: {workspace}: {source}")]
    Conversion {
        bucket: &'static str,
        workspace: String,
        #[source]
        source: ModelConversionError,
    },

    #[error("Error retrieving box {box_id} from API: {source}")]
    BoxFetch {
        box_id: String,
        #[source]
        source: ClientError,
    },

    #[error("Error converting box {box_id} from JSON: {source}")]
    BoxConversion {
        box_id: String,
        #[source]
        source: ModelConversionError,
    },
}

/// Repository trait for box lookups
#[async_trait]
pub trait BoxRepository: Send + Sync {
    /// Boxes of a workspace that are not policy boxes
    async fn get_no_policy_boxes(&self, workspace: &str)
    -> Result<Vec<BoxDescriptor>, RepositoryError>;

    /// Boxes of a workspace that are neither policy nor application boxes
    async fn get_no_policy_and_no_application_boxes(
        &self,
        workspace: &str,
    ) -> Result<Vec<BoxDescriptor>, RepositoryError>;

    /// Policy boxes of a workspace backed by a CloudFormation template
    async fn get_cloud_formation_policy_boxes(
        &self,
        workspace: &str,
    ) -> Result<Vec<PolicyBox>, RepositoryError>;

    /// Policy boxes of a workspace not backed by a CloudFormation template
    async fn get_no_cloud_formation_policy_boxes(
        &self,
        workspace: &str,
    ) -> Result<Vec<PolicyBox>, RepositoryError>;

    /// A single box
    async fn get_box(&self, box_id: &str) -> Result<BoxDescriptor, RepositoryError>;
}

/// Repository backed by the box platform API
pub struct ApiBoxRepository {
    api: Arc<dyn ElasticBoxApi>,
}

impl ApiBoxRepository {
    /// Creates a new API box repository
    ///
    /// # Arguments
    /// * `api` - Client used to fetch raw box records
    pub fn new(api: Arc<dyn ElasticBoxApi>) -> Self {
        Self { api }
    }

    async fn fetch_bucket<C>(
        &self,
        workspace: &str,
        bucket: &'static str,
        criteria: C,
    ) -> Result<Vec<C::Output>, RepositoryError>
    where
        C: BoxCriteria + Send,
        C::Output: Send,
    {
        let records = self.api.get_all_boxes(workspace).await.map_err(|source| {
            error!(
                "Error retrieving {} boxes from API, workspace {}: {}",
                bucket, workspace, source
            );
            RepositoryError::Fetch {
                bucket,
                workspace: workspace.to_string(),
                source,
            }
        })?;

        let selected = criteria.select(&records).map_err(|source| {
            error!(
                "Error converting {} boxes from JSON, workspace {}: {}",
                bucket, workspace, source
            );
            RepositoryError::Conversion {
                bucket,
                workspace: workspace.to_string(),
                source,
            }
        })?;

        debug!(
            "Selected {} of {} box(es) as {} in workspace {}",
            selected.len(),
            records.len(),
            bucket,
            workspace
        );

        Ok(selected)
    }
}

#[async_trait]
impl BoxRepository for ApiBoxRepository {
    async fn get_no_policy_boxes(
        &self,
        workspace: &str,
    ) -> Result<Vec<BoxDescriptor>, RepositoryError> {
        self.fetch_bucket(workspace, "no policy", NoPolicyBoxes).await
    }

    async fn get_no_policy_and_no_application_boxes(
        &self,
        workspace: &str,
    ) -> Result<Vec<BoxDescriptor>, RepositoryError> {
        self.fetch_bucket(
            workspace,
            "no policy and no application",
            NoPolicyAndNoApplicationBoxes,
        )
        .await
    }

    async fn get_cloud_formation_policy_boxes(
        &self,
        workspace: &str,
    ) -> Result<Vec<PolicyBox>, RepositoryError> {
        self.fetch_bucket(workspace, "cloudformation policy", CloudFormationPolicyBoxes)
            .await
    }

    async fn get_no_cloud_formation_policy_boxes(
        &self,
        workspace: &str,
    ) -> Result<Vec<PolicyBox>, RepositoryError> {
        self.fetch_bucket(
            workspace,
            "no cloudformation policy",
            NonCloudFormationPolicyBoxes,
        )
        .await
    }

    async fn get_box(&self, box_id: &str) -> Result<BoxDescriptor, RepositoryError> {
        let record = self.api.get_box(box_id).await.map_err(|source| {
            error!("Error retrieving box {} from API: {}", box_id, source);
            RepositoryError::BoxFetch {
                box_id: box_id.to_string(),
                source,
            }
        })?;

        GenericBoxFactory.create(&record).map_err(|source| {
            error!("Error converting box {} from JSON: {}", box_id, source);
            RepositoryError::BoxConversion {
                box_id: box_id.to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use ebox_core::domain::boxes::BoxKind;
    use serde_json::json;

    fn repository(api: FakeApi) -> ApiBoxRepository {
        ApiBoxRepository::new(Arc::new(api))
    }

    fn sample() -> FakeApi {
        FakeApi::new().with_boxes(vec![
            json!({"id": "box-0", "kind": "policy", "template": "cloudformation"}),
            json!({"id": "box-1", "kind": "script"}),
            json!({"id": "box-2", "kind": "policy", "template": "other"}),
        ])
    }

    fn ids<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        items.into_iter().collect()
    }

    #[tokio::test]
    async fn test_buckets_for_workspace() {
        let repository = repository(sample());

        let cf = repository.get_cloud_formation_policy_boxes("W").await.unwrap();
        let other = repository.get_no_cloud_formation_policy_boxes("W").await.unwrap();
        let no_policy = repository.get_no_policy_boxes("W").await.unwrap();

        assert_eq!(ids(cf.iter().map(|b| b.id.as_str())), ["box-0"]);
        assert_eq!(ids(other.iter().map(|b| b.id.as_str())), ["box-2"]);
        assert_eq!(ids(no_policy.iter().map(|b| b.id())), ["box-1"]);
    }

    #[tokio::test]
    async fn test_no_application_bucket() {
        let repository = repository(FakeApi::new().with_boxes(vec![
            json!({"id": "app", "kind": "application"}),
            json!({"id": "script", "kind": "script"}),
        ]));

        let boxes = repository
            .get_no_policy_and_no_application_boxes("W")
            .await
            .unwrap();
        assert_eq!(ids(boxes.iter().map(|b| b.id())), ["script"]);
    }

    #[tokio::test]
    async fn test_each_call_fetches_fresh_collection() {
        let api = Arc::new(sample());
        let repository = ApiBoxRepository::new(api.clone());

        repository.get_no_policy_boxes("W").await.unwrap();
        repository.get_cloud_formation_policy_boxes("W").await.unwrap();

        assert_eq!(api.box_list_calls(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_names_workspace() {
        let repository = repository(FakeApi::new().failing_boxes());

        let err = repository.get_no_policy_boxes("team-42").await.unwrap_err();
        match &err {
            RepositoryError::Fetch { workspace, source, .. } => {
                assert_eq!(workspace, "team-42");
                assert!(source.is_server_error());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("team-42"));
    }

    #[tokio::test]
    async fn test_malformed_record_fails_only_affected_bucket() {
        let repository = repository(FakeApi::new().with_boxes(vec![
            json!({"id": "ok", "kind": "script"}),
            json!({"id": "broken", "kind": "policy"}),
        ]));

        let err = repository
            .get_cloud_formation_policy_boxes("W")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conversion { .. }));

        let boxes = repository.get_no_policy_boxes("W").await.unwrap();
        assert_eq!(boxes.len(), 1);
    }

    #[tokio::test]
    async fn test_get_box() {
        let repository = repository(FakeApi::new().with_box(json!({
            "id": "box-7",
            "name": "Web",
            "schema": "http://elasticbox.net/schemas/boxes/docker"
        })));

        let descriptor = repository.get_box("box-7").await.unwrap();
        assert_eq!(descriptor.id(), "box-7");
        assert_eq!(descriptor.name(), Some("Web"));
        assert_eq!(descriptor.kind(), BoxKind::Other("docker".to_string()));
    }

    #[tokio::test]
    async fn test_get_box_errors_carry_box_id() {
        let missing = repository(FakeApi::new());
        let err = missing.get_box("box-404").await.unwrap_err();
        assert!(matches!(&err, RepositoryError::BoxFetch { box_id, .. } if box_id == "box-404"));

        let malformed = repository(FakeApi::new().with_box(json!({"id": "box-8", "kind": "policy"})));
        let err = malformed.get_box("box-8").await.unwrap_err();
        assert!(matches!(&err, RepositoryError::BoxConversion { box_id, .. } if box_id == "box-8"));
    }
}
