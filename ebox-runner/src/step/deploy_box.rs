//! Deploy box step
//!
//! Resolves the step's variables against earlier steps, submits the
//! deployment and waits for it. On success the instance id is kept so later
//! steps can bind to it. A failed or timed out deployment stops the job; it
//! is never retried here.

use ebox_client::{ElasticBoxApi, ElasticBoxClient, page_url};
use ebox_core::domain::binding::VariableBinding;
use ebox_core::domain::deployment::DeploymentRequest;
use ebox_core::domain::instance::InstanceProvider;
use ebox_core::error::{BindingError, RequestError};
use ebox_core::resolver::{PROVIDER_KEY_PREFIX, resolve_bindings};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::monitor::{DeploymentMonitor, DeploymentOutcome, MonitorError};
use crate::step::StepLog;

/// Kind segment of deploy step ids
pub const STEP_KIND: &str = "DeployBox";

/// Fresh step id, e.g. `ebox.steps.DeployBox-<uuid>`
pub fn generate_step_id() -> String {
    format!("{}{}-{}", PROVIDER_KEY_PREFIX, STEP_KIND, Uuid::new_v4())
}

/// Errors that stop a deploy step
#[derive(Debug, Error)]
pub enum StepError {
    /// No box platform is configured
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Variables(#[from] BindingError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Submit(MonitorError),

    /// The deployment failed or did not finish in time
    #[error("Failed to deploy box instance {tracking_url}: {source}")]
    Incomplete {
        tracking_url: String,
        #[source]
        source: MonitorError,
    },

    #[error("Deployment of box instance {tracking_url} was cancelled")]
    Cancelled { tracking_url: String },
}

/// Everything a deploy step needs from its surroundings
#[derive(Clone)]
pub struct StepContext {
    /// Platform client; `None` when no endpoint is configured
    pub api: Option<Arc<dyn ElasticBoxApi>>,
    pub poll_interval: Duration,
    pub deploy_timeout: Duration,
    pub cancel: CancellationToken,
}

impl StepContext {
    /// Builds the context described by a runner configuration
    pub fn from_config(config: &Config, cancel: CancellationToken) -> Self {
        let api = config.endpoint_url.as_ref().map(|url| {
            let client = ElasticBoxClient::new(url.clone());
            let client = match &config.token {
                Some(token) => client.with_token(token.clone()),
                None => client,
            };
            Arc::new(client) as Arc<dyn ElasticBoxApi>
        });

        Self {
            api,
            poll_interval: config.poll_interval,
            deploy_timeout: config.deploy_timeout,
            cancel,
        }
    }
}

/// Deploys a box profile into an environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployBoxStep {
    #[serde(default = "generate_step_id")]
    id: String,
    workspace: String,
    #[serde(rename = "box")]
    box_id: String,
    profile: String,
    environment: String,
    instances: u32,
    /// Serialized JSON list of variables
    #[serde(default)]
    variables: String,
    #[serde(skip)]
    instance_id: Option<String>,
}

impl DeployBoxStep {
    pub fn new(
        workspace: impl Into<String>,
        box_id: impl Into<String>,
        profile: impl Into<String>,
        environment: impl Into<String>,
        instances: u32,
        variables: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_step_id(),
            workspace: workspace.into(),
            box_id: box_id.into(),
            profile: profile.into(),
            environment: environment.into(),
            instances,
            variables: variables.into(),
            instance_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn box_id(&self) -> &str {
        &self.box_id
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn instances(&self) -> u32 {
        self.instances
    }

    pub fn variables(&self) -> &str {
        &self.variables
    }

    /// Instance deployed by this step, once it has succeeded
    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    /// Runs the step
    ///
    /// # Arguments
    /// * `ctx` - Platform access, timings and cancellation
    /// * `providers` - Completed sibling steps; this step is skipped if listed
    /// * `console` - Receives the step's human-facing output
    pub async fn perform(
        &mut self,
        ctx: &StepContext,
        providers: &[&dyn InstanceProvider],
        console: &mut StepLog,
    ) -> Result<DeploymentOutcome, StepError> {
        let api = ctx.api.as_ref().ok_or_else(|| {
            StepError::Configuration("No box platform endpoint is configured".to_string())
        })?;

        let variables = VariableBinding::parse_list(&self.variables)?;
        let siblings: Vec<&dyn InstanceProvider> = providers
            .iter()
            .copied()
            .filter(|provider| provider.provider_key() != self.id)
            .collect();
        let variables = resolve_bindings(&variables, &siblings);

        let request = DeploymentRequest::new(
            self.profile.as_str(),
            self.workspace.as_str(),
            self.environment.as_str(),
            self.instances,
            variables,
        )?;

        let monitor = DeploymentMonitor::new(Arc::clone(api), ctx.poll_interval);
        let mut handle = monitor.submit(&request).await.map_err(|e| {
            console.error(format!("Failed to deploy box {}: {}", self.box_id, e));
            StepError::Submit(e)
        })?;

        let tracking_url = page_url(api.endpoint_url(), handle.resource_url());
        console.info(format!("Deploying box instance {}", tracking_url));
        console.info(format!(
            "Waiting for the deployment of the box instance {} to finish",
            tracking_url
        ));

        match monitor
            .await_completion(&mut handle, ctx.deploy_timeout, &ctx.cancel)
            .await
        {
            Ok(outcome) => {
                console.info(format!(
                    "The box instance {} has been deployed successfully",
                    tracking_url
                ));
                self.instance_id = Some(outcome.instance_id.clone());
                Ok(outcome)
            }
            Err(MonitorError::Cancelled { .. }) => {
                console.warning(format!(
                    "Stopped waiting for box instance {}, the step was cancelled",
                    tracking_url
                ));
                Err(StepError::Cancelled { tracking_url })
            }
            Err(source) => {
                error!(
                    step = %self.id,
                    "Deployment of box {} did not complete: {}",
                    self.box_id, source
                );
                console.error(format!(
                    "Failed to deploy box instance {}: {}",
                    tracking_url, source
                ));
                Err(StepError::Incomplete {
                    tracking_url,
                    source,
                })
            }
        }
    }
}

impl InstanceProvider for DeployBoxStep {
    fn provider_key(&self) -> &str {
        &self.id
    }

    fn resolved_instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }
}
