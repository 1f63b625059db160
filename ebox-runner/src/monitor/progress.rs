//! Deployment progress monitor
//!
//! Submits a deployment and follows it until the platform reports it done or
//! failed, the deadline passes, or the step is cancelled. The deadline is
//! counted from submission. Nothing is retried here: the first failure or
//! timeout is final.

use ebox_client::{ClientError, ElasticBoxApi, resource_id};
use ebox_core::domain::deployment::{DeploymentRequest, DeploymentStatus};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::cancel::CancellationToken;

/// Errors raised while submitting or following a deployment
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Failed to submit deployment: {0}")]
    Submit(#[source] ClientError),

    #[error("Failed to poll deployment {resource_url}: {source}")]
    Poll {
        resource_url: String,
        #[source]
        source: ClientError,
    },

    /// The platform reported the deployment as failed
    #[error("Deployment {resource_url} failed: {message}")]
    Failed {
        resource_url: String,
        message: String,
    },

    /// The deployment did not finish before the deadline
    #[error("{message}")]
    Incomplete {
        resource_url: String,
        message: String,
    },

    #[error("Stopped waiting for deployment {resource_url}: step cancelled")]
    Cancelled { resource_url: String },
}

impl MonitorError {
    /// Whether the deployment ran out of time
    pub fn is_incomplete(&self) -> bool {
        matches!(self, MonitorError::Incomplete { .. })
    }
}

/// A deployment submitted to the platform
///
/// Starts pending and moves to done or failed as polls come in. Once
/// terminal, later polls cannot change it.
#[derive(Debug, Clone)]
pub struct DeploymentHandle {
    resource_url: String,
    submitted_at: Instant,
    status: DeploymentStatus,
    timed_out: bool,
}

impl DeploymentHandle {
    pub fn new(resource_url: impl Into<String>, submitted_at: Instant) -> Self {
        Self {
            resource_url: resource_url.into(),
            submitted_at,
            status: DeploymentStatus::Pending,
            timed_out: false,
        }
    }

    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    /// Id of the instance being deployed
    pub fn instance_id(&self) -> &str {
        resource_id(&self.resource_url)
    }

    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }

    pub fn status(&self) -> &DeploymentStatus {
        &self.status
    }

    fn transition(&mut self, status: DeploymentStatus) {
        if !self.status.is_terminal() {
            self.status = status;
        }
    }

    fn expire(&mut self, message: String) {
        if !self.status.is_terminal() {
            self.status = DeploymentStatus::Failed { message };
            self.timed_out = true;
        }
    }
}

/// Successful end of a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentOutcome {
    pub instance_id: String,
    pub resource_url: String,
}

/// Submits deployments and waits for them
pub struct DeploymentMonitor {
    api: Arc<dyn ElasticBoxApi>,
    poll_interval: Duration,
}

impl DeploymentMonitor {
    /// Creates a new monitor
    ///
    /// # Arguments
    /// * `api` - Client used to deploy and poll
    /// * `poll_interval` - Time between two status polls
    pub fn new(api: Arc<dyn ElasticBoxApi>, poll_interval: Duration) -> Self {
        Self { api, poll_interval }
    }

    /// Submits a deployment without waiting for it
    pub async fn submit(
        &self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentHandle, MonitorError> {
        let submitted_at = Instant::now();
        let submitted = self
            .api
            .deploy(request)
            .await
            .map_err(MonitorError::Submit)?;

        info!(
            "Submitted deployment of profile {} to workspace {}: {}",
            request.profile, request.workspace, submitted.resource_url
        );

        Ok(DeploymentHandle::new(submitted.resource_url, submitted_at))
    }

    /// Polls until the deployment is done, failed, timed out or cancelled
    ///
    /// # Arguments
    /// * `handle` - The deployment to follow, updated in place
    /// * `timeout` - Maximum wait counted from submission
    /// * `cancel` - Stops the wait promptly when cancelled
    pub async fn await_completion(
        &self,
        handle: &mut DeploymentHandle,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<DeploymentOutcome, MonitorError> {
        let deadline = deadline(handle.submitted_at, timeout);

        loop {
            match handle.status() {
                DeploymentStatus::Done => {
                    return Ok(DeploymentOutcome {
                        instance_id: handle.instance_id().to_string(),
                        resource_url: handle.resource_url.clone(),
                    });
                }
                DeploymentStatus::Failed { message } if handle.timed_out => {
                    return Err(MonitorError::Incomplete {
                        resource_url: handle.resource_url.clone(),
                        message: message.clone(),
                    });
                }
                DeploymentStatus::Failed { message } => {
                    return Err(MonitorError::Failed {
                        resource_url: handle.resource_url.clone(),
                        message: message.clone(),
                    });
                }
                DeploymentStatus::Pending => {}
            }

            if cancel.is_cancelled() {
                return Err(self.cancelled(handle));
            }

            if Instant::now() >= deadline {
                handle.expire(format!(
                    "Deployment of instance {} did not finish within {}",
                    handle.instance_id(),
                    describe(timeout)
                ));
                continue;
            }

            // A poll that hangs must not outlive the deadline.
            let polled = tokio::select! {
                _ = cancel.cancelled() => return Err(self.cancelled(handle)),
                _ = time::sleep_until(deadline) => None,
                status = self.api.poll_status(&handle.resource_url) => Some(status),
            };
            let Some(status) = polled else {
                debug!("Poll of {} outlived the deadline", handle.resource_url);
                continue;
            };
            let status = status.map_err(|source| MonitorError::Poll {
                resource_url: handle.resource_url.clone(),
                source,
            })?;

            debug!("Deployment {} is {}", handle.resource_url, status);
            handle.transition(status);
            if handle.status().is_terminal() {
                continue;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                continue;
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(self.cancelled(handle)),
                _ = time::sleep(self.poll_interval.min(remaining)) => {}
            }
        }
    }

    fn cancelled(&self, handle: &DeploymentHandle) -> MonitorError {
        info!("Stopped waiting for deployment {}", handle.resource_url);
        MonitorError::Cancelled {
            resource_url: handle.resource_url.clone(),
        }
    }
}

/// Used when `submitted_at + timeout` is past what `Instant` can hold
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

fn deadline(submitted_at: Instant, timeout: Duration) -> Instant {
    submitted_at
        .checked_add(timeout)
        .or_else(|| submitted_at.checked_add(FAR_FUTURE))
        .unwrap_or(submitted_at)
}

/// "5 minutes", "1 minute", "90 seconds"
fn describe(timeout: Duration) -> String {
    let secs = timeout.as_secs();
    match (secs / 60, secs % 60) {
        (1, 0) => "1 minute".to_string(),
        (minutes, 0) if minutes > 0 => format!("{} minutes", minutes),
        _ => format!("{} seconds", secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    const INTERVAL: Duration = Duration::from_secs(10);

    fn request() -> DeploymentRequest {
        DeploymentRequest::new("profile-1", "W", "staging", 1, vec![]).unwrap()
    }

    fn monitor(api: &Arc<FakeApi>) -> DeploymentMonitor {
        DeploymentMonitor::new(api.clone(), INTERVAL)
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_yields_instance_id() {
        let api = Arc::new(FakeApi::new().with_statuses(vec![
            DeploymentStatus::Pending,
            DeploymentStatus::Pending,
            DeploymentStatus::Done,
        ]));
        let monitor = monitor(&api);

        let mut handle = monitor.submit(&request()).await.unwrap();
        assert_eq!(handle.status(), &DeploymentStatus::Pending);

        let outcome = monitor
            .await_completion(&mut handle, Duration::from_secs(600), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.instance_id, "i-1");
        assert_eq!(outcome.resource_url, "https://eb.example.com/services/instances/i-1");
        assert_eq!(handle.status(), &DeploymentStatus::Done);
        assert_eq!(api.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_failure_carries_message() {
        let api = Arc::new(FakeApi::new().with_statuses(vec![DeploymentStatus::Failed {
            message: "quota exceeded".to_string(),
        }]));
        let monitor = monitor(&api);

        let mut handle = monitor.submit(&request()).await.unwrap();
        let err = monitor
            .await_completion(&mut handle, Duration::from_secs(600), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(&err, MonitorError::Failed { message, .. } if message == "quota exceeded"));
        assert!(!err.is_incomplete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_deadline() {
        let api = Arc::new(FakeApi::new());
        let monitor = monitor(&api);

        let started = Instant::now();
        let mut handle = monitor.submit(&request()).await.unwrap();
        let err = monitor
            .await_completion(&mut handle, Duration::from_secs(60), &CancellationToken::new())
            .await
            .unwrap_err();
        let waited = started.elapsed();

        assert!(err.is_incomplete());
        assert!(err.to_string().contains("did not finish within 1 minute"));
        assert!(waited >= Duration::from_secs(60), "gave up early: {:?}", waited);
        assert!(waited < Duration::from_secs(70), "waited too long: {:?}", waited);
        assert_eq!(api.poll_count(), 6);
        assert!(handle.status().is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_counts_from_submission() {
        let api = Arc::new(FakeApi::new());
        let monitor = monitor(&api);

        let mut handle = monitor.submit(&request()).await.unwrap();
        time::sleep(Duration::from_secs(60)).await;

        let err = monitor
            .await_completion(&mut handle, Duration::from_secs(60), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_incomplete());
        assert_eq!(api.poll_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_handle_is_not_resurrected() {
        let api = Arc::new(FakeApi::new().with_statuses(vec![
            DeploymentStatus::Failed {
                message: "boom".to_string(),
            },
            DeploymentStatus::Done,
        ]));
        let monitor = monitor(&api);
        let cancel = CancellationToken::new();

        let mut handle = monitor.submit(&request()).await.unwrap();
        assert!(monitor
            .await_completion(&mut handle, Duration::from_secs(600), &cancel)
            .await
            .is_err());

        // Waiting again neither polls nor flips the result
        let err = monitor
            .await_completion(&mut handle, Duration::from_secs(600), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::Failed { .. }));
        assert_eq!(api.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_polling_promptly() {
        let api = Arc::new(FakeApi::new());
        let monitor = monitor(&api);
        let cancel = CancellationToken::new();

        let mut handle = monitor.submit(&request()).await.unwrap();

        let trigger = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                time::sleep(Duration::from_secs(15)).await;
                cancel.cancel();
            })
        };

        let started = Instant::now();
        let err = monitor
            .await_completion(&mut handle, Duration::from_secs(3600), &cancel)
            .await
            .unwrap_err();
        trigger.await.unwrap();

        assert!(matches!(err, MonitorError::Cancelled { .. }));
        assert!(!err.is_incomplete());
        assert!(started.elapsed() < Duration::from_secs(20));
        assert_eq!(api.poll_count(), 2);
        assert_eq!(handle.status(), &DeploymentStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_failure_is_final() {
        let api = Arc::new(FakeApi::new().failing_polls());
        let monitor = monitor(&api);

        let mut handle = monitor.submit(&request()).await.unwrap();
        let err = monitor
            .await_completion(&mut handle, Duration::from_secs(600), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, MonitorError::Poll { .. }));
        assert_eq!(api.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_poll_still_times_out() {
        let api = Arc::new(FakeApi::new().hanging_polls());
        let monitor = monitor(&api);

        let started = Instant::now();
        let mut handle = monitor.submit(&request()).await.unwrap();
        let err = time::timeout(
            Duration::from_secs(3 * 3600),
            monitor.await_completion(&mut handle, Duration::from_secs(60), &CancellationToken::new()),
        )
        .await
        .expect("wait must end at the deadline")
        .unwrap_err();
        let waited = started.elapsed();

        assert!(err.is_incomplete());
        assert!(waited >= Duration::from_secs(60), "gave up early: {:?}", waited);
        assert!(waited < Duration::from_secs(61), "waited too long: {:?}", waited);
        assert_eq!(api.poll_count(), 1);
        assert!(handle.status().is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_timeout_does_not_overflow() {
        let api = Arc::new(FakeApi::new().with_statuses(vec![DeploymentStatus::Done]));
        let monitor = monitor(&api);

        let mut handle = monitor.submit(&request()).await.unwrap();
        let outcome = monitor
            .await_completion(
                &mut handle,
                Duration::from_secs(u64::MAX / 60 * 60),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.instance_id, "i-1");
    }

    #[test]
    fn test_deadline_saturates() {
        let now = Instant::now();
        assert_eq!(deadline(now, Duration::from_secs(60)), now + Duration::from_secs(60));
        assert!(deadline(now, Duration::MAX) >= now + FAR_FUTURE);
    }

    #[tokio::test]
    async fn test_submit_failure() {
        let api = Arc::new(FakeApi::new().failing_deploys());
        let err = monitor(&api).submit(&request()).await.unwrap_err();
        assert!(matches!(err, MonitorError::Submit(_)));
    }

    #[test]
    fn test_describe_timeout() {
        assert_eq!(describe(Duration::from_secs(60)), "1 minute");
        assert_eq!(describe(Duration::from_secs(3600)), "60 minutes");
        assert_eq!(describe(Duration::from_secs(90)), "90 seconds");
    }
}
