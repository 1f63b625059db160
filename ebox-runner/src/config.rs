//! Runner configuration
//!
//! Defines all configurable parameters for the runner: where the box platform
//! lives, how to authenticate, how often deployments are polled and how long
//! a deploy step may wait.

use std::path::PathBuf;
use std::time::Duration;

/// Default time between two status polls of a deployment
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default time a deploy step waits for its deployment
pub const DEFAULT_DEPLOY_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Runner configuration
///
/// Intervals are configurable so tests and slow platforms can tune them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Box platform base URL (e.g., "https://elasticbox.example.com").
    /// Absent means no platform is configured; deploy steps then fail fast.
    pub endpoint_url: Option<String>,

    /// Token sent with every request
    pub token: Option<String>,

    /// How often a running deployment is polled
    pub poll_interval: Duration,

    /// Maximum time a deploy step waits, counted from submission
    pub deploy_timeout: Duration,

    /// JSON file describing the deploy steps of the job
    pub job_file: PathBuf,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(job_file: impl Into<PathBuf>) -> Self {
        Self {
            endpoint_url: None,
            token: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            deploy_timeout: DEFAULT_DEPLOY_TIMEOUT,
            job_file: job_file.into(),
        }
    }

    /// Sets the platform endpoint
    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - EBOX_JOB_FILE (required)
    /// - EBOX_ENDPOINT_URL (optional)
    /// - EBOX_TOKEN (optional)
    /// - EBOX_POLL_INTERVAL (optional, seconds, default: 10)
    /// - EBOX_DEPLOY_TIMEOUT (optional, minutes, default: 60)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let job_file = lookup("EBOX_JOB_FILE")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("EBOX_JOB_FILE environment variable not set"))?;

        let endpoint_url = lookup("EBOX_ENDPOINT_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let token = lookup("EBOX_TOKEN").filter(|s| !s.is_empty());

        let poll_interval = lookup("EBOX_POLL_INTERVAL")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let deploy_timeout = match lookup("EBOX_DEPLOY_TIMEOUT").and_then(|s| s.parse::<u64>().ok()) {
            Some(minutes) => minutes
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    anyhow::anyhow!("EBOX_DEPLOY_TIMEOUT of {} minutes is too large", minutes)
                })?,
            None => DEFAULT_DEPLOY_TIMEOUT,
        };

        Ok(Self {
            endpoint_url,
            token,
            poll_interval,
            deploy_timeout,
            job_file: PathBuf::from(job_file),
        })
    }

    /// Validates the configuration
    ///
    /// A missing endpoint is allowed here; it is reported by the deploy step.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(url) = &self.endpoint_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("endpoint_url must start with http:// or https://");
            }
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.deploy_timeout.is_zero() {
            anyhow::bail!("deploy_timeout must be greater than 0");
        }

        if self.job_file.as_os_str().is_empty() {
            anyhow::bail!("job_file cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::new("job.json");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.deploy_timeout, Duration::from_secs(3600));
        assert!(config.endpoint_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::new("job.json").with_endpoint("https://eb.example.com");
        assert!(config.validate().is_ok());

        config.endpoint_url = Some("not-a-url".to_string());
        assert!(config.validate().is_err());

        config.endpoint_url = Some("http://localhost:8080".to_string());
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("EBOX_JOB_FILE", "/tmp/job.json"),
            ("EBOX_ENDPOINT_URL", "https://eb.example.com"),
            ("EBOX_TOKEN", "secret"),
            ("EBOX_POLL_INTERVAL", "2"),
            ("EBOX_DEPLOY_TIMEOUT", "5"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint_url.as_deref(), Some("https://eb.example.com"));
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.deploy_timeout, Duration::from_secs(300));
        assert_eq!(config.job_file, PathBuf::from("/tmp/job.json"));
    }

    #[test]
    fn test_from_lookup_blank_endpoint_is_unconfigured() {
        let config = Config::from_lookup(lookup_from(&[
            ("EBOX_JOB_FILE", "job.json"),
            ("EBOX_ENDPOINT_URL", "  "),
            ("EBOX_POLL_INTERVAL", "soon"),
        ]))
        .unwrap();

        assert!(config.endpoint_url.is_none());
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_from_lookup_rejects_overflowing_timeout() {
        let err = Config::from_lookup(lookup_from(&[
            ("EBOX_JOB_FILE", "job.json"),
            ("EBOX_DEPLOY_TIMEOUT", "400000000000000000"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("EBOX_DEPLOY_TIMEOUT"));

        let largest = Config::from_lookup(lookup_from(&[
            ("EBOX_JOB_FILE", "job.json"),
            ("EBOX_DEPLOY_TIMEOUT", &(u64::MAX / 60).to_string()),
        ]))
        .unwrap();
        assert_eq!(largest.deploy_timeout, Duration::from_secs(u64::MAX / 60 * 60));
    }

    #[test]
    fn test_from_lookup_requires_job_file() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
    }
}
