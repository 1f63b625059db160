//! Configuration module
//!
//! Handles CLI configuration: where the platform lives and how to reach it.

use anyhow::{Result, anyhow};
use ebox_client::ElasticBoxClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the box platform; only commands that talk to it need one
    pub endpoint_url: Option<String>,

    /// Token sent with every request
    pub token: Option<String>,
}

impl Config {
    /// Client for the configured platform
    pub fn client(&self) -> Result<ElasticBoxClient> {
        let endpoint_url = self
            .endpoint_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("No endpoint configured, pass --endpoint-url or set EBOX_ENDPOINT_URL"))?;

        let client = ElasticBoxClient::new(endpoint_url);
        Ok(match &self.token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        })
    }
}
