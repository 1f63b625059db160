//! EBox HTTP Client
//!
//! A small, type-safe HTTP client for the box platform API.
//!
//! The runner and the CLI both talk to the platform through this crate. Code
//! that only needs the calls (and wants to swap in a fake for tests) should
//! depend on the [`ElasticBoxApi`] trait rather than on the concrete client.
//!
//! # Example
//!
//! ```no_run
//! use ebox_client::ElasticBoxClient;
//!
//! #[tokio::main]
//! async fn main() -> ebox_client::Result<()> {
//!     let client = ElasticBoxClient::new("https://elasticbox.example.com").with_token("secret");
//!
//!     let boxes = client.get_all_boxes("my-workspace").await?;
//!     println!("Found {} box(es)", boxes.len());
//!     Ok(())
//! }
//! ```

mod api;
mod boxes;
pub mod error;
mod instances;

// Re-export commonly used types
pub use api::ElasticBoxApi;
pub use error::{ClientError, Result};
pub use instances::SubmittedDeployment;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// API release the requests are written against
pub const API_RELEASE: &str = "4.0";

/// HTTP client for the box platform API
#[derive(Debug, Clone)]
pub struct ElasticBoxClient {
    /// Base URL of the platform (e.g., "https://elasticbox.example.com")
    endpoint_url: String,
    /// Token sent as `ElasticBox-Token`
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl ElasticBoxClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `endpoint_url` - The base URL of the platform
    ///
    /// # Example
    /// ```
    /// use ebox_client::ElasticBoxClient;
    ///
    /// let client = ElasticBoxClient::new("https://elasticbox.example.com/");
    /// assert_eq!(client.endpoint_url(), "https://elasticbox.example.com");
    /// ```
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self::with_client(endpoint_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use ebox_client::ElasticBoxClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ElasticBoxClient::with_client("https://elasticbox.example.com", http_client);
    /// ```
    pub fn with_client(endpoint_url: impl Into<String>, client: Client) -> Self {
        let endpoint_url = endpoint_url.into();
        Self {
            endpoint_url: endpoint_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        }
    }

    /// Authenticate every request with the given token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL of the platform
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Start a request carrying the release and authentication headers
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("ElasticBox-Release", API_RELEASE);

        match &self.token {
            Some(token) => builder.header("ElasticBox-Token", token),
            None => builder,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

// =============================================================================
// URL Helpers
// =============================================================================

/// Id of the resource a platform URL points to (its last path segment)
///
/// # Example
/// ```
/// assert_eq!(
///     ebox_client::resource_id("https://eb.example.com/services/instances/i-abc"),
///     "i-abc"
/// );
/// ```
pub fn resource_id(resource_url: &str) -> &str {
    resource_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(resource_url)
}

/// Web page an operator can open to inspect an instance
pub fn page_url(endpoint_url: &str, resource_url: &str) -> String {
    format!(
        "{}/#/instances/{}",
        endpoint_url.trim_end_matches('/'),
        resource_id(resource_url)
    )
}
