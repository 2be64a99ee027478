//! openFEMA REST client

use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::models::DEFAULT_BASE_URL;

const USER_AGENT: &str = concat!("openfema/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the openFEMA API
#[derive(Debug, Clone)]
pub struct OpenFemaClient {
    http_client: Client,
    base_url: String,
}

impl OpenFemaClient {
    /// Create a client for the public openFEMA API
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_BASE_URL, None)
    }

    /// Create a client against another API root, optionally with a custom user agent
    pub fn with_options(base_url: impl Into<String>, user_agent: Option<&str>) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(user_agent.unwrap_or(USER_AGENT))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Get the API root this client resolves dataset endpoints against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request and parse the body as JSON.
    ///
    /// Any non-success status is an error; nothing is retried.
    pub async fn get_response(&self, url: &str) -> Result<JsonValue> {
        tracing::debug!(url, "GET");

        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), url, "request failed");
            return Err(Error::Http {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let body = response.text().await?;
        let json: JsonValue = serde_json::from_str(&body)?;
        Ok(json)
    }
}
