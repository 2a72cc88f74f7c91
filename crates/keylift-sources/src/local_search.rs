use async_trait::async_trait;
use keylift_core::{KeyliftError, ListingCountSource, ListingSearchSettings, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

/// Client for the local listing search API. Only the total match count is
/// consumed; it is the "how many competitors surface for this query"
/// signal of the competition analyzer.
pub struct LocalSearchClient {
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    client: Client,
}

impl LocalSearchClient {
    pub fn new(settings: &ListingSearchSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| KeyliftError::Source(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            client,
        })
    }
}

#[async_trait]
impl ListingCountSource for LocalSearchClient {
    async fn listing_count(&self, keyword: &str) -> Result<u64> {
        let (client_id, client_secret) = match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => (id, secret),
            _ => {
                return Err(KeyliftError::Source(
                    "local search credentials not configured".into(),
                ))
            }
        };

        let response = self
            .client
            .get(&self.base_url)
            .header("X-Client-Id", client_id.as_str())
            .header("X-Client-Secret", client_secret.expose_secret())
            .query(&[("query", keyword), ("display", "1")])
            .send()
            .await
            .map_err(|e| KeyliftError::Source(format!("local search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyliftError::Source(format!(
                "local search request returned {}",
                status
            )));
        }

        let body: LocalSearchResponse = response
            .json()
            .await
            .map_err(|e| KeyliftError::Source(format!("malformed local search body: {}", e)))?;

        Ok(body.total)
    }

    fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct LocalSearchResponse {
    #[serde(default)]
    total: u64,
}
