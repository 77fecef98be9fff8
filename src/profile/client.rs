//! Profile API client.
//!
//! # Responsibilities
//! - Look up a profile by id (`GET {host}{path}?eth_profile_addr={id}`)
//! - Map the error marker and non-JSON failures to lookup results / errors

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::config::ApiConfig;
use crate::observability::metrics;
use crate::profile::types::{ProfileError, ProfileLookup, ProfileResult};

/// Query parameter carrying the profile id.
pub const PROFILE_ID_PARAM: &str = "eth_profile_addr";

/// HTTP client for the external profile service.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    client: Client,
    profile_url: url::Url,
}

impl ProfileClient {
    pub fn new(config: &ApiConfig) -> ProfileResult<Self> {
        let raw = config.profile_url();
        let profile_url = url::Url::parse(&raw).map_err(|e| ProfileError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            profile_url,
        })
    }

    /// Fetch a profile.
    ///
    /// A body with a truthy `error` member is `NotFound` whatever the status
    /// code. A non-success status without a JSON body is an error.
    pub async fn lookup(&self, profile_id: &str) -> ProfileResult<ProfileLookup> {
        let start = Instant::now();
        let result = self.fetch(profile_id).await;

        let outcome = match &result {
            Ok(ProfileLookup::Found(_)) => "found",
            Ok(ProfileLookup::NotFound) => "not_found",
            Err(_) => "error",
        };
        metrics::record_profile_lookup(outcome, start);
        tracing::debug!(profile_id = %profile_id, outcome, "Profile lookup finished");

        result
    }

    async fn fetch(&self, profile_id: &str) -> ProfileResult<ProfileLookup> {
        let response = self
            .client
            .get(self.profile_url.clone())
            .query(&[(PROFILE_ID_PARAM, profile_id)])
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => ProfileLookup::from_body(body),
            Err(_) if !status.is_success() => Err(ProfileError::Status {
                status: status.as_u16(),
            }),
            Err(e) => Err(ProfileError::Decode(e)),
        }
    }

    pub fn profile_url(&self) -> &url::Url {
        &self.profile_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url() {
        let config = ApiConfig {
            host: "::not a host::".to_string(),
            ..Default::default()
        };
        let err = ProfileClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid profile URL"));
    }

    #[test]
    fn test_url_is_host_plus_path() {
        let config = ApiConfig {
            host: "https://api.sourcecheck.org".to_string(),
            profile_path: "/profile".to_string(),
            timeout_secs: 5,
        };
        let client = ProfileClient::new(&config).unwrap();
        assert_eq!(client.profile_url().as_str(), "https://api.sourcecheck.org/profile");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_error() {
        let config = ApiConfig {
            host: "http://127.0.0.1:1".to_string(),
            profile_path: "/profile".to_string(),
            timeout_secs: 2,
        };
        let client = ProfileClient::new(&config).unwrap();
        let result = client.lookup("0xabc").await;
        assert!(matches!(result, Err(ProfileError::Http(_))));
    }
}
