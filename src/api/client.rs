//! balena API client implementation

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{API_VERSION, REQUEST_TIMEOUT_SECS};
use crate::fleet::error::FetchError;
use crate::fleet::fetch::{DeviceFilter, DeviceSource};
use crate::fleet::types::DeviceRecord;

/// OData collection envelope
#[derive(Debug, Deserialize)]
struct ODataResponse<T> {
    d: Vec<T>,
}

/// Authenticated client for the fleet API
pub struct FleetApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl FleetApi {
    /// Creates a new FleetApi for `base_url` using `auth_token` as bearer token
    pub fn new(base_url: &str, auth_token: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("fleetscore")
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn device_url(&self, filter: &DeviceFilter) -> Result<Url, FetchError> {
        Url::parse_with_params(
            &format!("{}/{}/device", self.base_url, API_VERSION),
            &[
                ("$select", filter.odata_select()),
                ("$filter", filter.odata_filter()),
            ],
        )
        .map_err(|e| FetchError::InvalidResponse(format!("Invalid API endpoint: {}", e)))
    }

    /// Exchanges the current token for a fresh one
    pub async fn refresh_token(&self) -> Result<String, FetchError> {
        let url = format!("{}/user/v1/refresh-token", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }

        if status != reqwest::StatusCode::OK {
            warn!("Token refresh returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.text().await?;
        let token = body.trim().trim_matches('"').to_string();

        if token.is_empty() {
            return Err(FetchError::InvalidResponse(
                "Empty token in refresh response".to_string(),
            ));
        }

        Ok(token)
    }
}

#[async_trait::async_trait]
impl DeviceSource for FleetApi {
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<DeviceRecord>, FetchError> {
        let url = self.device_url(filter)?;
        debug!("Listing devices: {}", url);

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }

        if !status.is_success() {
            warn!("Fleet API returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let devices: ODataResponse<DeviceRecord> = response.json().await.map_err(|e| {
            warn!("Failed to parse device list response: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        Ok(devices.d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::{Matcher, Server};

    fn filter() -> DeviceFilter {
        DeviceFilter::recently_connected(&Utc.with_ymd_and_hms(2024, 3, 29, 15, 42, 7).unwrap())
    }

    fn device_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "$select".into(),
                "supervisor_version,os_version".into(),
            ),
            Matcher::UrlEncoded(
                "$filter".into(),
                "(is_connected_to_vpn eq true) or (last_vpn_event ge '2024-03-01T00:00:00.000Z')"
                    .into(),
            ),
        ])
    }

    #[tokio::test]
    async fn list_devices_sends_filter_and_token() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/v6/device")
            .match_query(device_query())
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "d": [
                        { "supervisor_version": "10.0.0", "os_version": "balenaOS 2.0.0" },
                        { "supervisor_version": null, "os_version": null }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let api = FleetApi::new(&server.url(), "secret");
        let result = api.list_devices(&filter()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            vec![
                DeviceRecord::new(Some("balenaOS 2.0.0"), Some("10.0.0")),
                DeviceRecord::new(None, None),
            ]
        );
    }

    #[tokio::test]
    async fn list_devices_returns_unauthorized_for_rejected_token() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/v6/device")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let api = FleetApi::new(&server.url(), "expired");
        let result = api.list_devices(&filter()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::Unauthorized)));
    }

    #[tokio::test]
    async fn list_devices_returns_invalid_response_for_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/v6/device")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let api = FleetApi::new(&server.url(), "secret");
        let result = api.list_devices(&filter()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn list_devices_returns_invalid_response_for_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/v6/device")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let api = FleetApi::new(&server.url(), "secret");
        let result = api.list_devices(&filter()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn refresh_token_returns_trimmed_token() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/user/v1/refresh-token")
            .match_header("authorization", "Bearer old-token")
            .with_status(200)
            .with_body("new-token\n")
            .create_async()
            .await;

        let api = FleetApi::new(&server.url(), "old-token");
        let token = api.refresh_token().await.unwrap();

        mock.assert_async().await;
        assert_eq!(token, "new-token");
    }

    #[tokio::test]
    async fn refresh_token_rejects_non_ok_status() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/user/v1/refresh-token")
            .with_status(204)
            .create_async()
            .await;

        let api = FleetApi::new(&server.url(), "old-token");
        let result = api.refresh_token().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }

    #[test]
    fn new_strips_trailing_slash_from_base_url() {
        let api = FleetApi::new("https://api.example.com/", "token");

        assert_eq!(api.base_url(), "https://api.example.com");
    }
}
