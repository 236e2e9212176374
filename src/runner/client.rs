//! Runner Client
//!
//! HTTP client for the monolith's runner endpoints. No retry logic lives
//! here: failures surface to the caller, and the next scheduler tick or user
//! action is the retry.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

use crate::config::RunnerConfig;
use crate::error::{Result, SessionError};
use crate::session::SessionWindow;

use super::types::{DevServerLink, ExtendSessionRequest, RunnerSessionInfo, API_VERSION};

/// Request timeout applied to every backend call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout applied to every backend call
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Operations the session core needs from the backend
#[async_trait]
pub trait RunnerApi: Send + Sync {
    /// Fetch the current session window. Backend timestamps are the truth;
    /// callers replace, never merge, their local copy.
    async fn fetch_session(&self) -> Result<SessionWindow>;

    /// Ask the backend for `minutes` more. The returned window is recomputed
    /// server-side and may differ from a local `end + minutes` guess.
    async fn extend_session(&self, minutes: u32) -> Result<SessionWindow>;

    /// Resolve the public URL fronting a dev server port on this runner.
    async fn dev_server(&self, port: u16) -> Result<DevServerLink>;
}

/// reqwest-backed client for the monolith
pub struct RunnerClient {
    http: Client,
    base: Url,
    runner_id: u64,
    auth_token: String,
    max_duration_secs: i64,
}

impl RunnerClient {
    /// Build a client from the loaded configuration.
    pub fn from_config(config: &RunnerConfig) -> Result<Self> {
        let base = Url::parse(&config.monolith_url)?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| {
                SessionError::RemoteUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base,
            runner_id: config.runner_id,
            auth_token: config.runner_auth.clone(),
            max_duration_secs: config.max_session_time,
        })
    }

    /// Endpoint under `/api/{version}/runners/{id}`.
    fn runner_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/{}/runners/{}{}",
            self.base.as_str().trim_end_matches('/'),
            API_VERSION,
            self.runner_id,
            suffix
        )
    }

    /// Attach both auth headers the monolith expects. They carry the same
    /// token; the backend checks different ones per endpoint.
    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Auth-Token", &self.auth_token)
            .header("Runner-Token", &self.auth_token)
    }

    /// Map a non-success response to `RemoteRejected` with the body attached.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SessionError::RemoteRejected {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn window_from(&self, response: Response) -> Result<SessionWindow> {
        let info: RunnerSessionInfo = Self::check_status(response).await?.json().await?;
        Ok(info.into_window(self.max_duration_secs))
    }
}

impl std::fmt::Debug for RunnerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Skip the auth token
        f.debug_struct("RunnerClient")
            .field("base", &self.base.as_str())
            .field("runner_id", &self.runner_id)
            .finish()
    }
}

#[async_trait]
impl RunnerApi for RunnerClient {
    async fn fetch_session(&self) -> Result<SessionWindow> {
        let url = self.runner_url("");
        debug!("Fetching runner session info: {}", url);

        let response = self.authed(self.http.get(&url)).send().await?;
        self.window_from(response).await
    }

    async fn extend_session(&self, minutes: u32) -> Result<SessionWindow> {
        let url = self.runner_url("/extend_session");
        debug!("Requesting {} extra minutes: {}", minutes, url);

        let body = ExtendSessionRequest {
            runner_id: self.runner_id,
            extra_time_minutes: minutes,
        };
        let response = self.authed(self.http.put(&url)).json(&body).send().await?;
        self.window_from(response).await
    }

    async fn dev_server(&self, port: u16) -> Result<DevServerLink> {
        let url = format!("{}?port={}", self.runner_url("/devserver"), port);
        debug!("Resolving dev server URL: {}", url);

        let response = self.authed(self.http.get(&url)).send().await?;
        let link: DevServerLink = Self::check_status(response).await?.json().await?;
        // Reject garbage before a surface tries to open it
        Url::parse(&link.destination_url)?;
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunnerConfig {
        RunnerConfig {
            monolith_url: "https://app.revature.com".to_string(),
            runner_id: 4182,
            runner_auth: "tok-secret".to_string(),
            max_session_time: 28800,
            expiry_notification_minutes: 10,
            add_time_minutes: 30,
            ..Default::default()
        }
    }

    #[test]
    fn test_runner_urls() {
        let client = RunnerClient::from_config(&config()).unwrap();

        assert_eq!(
            client.runner_url(""),
            "https://app.revature.com/api/v1/runners/4182"
        );
        assert_eq!(
            client.runner_url("/extend_session"),
            "https://app.revature.com/api/v1/runners/4182/extend_session"
        );
    }

    #[test]
    fn test_trailing_slash_base_url() {
        let mut cfg = config();
        cfg.monolith_url = "https://app.revature.com/".to_string();
        let client = RunnerClient::from_config(&cfg).unwrap();

        assert_eq!(
            client.runner_url(""),
            "https://app.revature.com/api/v1/runners/4182"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut cfg = config();
        cfg.monolith_url = "://nope".to_string();
        assert!(RunnerClient::from_config(&cfg).is_err());
    }

    #[test]
    fn test_debug_hides_auth_token() {
        let client = RunnerClient::from_config(&config()).unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("tok-secret"));
    }
}
