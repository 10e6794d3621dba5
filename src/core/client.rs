use crate::core::response::ResponseInterpreter;
use crate::core::until_cancelled;
use crate::domain::model::{LoginRequest, LoginResult, LogoutRequest, PortalEndpoint};
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Talks to the portal's XML endpoints.
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Client,
    endpoint: PortalEndpoint,
    timeout: Duration,
}

impl PortalClient {
    pub fn new(client: Client, endpoint: PortalEndpoint, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    /// POSTs the login form and returns the raw body. Non-2xx statuses are not
    /// errors here: the portal replies with XML under its own conventions.
    pub async fn submit(&self, request: &LoginRequest, cancel: &CancellationToken) -> Result<String> {
        let url = self.endpoint.login_url();
        until_cancelled(cancel, self.post_form(&url, &request.form_fields())).await?
    }

    /// Ends the session for `request.username`. Any well-formed reply counts
    /// as delivered; the caller decides what to make of its status.
    pub async fn logout(
        &self,
        request: &LogoutRequest,
        cancel: &CancellationToken,
    ) -> Result<LoginResult> {
        let url = self.endpoint.logout_url();
        let body = until_cancelled(cancel, self.post_form(&url, &request.form_fields())).await??;
        ResponseInterpreter::parse(&body)
    }

    async fn post_form(&self, url: &str, fields: &[(&'static str, String)]) -> Result<String> {
        tracing::debug!("POST {}", url);

        // reqwest sets Content-Type: application/x-www-form-urlencoded for .form()
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .form(fields)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Portal answered {} for {}, reading body anyway", status, url);
        } else {
            tracing::debug!("Portal answered {}", status);
        }

        Ok(response.text().await?)
    }
}
