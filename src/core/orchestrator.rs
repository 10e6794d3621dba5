use crate::config::toml_config::PortalSettings;
use crate::core::client::PortalClient;
use crate::core::probe::ConnectivityProbe;
use crate::core::reachability::{PortalReachabilityWaiter, Reachability, ReachabilityPolicy};
use crate::core::request::LoginRequestBuilder;
use crate::core::response::ResponseInterpreter;
use crate::domain::model::{LoginOutcome, LoginResult, Outcome};
use crate::domain::ports::{CredentialProvider, StatusLog};
use crate::utils::error::{PortalError, Result};
use reqwest::Client;
use tokio_util::sync::CancellationToken;

/// Runs the full "online? → portal up? → log in → read verdict" sequence once.
///
/// A run makes at most one login POST. Repeating runs is the caller's job
/// (timer, network-change hook, scheduler).
pub struct LoginOrchestrator<C: CredentialProvider, L: StatusLog> {
    probe: ConnectivityProbe,
    waiter: PortalReachabilityWaiter,
    builder: LoginRequestBuilder,
    portal: PortalClient,
    credentials: C,
    status_log: L,
}

impl<C: CredentialProvider, L: StatusLog> LoginOrchestrator<C, L> {
    pub fn new(settings: &PortalSettings, credentials: C, status_log: L) -> Self {
        Self::with_client(Client::new(), settings, credentials, status_log)
    }

    pub fn with_client(
        client: Client,
        settings: &PortalSettings,
        credentials: C,
        status_log: L,
    ) -> Self {
        let probe = ConnectivityProbe::new(
            client.clone(),
            settings.probe.url.clone(),
            settings.probe.success_marker.clone(),
            settings.probe_timeout(),
        );
        let waiter = PortalReachabilityWaiter::new(
            client.clone(),
            settings.portal.base_url.clone(),
            ReachabilityPolicy {
                max_attempts: settings.reachability.max_attempts,
                interval: settings.reachability.interval(),
                attempt_timeout: settings.reachability.attempt_timeout(),
            },
        );
        let portal = PortalClient::new(client, settings.endpoint(), settings.submit_timeout());

        Self {
            probe,
            waiter,
            builder: LoginRequestBuilder::new(),
            portal,
            credentials,
            status_log,
        }
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    pub fn probe(&self) -> &ConnectivityProbe {
        &self.probe
    }

    pub fn waiter(&self) -> &PortalReachabilityWaiter {
        &self.waiter
    }

    pub async fn run_once(&self) -> LoginOutcome {
        self.run(&CancellationToken::new()).await
    }

    /// Never fails: every way a run can end is a [`LoginOutcome`].
    pub async fn run(&self, cancel: &CancellationToken) -> LoginOutcome {
        let outcome = match self.drive(cancel).await {
            Ok(outcome) => outcome,
            Err(e) => LoginOutcome::Errored(e),
        };
        self.report(&outcome);
        outcome
    }

    async fn drive(&self, cancel: &CancellationToken) -> Result<LoginOutcome> {
        if self.probe.is_online(cancel).await? {
            return Ok(LoginOutcome::AlreadyOnline);
        }

        match self.waiter.wait_for_portal(&self.status_log, cancel).await? {
            Reachability::Reachable { attempt } => {
                tracing::debug!("Portal reachable after {} attempt(s)", attempt);
            }
            Reachability::Unreachable { attempts } => {
                return Ok(LoginOutcome::PortalUnreachable { attempts });
            }
        }

        self.status_log
            .record("[*] Internet down, portal reachable - logging in...");

        let credentials = match self.credentials.get().await {
            Ok(Some(credentials)) if credentials.is_complete() => credentials,
            Ok(_) => return Ok(LoginOutcome::CredentialsMissing),
            Err(e) => {
                tracing::warn!("Credential store unreadable: {}", e);
                return Ok(LoginOutcome::CredentialsMissing);
            }
        };

        let request = self.builder.build(&credentials);
        let body = self.portal.submit(&request, cancel).await?;

        let result = ResponseInterpreter::parse(&body)?;
        Ok(match result.outcome() {
            Outcome::Success => LoginOutcome::Succeeded(result),
            Outcome::Failure | Outcome::RequestError => LoginOutcome::Failed(result),
        })
    }

    /// Ends the session of the stored user. Skips the probe and reachability
    /// steps: logging out only makes sense while the portal is up.
    pub async fn logout(&self, cancel: &CancellationToken) -> Result<LoginResult> {
        let credentials = self
            .credentials
            .get()
            .await?
            .filter(|c| !c.username.trim().is_empty())
            .ok_or_else(|| PortalError::MissingConfigError {
                field: "credentials.username".to_string(),
            })?;

        let request = self.builder.build_logout(&credentials.username);
        let result = self.portal.logout(&request, cancel).await?;
        self.status_log.record(&format!(
            "[*] Logout response: status={}, message={}",
            result.status, result.message
        ));
        Ok(result)
    }

    fn report(&self, outcome: &LoginOutcome) {
        if let Some(LoginResult { status, message }) = outcome.result() {
            self.status_log.record(&format!(
                "[*] Portal response: status={}, message={}",
                status, message
            ));
        }

        let line = match outcome {
            LoginOutcome::AlreadyOnline => "[*] Internet already working. No login needed.".to_string(),
            LoginOutcome::PortalUnreachable { attempts } => format!(
                "[*] Portal not reachable after {} attempts. Not on the captive network.",
                attempts
            ),
            LoginOutcome::CredentialsMissing => {
                "[*] No credentials configured. Run set-credentials first.".to_string()
            }
            LoginOutcome::Succeeded(_) => "[+] Logged in successfully!".to_string(),
            LoginOutcome::Failed(result) => {
                format!("[*] Login returned unexpected status: {}", result.status)
            }
            LoginOutcome::Errored(e) => {
                tracing::debug!("Login run errored ({:?}): {}", e.kind(), e.recovery_suggestion());
                format!("[*] Login request failed: {}", e)
            }
        };
        self.status_log.record(&line);
    }
}
