use crate::utils::error::PortalError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login for the captive portal. Stored by a credential provider; the core
/// never persists it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must carry something before a login may be submitted.
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalEndpoint {
    pub base_url: String,
    pub login_path: String,
    pub logout_path: String,
}

impl PortalEndpoint {
    pub fn login_url(&self) -> String {
        self.join(&self.login_path)
    }

    pub fn logout_url(&self) -> String {
        self.join(&self.logout_path)
    }

    fn join(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Form fields for a Sophos/Cyberoam login (`mode=191`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub mode: &'static str,
    pub username: String,
    pub password: String,
    /// Epoch milliseconds; only there to defeat caching.
    pub a: i64,
    pub producttype: &'static str,
}

impl LoginRequest {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mode", self.mode.to_string()),
            ("username", self.username.clone()),
            ("password", self.password.clone()),
            ("a", self.a.to_string()),
            ("producttype", self.producttype.to_string()),
        ]
    }
}

/// Form fields for ending a session (`mode=193`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutRequest {
    pub mode: &'static str,
    pub username: String,
    pub a: i64,
    pub producttype: &'static str,
}

impl LogoutRequest {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mode", self.mode.to_string()),
            ("username", self.username.clone()),
            ("a", self.a.to_string()),
            ("producttype", self.producttype.to_string()),
        ]
    }
}

/// Status sentinel the portal returns once the session is live.
pub const LIVE_STATUS: &str = "LIVE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResult {
    pub status: String,
    pub message: String,
}

impl LoginResult {
    pub fn outcome(&self) -> Outcome {
        if self.status == LIVE_STATUS {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

/// Classification of a single login attempt. `Failure` means the portal
/// answered and said no; `RequestError` means we never got a usable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Success,
    Failure,
    RequestError,
}

impl Outcome {
    pub fn classify(parsed: &Result<LoginResult, PortalError>) -> Self {
        match parsed {
            Ok(result) => result.outcome(),
            Err(_) => Outcome::RequestError,
        }
    }
}

/// Terminal state of one orchestrator run.
#[derive(Debug)]
pub enum LoginOutcome {
    AlreadyOnline,
    PortalUnreachable { attempts: u32 },
    CredentialsMissing,
    Succeeded(LoginResult),
    Failed(LoginResult),
    Errored(PortalError),
}

impl LoginOutcome {
    pub fn result(&self) -> Option<&LoginResult> {
        match self {
            LoginOutcome::Succeeded(result) | LoginOutcome::Failed(result) => Some(result),
            _ => None,
        }
    }

    /// Attempt classification, when a login was actually attempted.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            LoginOutcome::Succeeded(_) => Some(Outcome::Success),
            LoginOutcome::Failed(_) => Some(Outcome::Failure),
            LoginOutcome::Errored(_) => Some(Outcome::RequestError),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoginOutcome::AlreadyOnline => "AlreadyOnline",
            LoginOutcome::PortalUnreachable { .. } => "PortalUnreachable",
            LoginOutcome::CredentialsMissing => "CredentialsMissing",
            LoginOutcome::Succeeded(_) => "Succeeded",
            LoginOutcome::Failed(_) => "Failed",
            LoginOutcome::Errored(_) => "Errored",
        }
    }

    /// Process exit code for schedulers: 0 when nothing needs attention.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoginOutcome::AlreadyOnline
            | LoginOutcome::Succeeded(_)
            | LoginOutcome::PortalUnreachable { .. } => 0,
            LoginOutcome::Failed(_) => 1,
            LoginOutcome::Errored(_) => 2,
            LoginOutcome::CredentialsMissing => 3,
        }
    }
}
