use crate::domain::model::PortalEndpoint;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PORTAL_BASE: &str = "http://172.24.66.1:8090";
pub const DEFAULT_PROBE_URL: &str = "http://captive.apple.com/hotspot-detect.html";

/// Every knob the login flow reads, fixed for the life of the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub portal: PortalSection,
    pub probe: ProbeSection,
    pub reachability: ReachabilitySection,
    pub network: NetworkSection,
    pub credentials: CredentialsSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSection {
    pub base_url: String,
    pub login_path: String,
    pub logout_path: String,
    pub submit_timeout_seconds: u64,
}

impl Default for PortalSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PORTAL_BASE.to_string(),
            login_path: "/login.xml".to_string(),
            logout_path: "/logout.xml".to_string(),
            submit_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSection {
    pub url: String,
    pub success_marker: String,
    pub timeout_seconds: u64,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_PROBE_URL.to_string(),
            success_marker: "Success".to_string(),
            timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachabilitySection {
    pub max_attempts: u32,
    pub interval_seconds: u64,
    pub attempt_timeout_seconds: u64,
    /// Overrides `interval_seconds` when set.
    pub interval_millis: Option<u64>,
    /// Overrides `attempt_timeout_seconds` when set.
    pub attempt_timeout_millis: Option<u64>,
}

impl Default for ReachabilitySection {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval_seconds: 3,
            attempt_timeout_seconds: 3,
            interval_millis: None,
            attempt_timeout_millis: None,
        }
    }
}

impl ReachabilitySection {
    pub fn interval(&self) -> Duration {
        self.interval_millis
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_secs(self.interval_seconds))
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout_millis
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_secs(self.attempt_timeout_seconds))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSection {
    pub target_ssid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsSection {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub file: Option<PathBuf>,
}

impl PortalSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PortalError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PortalError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn endpoint(&self) -> PortalEndpoint {
        PortalEndpoint {
            base_url: self.portal.base_url.clone(),
            login_path: self.portal.login_path.clone(),
            logout_path: self.portal.logout_path.clone(),
        }
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.portal.submit_timeout_seconds)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_seconds)
    }

    /// Worst-case wall time spent before a login POST is even sent.
    pub fn reachability_budget(&self) -> Duration {
        let attempts = self.reachability.max_attempts;
        self.reachability.attempt_timeout() * attempts
            + self.reachability.interval() * attempts.saturating_sub(1)
    }
}

impl Validate for PortalSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("portal.base_url", &self.portal.base_url)?;
        validation::validate_url_path("portal.login_path", &self.portal.login_path)?;
        validation::validate_url_path("portal.logout_path", &self.portal.logout_path)?;
        validation::validate_range(
            "portal.submit_timeout_seconds",
            self.portal.submit_timeout_seconds,
            1,
            300,
        )?;

        validation::validate_url("probe.url", &self.probe.url)?;
        validation::validate_non_empty_string("probe.success_marker", &self.probe.success_marker)?;
        validation::validate_range("probe.timeout_seconds", self.probe.timeout_seconds, 1, 120)?;

        validation::validate_positive_number(
            "reachability.max_attempts",
            u64::from(self.reachability.max_attempts),
            1,
        )?;
        if self.reachability.attempt_timeout().is_zero() {
            return Err(PortalError::InvalidConfigValueError {
                field: "reachability.attempt_timeout".to_string(),
                value: "0".to_string(),
                reason: "Every attempt needs a non-zero timeout".to_string(),
            });
        }

        if let Some(ssid) = &self.network.target_ssid {
            validation::validate_non_empty_string("network.target_ssid", ssid)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = PortalSettings::from_toml_str("").unwrap();

        assert_eq!(settings.portal.base_url, DEFAULT_PORTAL_BASE);
        assert_eq!(settings.endpoint().login_url(), "http://172.24.66.1:8090/login.xml");
        assert_eq!(settings.probe.success_marker, "Success");
        assert_eq!(settings.reachability.max_attempts, 10);
        assert_eq!(settings.reachability.interval(), Duration::from_secs(3));
        assert_eq!(settings.submit_timeout(), Duration::from_secs(10));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_full_settings() {
        let toml_content = r#"
[portal]
base_url = "http://10.0.0.1:8090"
submit_timeout_seconds = 15

[probe]
url = "http://probe.example.com/check"
timeout_seconds = 2

[reachability]
max_attempts = 4
interval_millis = 250

[network]
target_ssid = "CAMPUS WiFi"

[credentials]
file = "/etc/portal/credentials.json"
"#;

        let settings = PortalSettings::from_toml_str(toml_content).unwrap();

        assert_eq!(settings.portal.base_url, "http://10.0.0.1:8090");
        assert_eq!(settings.portal.login_path, "/login.xml");
        assert_eq!(settings.probe_timeout(), Duration::from_secs(2));
        assert_eq!(settings.reachability.max_attempts, 4);
        assert_eq!(settings.reachability.interval(), Duration::from_millis(250));
        assert_eq!(settings.reachability.attempt_timeout(), Duration::from_secs(3));
        assert_eq!(settings.network.target_ssid.as_deref(), Some("CAMPUS WiFi"));
        assert_eq!(
            settings.credentials.file,
            Some(PathBuf::from("/etc/portal/credentials.json"))
        );
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_PORTAL_BASE_URL", "http://192.168.1.1:8090");

        let toml_content = r#"
[portal]
base_url = "${TEST_PORTAL_BASE_URL}"

[network]
target_ssid = "${TEST_PORTAL_UNSET_VARIABLE}"
"#;

        let settings = PortalSettings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.portal.base_url, "http://192.168.1.1:8090");
        assert_eq!(
            settings.network.target_ssid.as_deref(),
            Some("${TEST_PORTAL_UNSET_VARIABLE}")
        );

        std::env::remove_var("TEST_PORTAL_BASE_URL");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_url = PortalSettings::from_toml_str("[portal]\nbase_url = \"172.24.66.1\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let no_attempts =
            PortalSettings::from_toml_str("[reachability]\nmax_attempts = 0\n").unwrap();
        assert!(no_attempts.validate().is_err());

        let bad_path = PortalSettings::from_toml_str("[portal]\nlogin_path = \"login.xml\"\n").unwrap();
        assert!(bad_path.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = PortalSettings::from_toml_str("[portal\nbase_url = 1").unwrap_err();
        assert!(matches!(err, PortalError::ConfigError { .. }));
    }

    #[test]
    fn test_reachability_budget() {
        let settings = PortalSettings::default();
        // 10 attempts x 3s timeout + 9 gaps x 3s
        assert_eq!(settings.reachability_budget(), Duration::from_secs(57));
    }

    #[test]
    fn test_settings_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[portal]\nbase_url = \"http://portal.local:8090\"\n")
            .unwrap();

        let settings = PortalSettings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.portal.base_url, "http://portal.local:8090");
    }
}
