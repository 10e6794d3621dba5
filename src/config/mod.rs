pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "portal-autologin")]
#[command(about = "Logs this device into a Sophos/Cyberoam captive portal when the internet is blocked")]
pub struct CliConfig {
    /// Path to a TOML settings file
    #[arg(short, long, env = "PORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override portal.base_url from the settings file
    #[arg(long)]
    pub base_url: Option<String>,

    /// Name of the network currently joined, used to skip foreign networks
    #[arg(long, env = "PORTAL_SSID")]
    pub ssid: Option<String>,

    /// Abort the whole run after this many seconds
    #[arg(long)]
    pub deadline_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in if the portal is blocking traffic (default)
    Login,
    /// End the current portal session
    Logout,
    /// Store credentials for later runs
    SetCredentials {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Report connectivity and portal reachability without logging in
    Status,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Login)
    }

    /// Settings file (or defaults) with command-line overrides applied.
    pub fn load_settings(&self) -> crate::Result<toml_config::PortalSettings> {
        let mut settings = match &self.config {
            Some(path) => toml_config::PortalSettings::from_file(path)?,
            None => toml_config::PortalSettings::default(),
        };

        if let Some(base_url) = &self.base_url {
            settings.portal.base_url = base_url.clone();
        }

        Ok(settings)
    }
}
