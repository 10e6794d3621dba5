pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::credentials::{ChainedCredentials, EnvCredentials, JsonFileCredentials, StaticCredentials};
pub use adapters::network::{network_gate, GateDecision, StaticNetworkName};
pub use adapters::status_log::{AnyStatusLog, FileStatusLog, TracingStatusLog};
pub use config::toml_config::PortalSettings;
pub use core::orchestrator::LoginOrchestrator;
pub use domain::model::{Credentials, LoginOutcome, LoginResult, Outcome, PortalEndpoint};
pub use utils::error::{PortalError, Result};
