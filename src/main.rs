use anyhow::Context;
use clap::Parser;
use portal_autologin::domain::ports::CredentialProvider;
use portal_autologin::utils::{logger, validation::Validate};
use portal_autologin::{
    network_gate, AnyStatusLog, ChainedCredentials, CliConfig, Command, Credentials, EnvCredentials,
    GateDecision, JsonFileCredentials, LoginOrchestrator, PortalSettings, StaticNetworkName,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEFAULT_CREDENTIALS_FILE: &str = "config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let settings = cli
        .load_settings()
        .with_context(|| format!("loading settings from {:?}", cli.config))?;

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(3);
    }

    let credentials_path = credentials_path(&settings);
    let credentials = ChainedCredentials::new(vec![
        Box::new(EnvCredentials),
        Box::new(JsonFileCredentials::new(credentials_path)),
    ]);
    let status_log = AnyStatusLog::from_path(settings.log.file.clone());
    let orchestrator = LoginOrchestrator::new(&settings, credentials, status_log);

    if let Some(seconds) = cli.deadline_seconds {
        let budget = settings.reachability_budget();
        if Duration::from_secs(seconds) < budget {
            tracing::warn!(
                "Deadline of {}s is shorter than the portal wait of up to {:?}; a slow network may be cut off",
                seconds,
                budget
            );
        }
    }

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(&cancel, cli.deadline_seconds);

    let exit_code = match cli.command() {
        Command::Login => login(&cli, &settings, &orchestrator, &cancel).await,
        Command::Logout => match orchestrator.logout(&cancel).await {
            Ok(result) => {
                println!("status={} message={}", result.status, result.message);
                0
            }
            Err(e) => {
                eprintln!("❌ Logout failed: {}", e);
                eprintln!("💡 {}", e.recovery_suggestion());
                2
            }
        },
        Command::SetCredentials { username, password } => {
            let credentials = Credentials::new(username.trim(), password);
            if !credentials.is_complete() {
                eprintln!("❌ Username and password are required.");
                std::process::exit(3);
            }
            orchestrator
                .credentials()
                .set(&credentials)
                .await
                .context("saving credentials")?;
            println!("✅ Credentials saved");
            0
        }
        Command::Status => {
            let online = orchestrator.probe().is_online(&cancel).await.unwrap_or(false);
            let reachable = orchestrator.waiter().ping().await;
            println!("internet: {}", if online { "online" } else { "blocked" });
            println!(
                "portal {}: {}",
                settings.portal.base_url,
                if reachable { "reachable" } else { "unreachable" }
            );
            0
        }
    };

    std::process::exit(exit_code);
}

async fn login(
    cli: &CliConfig,
    settings: &PortalSettings,
    orchestrator: &LoginOrchestrator<ChainedCredentials, AnyStatusLog>,
    cancel: &CancellationToken,
) -> i32 {
    let network = StaticNetworkName::new(cli.ssid.clone());
    if let GateDecision::Skip { current } =
        network_gate(&network, settings.network.target_ssid.as_deref())
    {
        tracing::info!("[*] On '{}', not the target network. Nothing to do.", current);
        return 0;
    }

    let outcome = orchestrator.run(cancel).await;
    tracing::debug!("Run finished in state {}", outcome.label());
    outcome.exit_code()
}

/// Configured path, or `config.json` beside the executable.
fn credentials_path(settings: &PortalSettings) -> PathBuf {
    if let Some(path) = &settings.credentials.file {
        return path.clone();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CREDENTIALS_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE))
}

fn spawn_cancel_triggers(cancel: &CancellationToken, deadline_seconds: Option<u64>) {
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            on_signal.cancel();
        }
    });

    if let Some(seconds) = deadline_seconds {
        let on_deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            tracing::warn!("Deadline of {}s reached, cancelling", seconds);
            on_deadline.cancel();
        });
    }
}
