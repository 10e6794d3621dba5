use anyhow::Result;
use httpmock::prelude::*;
use portal_autologin::domain::ports::CredentialProvider;
use portal_autologin::utils::validation::Validate;
use portal_autologin::{
    Credentials, FileStatusLog, JsonFileCredentials, LoginOrchestrator, LoginOutcome,
    PortalSettings,
};
use tempfile::TempDir;

/// 完整流程：設定檔 → 首次儲存帳密 → 登入 → 狀態記錄檔
#[tokio::test]
async fn test_settings_file_drives_full_login() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let credentials_path = temp_dir.path().join("config.json");
    let log_path = temp_dir.path().join("portal-autologin.log");

    let server = MockServer::start_async().await;
    let portal_page = server.url("/");
    server
        .mock_async(|when, then| {
            when.method(GET).path("/hotspot-detect.html");
            then.status(302).header("Location", portal_page);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("<html>portal</html>");
        })
        .await;
    let login_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/login.xml")
                .x_www_form_urlencoded_tuple("username", "221087")
                .x_www_form_urlencoded_tuple("password", "s3cr&t=");
            then.status(200)
                .body("<requestresponse><status>LIVE</status><message>signed in</message></requestresponse>");
        })
        .await;

    let config_content = format!(
        r#"
[portal]
base_url = "{base}"

[probe]
url = "{base}/hotspot-detect.html"

[reachability]
max_attempts = 3
interval_millis = 10
attempt_timeout_millis = 500

[credentials]
file = "{credentials}"

[log]
file = "{log}"
"#,
        base = server.base_url(),
        credentials = credentials_path.to_str().unwrap().replace('\\', "/"),
        log = log_path.to_str().unwrap().replace('\\', "/"),
    );
    let config_path = temp_dir.path().join("portal.toml");
    std::fs::write(&config_path, config_content)?;

    let settings = PortalSettings::from_file(&config_path)?;
    settings.validate()?;

    let store = JsonFileCredentials::new(settings.credentials.file.clone().unwrap());
    store.set(&Credentials::new("221087", "s3cr&t=")).await?;

    let status_log = FileStatusLog::new(settings.log.file.clone().unwrap());
    let orchestrator = LoginOrchestrator::new(&settings, store, status_log);

    let outcome = orchestrator.run_once().await;

    assert!(matches!(outcome, LoginOutcome::Succeeded(_)));
    login_mock.assert_async().await;

    let log_content = std::fs::read_to_string(&log_path)?;
    assert!(log_content.contains("[*] Portal response: status=LIVE, message=signed in"));
    assert!(log_content.contains("[+] Logged in successfully!"));

    Ok(())
}
