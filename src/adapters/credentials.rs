use crate::domain::model::Credentials;
use crate::domain::ports::CredentialProvider;
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub const USERNAME_ENV: &str = "PORTAL_USERNAME";
pub const PASSWORD_ENV: &str = "PORTAL_PASSWORD";

/// `{"username": "...", "password": "..."}` on disk. A missing file, or one
/// that does not parse, reads as "nothing stored".
#[derive(Debug, Clone)]
pub struct JsonFileCredentials {
    path: PathBuf,
}

impl JsonFileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialProvider for JsonFileCredentials {
    async fn get(&self) -> Result<Option<Credentials>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No credentials file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(PortalError::IoError(e)),
        };

        match serde_json::from_str::<Credentials>(&content) {
            Ok(credentials) => Ok(Some(credentials)),
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable credentials file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn set(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(credentials)?;
        write_private(&self.path, data.as_bytes())?;

        tracing::info!("Credentials saved to {}", self.path.display());
        Ok(())
    }
}

/// Writes through a sibling temp file (created 0600 on unix) and renames it
/// over `path`, so the password is never on disk with wider permissions.
fn write_private(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged
        .persist(path)
        .map_err(|e| PortalError::IoError(e.error))?;
    Ok(())
}

/// Reads `PORTAL_USERNAME` / `PORTAL_PASSWORD`. Read-only.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials;

#[async_trait]
impl CredentialProvider for EnvCredentials {
    async fn get(&self) -> Result<Option<Credentials>> {
        match (std::env::var(USERNAME_ENV), std::env::var(PASSWORD_ENV)) {
            (Ok(username), Ok(password)) => Ok(Some(Credentials { username, password })),
            _ => Ok(None),
        }
    }

    async fn set(&self, _credentials: &Credentials) -> Result<()> {
        Err(PortalError::ConfigError {
            message: format!(
                "environment credentials are read-only; export {} and {} instead",
                USERNAME_ENV, PASSWORD_ENV
            ),
        })
    }
}

/// In-memory credentials, e.g. passed on the command line.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    inner: RwLock<Option<Credentials>>,
}

impl StaticCredentials {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            inner: RwLock::new(credentials),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn get(&self) -> Result<Option<Credentials>> {
        let guard = self.inner.read().map_err(|_| PortalError::ConfigError {
            message: "credential store lock poisoned".to_string(),
        })?;
        Ok(guard.clone())
    }

    async fn set(&self, credentials: &Credentials) -> Result<()> {
        let mut guard = self.inner.write().map_err(|_| PortalError::ConfigError {
            message: "credential store lock poisoned".to_string(),
        })?;
        *guard = Some(credentials.clone());
        Ok(())
    }
}

/// Tries each provider in order and returns the first stored credentials.
/// `set` writes to the first provider that accepts it.
pub struct ChainedCredentials {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainedCredentials {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl CredentialProvider for ChainedCredentials {
    async fn get(&self) -> Result<Option<Credentials>> {
        for provider in &self.providers {
            match provider.get().await {
                Ok(Some(credentials)) if credentials.is_complete() => return Ok(Some(credentials)),
                Ok(_) => {}
                Err(e) => tracing::warn!("Credential source failed: {}", e),
            }
        }
        Ok(None)
    }

    async fn set(&self, credentials: &Credentials) -> Result<()> {
        let mut last_error = None;
        for provider in &self.providers {
            match provider.set(credentials).await {
                Ok(()) => return Ok(()),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| PortalError::MissingConfigError {
            field: "credentials.file".to_string(),
        }))
    }
}
