use crate::domain::model::Credentials;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where credentials live. `Ok(None)` means "nothing stored yet".
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn get(&self) -> Result<Option<Credentials>>;
    async fn set(&self, credentials: &Credentials) -> Result<()>;
}

/// Name of the network the device is currently joined to, if it can be told.
pub trait NetworkNameProbe: Send + Sync {
    fn current(&self) -> Option<String>;
}

/// Sink for the human-readable status lines emitted during a run.
pub trait StatusLog: Send + Sync {
    fn record(&self, line: &str);
}
