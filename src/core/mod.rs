pub mod client;
pub mod orchestrator;
pub mod probe;
pub mod reachability;
pub mod request;
pub mod response;

pub use crate::domain::model::{
    Credentials, LoginOutcome, LoginRequest, LoginResult, LogoutRequest, Outcome, PortalEndpoint,
};
pub use crate::domain::ports::{CredentialProvider, NetworkNameProbe, StatusLog};
pub use crate::utils::error::Result;

use crate::utils::error::PortalError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Runs `fut` unless `cancel` fires first, in which case the future is dropped
/// (releasing any in-flight request) and `Cancelled` is returned.
pub(crate) async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PortalError::Cancelled),
        output = fut => Ok(output),
    }
}
