use crate::core::until_cancelled;
use crate::domain::ports::StatusLog;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// The portal answered on this (1-based) attempt.
    Reachable { attempt: u32 },
    /// Every attempt failed; this is probably not the captive network.
    Unreachable { attempts: u32 },
}

#[derive(Debug, Clone)]
pub struct ReachabilityPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub attempt_timeout: Duration,
}

impl Default for ReachabilityPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(3),
            attempt_timeout: Duration::from_secs(3),
        }
    }
}

/// Polls the portal base address until it answers at all. Right after the
/// link comes up DHCP and routing are often still settling, so a fixed
/// interval is enough.
#[derive(Debug, Clone)]
pub struct PortalReachabilityWaiter {
    client: Client,
    base_url: String,
    policy: ReachabilityPolicy,
}

impl PortalReachabilityWaiter {
    pub fn new(client: Client, base_url: String, policy: ReachabilityPolicy) -> Self {
        Self {
            client,
            base_url,
            policy,
        }
    }

    pub async fn wait_for_portal(
        &self,
        status_log: &dyn StatusLog,
        cancel: &CancellationToken,
    ) -> Result<Reachability> {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            if until_cancelled(cancel, self.ping()).await? {
                tracing::debug!("Portal answered on attempt {}", attempt);
                return Ok(Reachability::Reachable { attempt });
            }

            status_log.record(&format!(
                "[*] Waiting for portal... attempt {}/{}",
                attempt, max_attempts
            ));

            // 最後一次失敗後不再等待
            if attempt < max_attempts {
                until_cancelled(cancel, tokio::time::sleep(self.policy.interval)).await?;
            }
        }

        Ok(Reachability::Unreachable {
            attempts: max_attempts,
        })
    }

    /// Any HTTP response counts, whatever the status code.
    pub async fn ping(&self) -> bool {
        match self
            .client
            .get(&self.base_url)
            .timeout(self.policy.attempt_timeout)
            .send()
            .await
        {
            Ok(response) => {
                tracing::debug!("Portal responded with {}", response.status());
                true
            }
            Err(e) => {
                tracing::debug!("Portal not reachable yet: {}", e);
                false
            }
        }
    }
}
