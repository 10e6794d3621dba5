use crate::core::until_cancelled;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Checks whether the internet is already open by fetching a well-known
/// captive-detection page and looking for its success marker.
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    client: Client,
    url: String,
    success_marker: String,
    timeout: Duration,
}

impl ConnectivityProbe {
    pub fn new(client: Client, url: String, success_marker: String, timeout: Duration) -> Self {
        Self {
            client,
            url,
            success_marker,
            timeout,
        }
    }

    /// `Ok(false)` covers every network failure as well as a rewritten page;
    /// only cancellation surfaces as an error.
    pub async fn is_online(&self, cancel: &CancellationToken) -> Result<bool> {
        until_cancelled(cancel, self.fetch_and_check()).await
    }

    async fn fetch_and_check(&self) -> bool {
        tracing::debug!("Probing connectivity via {}", self.url);

        let response = match self.client.get(&self.url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Connectivity probe failed: {}", e);
                return false;
            }
        };

        match response.text().await {
            Ok(body) => {
                let online = body.contains(&self.success_marker);
                tracing::debug!("Connectivity probe body matched marker: {}", online);
                online
            }
            Err(e) => {
                tracing::debug!("Connectivity probe body unreadable: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn probe_for(url: String, timeout: Duration) -> ConnectivityProbe {
        ConnectivityProbe::new(Client::new(), url, "Success".to_string(), timeout)
    }

    #[tokio::test]
    async fn test_online_when_marker_present() {
        let server = MockServer::start_async().await;
        let probe_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/hotspot-detect.html");
                then.status(200)
                    .body("<HTML><HEAD><TITLE>Success</TITLE></HEAD><BODY>Success</BODY></HTML>");
            })
            .await;

        let probe = probe_for(server.url("/hotspot-detect.html"), Duration::from_secs(2));
        let online = probe.is_online(&CancellationToken::new()).await.unwrap();

        probe_mock.assert_async().await;
        assert!(online);
    }

    #[tokio::test]
    async fn test_offline_when_portal_rewrites_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/hotspot-detect.html");
                then.status(200)
                    .body("<html><script>location='http://172.24.66.1:8090/'</script></html>");
            })
            .await;

        let probe = probe_for(server.url("/hotspot-detect.html"), Duration::from_secs(2));
        assert!(!probe.is_online(&CancellationToken::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_offline_on_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .body("Success");
            })
            .await;

        let probe = probe_for(server.url("/slow"), Duration::from_millis(50));
        assert!(!probe.is_online(&CancellationToken::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_offline_when_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = probe_for(format!("http://127.0.0.1:{}/", port), Duration::from_secs(1));
        assert!(!probe.is_online(&CancellationToken::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_cancelled_probe_reports_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let probe = probe_for("http://127.0.0.1:9/".to_string(), Duration::from_secs(1));
        assert!(probe.is_online(&cancel).await.is_err());
    }
}
