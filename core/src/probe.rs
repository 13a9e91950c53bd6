//! Remote availability check.
//!
//! Called before every mutating store operation; results are deliberately
//! not cached so routing always reflects the endpoint's current state.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::client::ContactClient;
use crate::transport::Transport;

/// Default bound on a health check.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Clone)]
pub struct AvailabilityProbe {
    client: ContactClient,
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl AvailabilityProbe {
    pub fn new(client: ContactClient, transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self {
            client,
            transport,
            timeout,
        }
    }

    /// `true` only for a 2xx health response within the timeout. Never fails.
    pub async fn is_remote_available(&self) -> bool {
        if !self.client.is_configured() {
            debug!("no remote endpoint configured");
            return false;
        }

        let request = self.client.build_health();
        let call = self.transport.execute(request, Some(self.timeout));
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => {
                let available = self.client.parse_health(&response);
                debug!(status = response.status, available, "health check");
                available
            }
            Ok(Err(e)) => {
                debug!(error = %e, "health check failed");
                false
            }
            Err(_) => {
                debug!(timeout_ms = %self.timeout.as_millis(), "health check timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};

    struct Fixed {
        outcome: fn() -> Result<HttpResponse, ApiError>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(outcome: fn() -> Result<HttpResponse, ApiError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Transport for Fixed {
        async fn execute(
            &self,
            request: HttpRequest,
            _timeout: Option<Duration>,
        ) -> Result<HttpResponse, ApiError> {
            assert!(request.path.ends_with("/health"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            (self.outcome)()
        }
    }

    fn probe(base_url: &str, transport: Arc<Fixed>, timeout: Duration) -> AvailabilityProbe {
        AvailabilityProbe::new(ContactClient::new(base_url), transport, timeout)
    }

    #[tokio::test]
    async fn ok_response_means_available() {
        let t = Fixed::new(|| Ok(HttpResponse::new(200, "ok")));
        assert!(probe("http://api", t, DEFAULT_PROBE_TIMEOUT).is_remote_available().await);
    }

    #[tokio::test]
    async fn non_2xx_means_unavailable() {
        let t = Fixed::new(|| Ok(HttpResponse::new(503, "")));
        assert!(!probe("http://api", t, DEFAULT_PROBE_TIMEOUT).is_remote_available().await);
    }

    #[tokio::test]
    async fn transport_error_means_unavailable() {
        let t = Fixed::new(|| Err(ApiError::Transport("connection refused".into())));
        assert!(!probe("http://api", t, DEFAULT_PROBE_TIMEOUT).is_remote_available().await);
    }

    #[tokio::test]
    async fn unconfigured_probe_skips_the_request() {
        let t = Fixed::new(|| Ok(HttpResponse::new(200, "")));
        let p = probe("", t.clone(), DEFAULT_PROBE_TIMEOUT);
        assert!(!p.is_remote_available().await);
        assert_eq!(t.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_health_check_times_out() {
        let t = Arc::new(Fixed {
            outcome: || Ok(HttpResponse::new(200, "")),
            delay: Duration::from_secs(10),
            calls: AtomicUsize::new(0),
        });
        let p = probe("http://api", t, Duration::from_millis(5000));
        assert!(!p.is_remote_available().await);
    }
}
