//! Periodic backend ping.
//!
//! The backend idles out when nobody visits. While the app runs, this task
//! requests a cheap endpoint once on start and then every
//! [`KEEP_ALIVE_INTERVAL`]. It shares nothing with the page resources.

use crate::framework::Fetcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, instrument, warn, Instrument};

pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Endpoint pinged to keep the backend warm.
pub const KEEP_ALIVE_PATH: &str = "/api/AboutMe";

/// Handle on the running ping task. Dropping it stops the task.
pub struct KeepAlive {
    handle: JoinHandle<()>,
}

impl KeepAlive {
    /// Pings `url` now and then every `interval`. Failures are logged and the
    /// task keeps going.
    pub fn spawn(fetcher: Arc<dyn Fetcher>, url: impl Into<String>, interval: Duration) -> Self {
        let url = url.into();
        let span = tracing::info_span!("keep_alive", url = %url);
        let handle = tokio::spawn(
            async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    ping(fetcher.as_ref(), &url).await;
                }
            }
            .instrument(span),
        );
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[instrument(level = "debug", skip(fetcher))]
async fn ping(fetcher: &dyn Fetcher, url: &str) {
    match fetcher.get(url).await {
        Ok(_) => info!("Backend awake"),
        Err(e) => warn!(error = %e, "Backend ping failed"),
    }
}
