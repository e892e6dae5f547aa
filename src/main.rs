//! Mounts the portfolio home page against a live backend and logs what it
//! would render.
//!
//! ```bash
//! PORTFOLIO_API_URL=http://localhost:5000 RUST_LOG=info cargo run
//! ```

use portfolio_fetch::clients::HttpFetcher;
use portfolio_fetch::config::AppConfig;
use portfolio_fetch::framework::Fetcher;
use portfolio_fetch::lifecycle::tracing::setup_tracing;
use portfolio_fetch::lifecycle::{HomePage, KeepAlive, PageView, KEEP_ALIVE_INTERVAL, KEEP_ALIVE_PATH};
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    info!(api_base = %config.api_base(), "Starting portfolio fetch");

    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::from_config(&config).map_err(|e| e.to_string())?);
    let keep_alive = KeepAlive::spawn(
        Arc::clone(&fetcher),
        config.endpoint(KEEP_ALIVE_PATH),
        KEEP_ALIVE_INTERVAL,
    );

    let page = HomePage::mount(&config, fetcher);
    let view = page
        .settled()
        .instrument(tracing::info_span!("home_page"))
        .await;

    match &view {
        PageView::Ready(content) => {
            let name = content.account.as_ref().and_then(|a| a.name.as_deref());
            info!(
                name = name.unwrap_or("-"),
                titles = ?content.typewriter_words(),
                experiences = content.experiences.len(),
                projects = content.projects.len(),
                skills = content.skills.len(),
                "Page ready"
            );
            for (category, skills) in content.skills.iter() {
                info!(category, count = skills.len(), "Skills");
            }
        }
        PageView::Error(message) => error!(%message, "Page failed to load"),
        PageView::Loading => error!("Page still loading after every resource stopped"),
    }

    page.unmount().await.map_err(|e| e.to_string())?;
    keep_alive.stop();

    match view {
        PageView::Error(message) => Err(message),
        _ => Ok(()),
    }
}
