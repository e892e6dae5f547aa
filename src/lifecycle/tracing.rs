//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global subscriber: structured `tracing`
//! output, filtered by `RUST_LOG`, in the compact format.
//!
//! ## What Gets Traced
//!
//! - **Resource lifecycle**: mount and teardown of every resource actor (`info`)
//! - **Requests**: issue, abort and stale-response discards, keyed by
//!   `endpoint` and `ticket` (`debug`)
//! - **Outcomes**: `Loaded` at `info`, `Fetch failed` at `warn` with the error
//! - **Aggregation**: which `resource` a page is still waiting on (`debug`)
//! - **Keep-alive**: `Backend awake` / `Backend ping failed`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Mounts, loads and failures
//! RUST_LOG=info cargo run
//!
//! # Every command and request, with tickets
//! RUST_LOG=debug cargo run
//!
//! # Only the resource framework
//! RUST_LOG=portfolio_fetch::framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a page mount reads like:
//!
//! ```text
//! INFO Resource mounted endpoint=http://localhost:5000/api/Skills enabled=true
//! DEBUG Request issued endpoint=http://localhost:5000/api/Skills ticket=1
//! DEBUG Waiting for resource resource="skills"
//! INFO Loaded endpoint=http://localhost:5000/api/Skills ticket=1
//! ```

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // endpoint/resource fields already say where a line comes from
        .compact()
        .init();
}
