//! # Portfolio Fetch
//!
//! > **The data layer of a portfolio home page, built from small actors.**
//!
//! The page renders six sections from five backend sources. Each source is a
//! *fetch resource*: one endpoint, an optional transform, an optional success
//! callback and an `enabled` flag. A resource keeps a `(data, loading, error)`
//! triple current, issues at most one request per activation, and drops
//! whatever a cancelled request returns. The page gates on all of them at once.
//!
//! ## Core Concepts
//!
//! ### One actor per resource
//! Every resource runs as its own Tokio task ([`FetchActor`](framework::FetchActor)).
//! It handles commands (render, enable, teardown) and the completion of its own
//! request one at a time, so its state needs no lock. Observers read that state
//! through a `watch` channel and never wait on the actor.
//!
//! ### Tickets instead of flags
//! A request is a child task issued under a fresh ticket. Cancelling aborts the
//! task and retires the ticket; a late completion that still carries the old
//! ticket is discarded. The lifecycle is a single [`Phase`](framework::Phase)
//! enum, so "executed but callback not fired" cannot be represented.
//!
//! ### Aggregation
//! [`Aggregator`](framework::Aggregator) folds any number of resources into one
//! `loading` / `error` signal: loading while any member loads, otherwise the
//! first error in declaration order.
//!
//! ### Mocking
//! [`MockFetcher`](framework::mock::MockFetcher) scripts replies per URL,
//! including replies the test resolves by hand, which makes cancellation races
//! deterministic. See the [`framework::mock`] module.
//!
//! ## Module Tour
//!
//! - [`framework`]: resources, their client, the aggregator, errors and the mock.
//! - [`model`]: serde types for the backend payloads and their transforms.
//! - [`clients`]: the reqwest [`HttpFetcher`](clients::HttpFetcher) and the
//!   contact form.
//! - [`lifecycle`]: the [`HomePage`](lifecycle::HomePage), the
//!   [`KeepAlive`](lifecycle::KeepAlive) ping and tracing setup.
//! - [`config`]: [`AppConfig`](config::AppConfig), read from the environment.
//!
//! ## Running
//!
//! ```bash
//! PORTFOLIO_API_URL=http://localhost:5000 RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
