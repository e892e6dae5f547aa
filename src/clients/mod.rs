//! Collaborators that talk to the backend outside the resource actors.

pub mod contact_client;
pub mod http_fetcher;

pub use contact_client::*;
pub use http_fetcher::*;
