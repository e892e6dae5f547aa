//! # Resource Messages
//!
//! Commands sent from a [`ResourceClient`](super::ResourceClient) to its
//! [`FetchActor`](super::FetchActor), and the completion message a request task
//! sends back to the actor that spawned it.

use super::core::{ResourceData, ResourceProps};
use super::error::FetchError;
use std::fmt;
use tokio::sync::oneshot;

/// Acknowledgement that a command was applied.
pub type Ack = oneshot::Sender<()>;

/// Commands understood by a resource actor.
///
/// Every command is acknowledged once the actor has applied it, so a caller
/// that awaits the client method observes the post-command state.
pub enum ResourceCommand<T: ResourceData> {
    /// Re-evaluate the resource with a full set of props (a "re-render").
    Render {
        props: ResourceProps<T>,
        respond_to: Ack,
    },
    /// Flip `enabled`, keeping the rest of the props.
    SetEnabled { enabled: bool, respond_to: Ack },
    /// Point the resource at another endpoint, keeping the rest of the props.
    SetEndpoint { endpoint: String, respond_to: Ack },
    /// Abort in-flight work and stop the actor.
    Teardown { respond_to: Ack },
}

impl<T: ResourceData> fmt::Debug for ResourceCommand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render { props, .. } => f
                .debug_struct("Render")
                .field("endpoint", &props.endpoint)
                .field("enabled", &props.enabled)
                .finish_non_exhaustive(),
            Self::SetEnabled { enabled, .. } => f
                .debug_struct("SetEnabled")
                .field("enabled", enabled)
                .finish_non_exhaustive(),
            Self::SetEndpoint { endpoint, .. } => f
                .debug_struct("SetEndpoint")
                .field("endpoint", endpoint)
                .finish_non_exhaustive(),
            Self::Teardown { .. } => f.debug_struct("Teardown").finish_non_exhaustive(),
        }
    }
}

/// Outcome of one request task, tagged with the ticket it was issued under.
#[derive(Debug)]
pub(crate) struct Completion<T> {
    pub ticket: u64,
    pub result: Result<T, FetchError>,
}
