//! # Resource Client
//!
//! The handle the rest of the application holds on a resource actor.

use super::core::{ResourceData, ResourceProps, ResourceState};
use super::error::FrameworkError;
use super::message::{Ack, ResourceCommand};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

/// A type-safe client for a [`FetchActor`](super::FetchActor).
///
/// Commands go over an mpsc channel and are acknowledged once applied. State is
/// read from a `watch` channel, so [`ResourceClient::state`] never waits on the
/// actor. Cloning is cheap; the actor stops once every clone is dropped.
#[derive(Clone)]
pub struct ResourceClient<T: ResourceData> {
    sender: mpsc::Sender<ResourceCommand<T>>,
    state: watch::Receiver<ResourceState<T>>,
}

impl<T: ResourceData> ResourceClient<T> {
    pub(crate) fn new(
        sender: mpsc::Sender<ResourceCommand<T>>,
        state: watch::Receiver<ResourceState<T>>,
    ) -> Self {
        Self { sender, state }
    }

    /// Re-renders the resource with `props`.
    #[instrument(skip(self, props), fields(endpoint = %props.endpoint, enabled = props.enabled))]
    pub async fn render(&self, props: ResourceProps<T>) -> Result<(), FrameworkError> {
        self.send(|respond_to| ResourceCommand::Render { props, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_enabled(&self, enabled: bool) -> Result<(), FrameworkError> {
        self.send(|respond_to| ResourceCommand::SetEnabled {
            enabled,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, endpoint), fields(endpoint = %endpoint.as_ref()))]
    pub async fn set_endpoint(&self, endpoint: impl AsRef<str>) -> Result<(), FrameworkError> {
        let endpoint = endpoint.as_ref().to_string();
        self.send(|respond_to| ResourceCommand::SetEndpoint {
            endpoint,
            respond_to,
        })
        .await
    }

    /// Aborts in-flight work and stops the actor.
    ///
    /// Observers keep the last published state; nothing is written after this returns.
    #[instrument(skip(self))]
    pub async fn teardown(&self) -> Result<(), FrameworkError> {
        self.send(|respond_to| ResourceCommand::Teardown { respond_to })
            .await
    }

    /// Current snapshot.
    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    /// A read-only handle suitable for an [`Aggregator`](super::Aggregator).
    pub fn watch(&self) -> ResourceWatch<T> {
        ResourceWatch::new(self.state.clone())
    }

    /// Waits until the resource is no longer loading, or until its actor is gone.
    pub async fn settled(&self) -> ResourceState<T> {
        self.watch().settled().await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn send(
        &self,
        command: impl FnOnce(Ack) -> ResourceCommand<T>,
    ) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        let command = command(respond_to);
        debug!(?command, "Sending command");
        self.sender
            .send(command)
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }
}

/// Read-only view of one resource's published state.
pub struct ResourceWatch<T> {
    rx: watch::Receiver<ResourceState<T>>,
}

impl<T: Clone> ResourceWatch<T> {
    pub fn new(rx: watch::Receiver<ResourceState<T>>) -> Self {
        Self { rx }
    }

    pub fn state(&self) -> ResourceState<T> {
        self.rx.borrow().clone()
    }

    /// Waits until the resource is no longer loading, or until its actor is gone.
    pub async fn settled(&mut self) -> ResourceState<T> {
        let settled = self.rx.wait_for(|state| !state.loading).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.rx.borrow().clone())
    }

    /// Waits for the next published change. `false` once the actor is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    pub(crate) fn loading(&self) -> bool {
        self.rx.borrow().loading
    }

    pub(crate) fn error(&self) -> Option<String> {
        self.rx.borrow().error.clone()
    }
}

impl<T> Clone for ResourceWatch<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}
