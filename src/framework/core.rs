//! # Core Fetch Framework
//!
//! This module defines the building blocks of a fetch resource.
//!
//! ## Key Types
//!
//! - [`Fetcher`] / [`Submitter`]: the network boundary (read and write).
//! - [`Transform`], [`OnSuccess`], [`ResourceProps`]: what a resource is asked to do.
//! - [`ResourceState`], [`Phase`]: what a resource currently looks like.
//! - [`FetchActor`]: the task that owns one resource's state.

use super::client::ResourceClient;
use super::error::FetchError;
use super::message::{Completion, ResourceCommand};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (network boundary and resource props)
// =============================================================================

/// Anything that can be stored as a resource's `data`.
///
/// Without a [`Transform`], the raw JSON body is deserialized straight into `T`.
pub trait ResourceData: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> ResourceData for T where T: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {}

/// One-shot HTTP GET returning the JSON body.
///
/// Implementations report non-2xx answers as [`FetchError::Status`].
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<Value, FetchError>;
}

/// One-shot HTTP POST of a JSON body, returning the status code.
///
/// Unlike [`Fetcher::get`], a submission is never cancelled once issued.
#[async_trait]
pub trait Submitter: Send + Sync + 'static {
    async fn post(&self, url: &str, body: Value) -> Result<u16, FetchError>;
}

type TransformFn<T> = dyn Fn(Value) -> Result<T, String> + Send + Sync;

/// Maps the raw response body to the value exposed as `data`.
///
/// Identity is the identity of the shared closure: clones of one `Transform`
/// are the same transform, two `Transform::new` calls never are. Changing the
/// transform identity re-arms the resource.
pub struct Transform<T> {
    f: Arc<TransformFn<T>>,
}

impl<T> Transform<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<T, String> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }

    /// Runs the closure, turning both `Err` and panics into [`FetchError::Transform`].
    pub fn apply(&self, raw: Value) -> Result<T, FetchError> {
        match catch_unwind(AssertUnwindSafe(|| (self.f)(raw))) {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(reason)) => Err(FetchError::Transform(reason)),
            Err(_) => Err(FetchError::Transform("transform panicked".to_string())),
        }
    }
}

impl<T> Clone for Transform<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for Transform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transform({:p})", Arc::as_ptr(&self.f))
    }
}

/// Callback invoked once per successful activation.
///
/// Not part of the resource identity: passing a fresh callback on every render
/// neither re-arms the resource nor fires the callback again.
pub struct OnSuccess<T> {
    f: Arc<dyn Fn(&T) + Send + Sync>,
}

impl<T> OnSuccess<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// `false` if the callback panicked.
    fn call(&self, data: &T) -> bool {
        catch_unwind(AssertUnwindSafe(|| (self.f)(data))).is_ok()
    }
}

impl<T> Clone for OnSuccess<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for OnSuccess<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnSuccess")
    }
}

/// Everything a resource is rendered with.
#[derive(Debug)]
pub struct ResourceProps<T> {
    pub endpoint: String,
    pub transform: Option<Transform<T>>,
    pub on_success: Option<OnSuccess<T>>,
    pub enabled: bool,
    /// Wait before issuing the GET. Part of the identity.
    pub delay: Option<Duration>,
}

impl<T> ResourceProps<T> {
    /// Enabled props for `endpoint`, with no transform and no callback.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transform: None,
            on_success: None,
            enabled: true,
            delay: None,
        }
    }

    pub fn transform(mut self, transform: Transform<T>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn on_success(mut self, on_success: OnSuccess<T>) -> Self {
        self.on_success = Some(on_success);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// A zero delay is the same as none.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay).filter(|d| !d.is_zero());
        self
    }

    /// Endpoint, delay and transform identity. `enabled` and the callback are not part of it.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.endpoint == other.endpoint
            && self.delay == other.delay
            && match (&self.transform, &other.transform) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same_as(b),
                _ => false,
            }
    }
}

impl<T> Clone for ResourceProps<T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            transform: self.transform.clone(),
            on_success: self.on_success.clone(),
            enabled: self.enabled,
            delay: self.delay,
        }
    }
}

// =============================================================================
// 2. THE STATE (published to observers)
// =============================================================================

/// Where a resource is in its lifecycle for the current activation.
///
/// `Succeeded` stands for "executed and success callback fired"; a resource
/// cannot have one without the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disabled,
    Armed,
    InFlight { ticket: u64 },
    Succeeded,
    Failed,
}

/// The `(data, loading, error)` triple a resource keeps current.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
}

impl<T> ResourceState<T> {
    fn initial(enabled: bool) -> Self {
        Self {
            data: None,
            loading: enabled,
            error: None,
            phase: if enabled { Phase::Armed } else { Phase::Disabled },
        }
    }

    /// True once a request completed successfully for the current activation.
    pub fn has_executed(&self) -> bool {
        self.phase == Phase::Succeeded
    }
}

// =============================================================================
// 3. THE ACTOR
// =============================================================================

/// The task that owns one resource.
///
/// # Concurrency Model
/// All state lives inside this struct and is only touched from [`FetchActor::run`].
/// Commands from clients and completions from the request task are handled one
/// at a time, so no lock guards the state. Observers read it through a
/// `watch` channel.
///
/// # Stale-response suppression
/// Every request is issued under a fresh ticket. Cancelling aborts the request
/// task and moves the phase off that ticket, so a completion that still slips
/// through no longer matches and is dropped without touching the state.
pub struct FetchActor<T: ResourceData> {
    receiver: mpsc::Receiver<ResourceCommand<T>>,
    completions_tx: mpsc::UnboundedSender<Completion<T>>,
    completions: mpsc::UnboundedReceiver<Completion<T>>,
    state: watch::Sender<ResourceState<T>>,
    props: ResourceProps<T>,
    phase: Phase,
    next_ticket: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl<T: ResourceData> FetchActor<T> {
    /// Creates the actor (server half) and its [`ResourceClient`].
    ///
    /// The initial published state already reports `loading = true` when the
    /// props are enabled, so an aggregate built right away never sees a gap.
    pub fn new(props: ResourceProps<T>, buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let initial = ResourceState::initial(props.enabled);
        let phase = initial.phase;
        let (state, state_rx) = watch::channel(initial);

        let actor = Self {
            receiver,
            completions_tx,
            completions,
            state,
            props,
            phase,
            next_ticket: 0,
            in_flight: None,
        };
        (actor, ResourceClient::new(sender, state_rx))
    }

    /// Runs the actor until it is torn down or every client is dropped.
    pub async fn run(mut self, fetcher: Arc<dyn Fetcher>) {
        info!(endpoint = %self.props.endpoint, enabled = self.props.enabled, "Resource mounted");
        self.start_if_armed(&fetcher);

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(ResourceCommand::Render { props, respond_to }) => {
                        self.apply(props, &fetcher);
                        let _ = respond_to.send(());
                    }
                    Some(ResourceCommand::SetEnabled { enabled, respond_to }) => {
                        let props = self.props.clone().enabled(enabled);
                        self.apply(props, &fetcher);
                        let _ = respond_to.send(());
                    }
                    Some(ResourceCommand::SetEndpoint { endpoint, respond_to }) => {
                        let mut props = self.props.clone();
                        props.endpoint = endpoint;
                        self.apply(props, &fetcher);
                        let _ = respond_to.send(());
                    }
                    Some(ResourceCommand::Teardown { respond_to }) => {
                        self.cancel_in_flight();
                        let _ = respond_to.send(());
                        break;
                    }
                    None => {
                        self.cancel_in_flight();
                        break;
                    }
                },
                Some(completion) = self.completions.recv() => self.complete(completion, &fetcher),
            }
        }

        info!(endpoint = %self.props.endpoint, "Resource torn down");
    }

    /// Re-evaluates the resource against new props.
    fn apply(&mut self, props: ResourceProps<T>, fetcher: &Arc<dyn Fetcher>) {
        let identity_changed = !self.props.same_identity(&props);
        // The callback is always replaced; it never re-arms anything.
        self.props = props;

        if !self.props.enabled {
            if self.phase != Phase::Disabled {
                debug!(endpoint = %self.props.endpoint, "Disabled");
                self.cancel_in_flight();
                self.phase = Phase::Disabled;
                self.publish(|state| {
                    state.loading = false;
                    state.error = None;
                });
            }
            return;
        }

        if self.phase == Phase::Disabled {
            debug!(endpoint = %self.props.endpoint, "Enabled");
            self.phase = Phase::Armed;
        } else if identity_changed {
            debug!(endpoint = %self.props.endpoint, phase = ?self.phase, "Identity changed, re-arming");
            self.cancel_in_flight();
            self.phase = Phase::Armed;
        }

        self.start_if_armed(fetcher);
    }

    fn start_if_armed(&mut self, fetcher: &Arc<dyn Fetcher>) {
        if self.phase != Phase::Armed {
            return;
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.phase = Phase::InFlight { ticket };
        self.publish(|state| {
            state.loading = true;
            state.error = None;
        });

        let fetcher = Arc::clone(fetcher);
        let url = self.props.endpoint.clone();
        let transform = self.props.transform.clone();
        let delay = self.props.delay;
        let completions = self.completions_tx.clone();
        debug!(endpoint = %url, ticket, ?delay, "Request issued");

        // Aborting the task also aborts the delay.
        self.in_flight = Some(tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let result = match fetcher.get(&url).await {
                Ok(raw) => decode(raw, transform.as_ref()),
                Err(e) => Err(e),
            };
            // The actor may already be gone.
            let _ = completions.send(Completion { ticket, result });
        }));
    }

    fn complete(&mut self, completion: Completion<T>, fetcher: &Arc<dyn Fetcher>) {
        let Completion { ticket, result } = completion;
        if self.phase != (Phase::InFlight { ticket }) {
            debug!(endpoint = %self.props.endpoint, ticket, "Discarding stale response");
            return;
        }
        self.in_flight = None;

        match result {
            Ok(data) => {
                self.phase = Phase::Succeeded;
                let callback_data = self.props.on_success.as_ref().map(|_| data.clone());
                self.publish(|state| {
                    state.data = Some(data);
                    state.loading = false;
                    state.error = None;
                });
                info!(endpoint = %self.props.endpoint, ticket, "Loaded");

                if let (Some(on_success), Some(data)) = (&self.props.on_success, callback_data) {
                    if !on_success.call(&data) {
                        warn!(endpoint = %self.props.endpoint, ticket, "Success callback panicked");
                    }
                }
            }
            Err(e) if e.is_cancelled() => {
                // Not one of our aborts: those never deliver a completion.
                debug!(endpoint = %self.props.endpoint, ticket, "Request cancelled by fetcher, reissuing");
                self.phase = Phase::Armed;
                self.start_if_armed(fetcher);
            }
            Err(e) => {
                self.phase = Phase::Failed;
                let message = e.user_message();
                warn!(endpoint = %self.props.endpoint, ticket, error = %e, "Fetch failed");
                self.publish(|state| {
                    state.loading = false;
                    state.error = Some(message);
                });
            }
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            debug!(endpoint = %self.props.endpoint, phase = ?self.phase, "Request aborted");
        }
        if matches!(self.phase, Phase::InFlight { .. }) {
            self.phase = Phase::Armed;
        }
    }

    fn publish(&self, update: impl FnOnce(&mut ResourceState<T>)) {
        let phase = self.phase;
        self.state.send_modify(|state| {
            update(state);
            state.phase = phase;
        });
    }
}

fn decode<T: ResourceData>(raw: Value, transform: Option<&Transform<T>>) -> Result<T, FetchError> {
    match transform {
        Some(transform) => transform.apply(raw),
        None => serde_json::from_value(raw).map_err(|e| FetchError::Decode(e.to_string())),
    }
}

/// Spawns a resource actor on the current runtime and returns its client.
pub fn spawn_resource<T: ResourceData>(
    fetcher: Arc<dyn Fetcher>,
    props: ResourceProps<T>,
) -> ResourceClient<T> {
    let (actor, client) = FetchActor::new(props, 16);
    tokio::spawn(actor.run(fetcher));
    client
}

// =============================================================================
// 4. TESTS
// =============================================================================
