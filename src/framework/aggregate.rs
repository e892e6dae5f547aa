//! # Resource Aggregation
//!
//! Folds the states of several independent resources into one
//! `loading` / `error` signal a page can gate its rendering on.
//!
//! The aggregator owns nothing but read handles. It never mutates a member and
//! keeps no state of its own; every query recomputes the fold.
//!
//! ```ignore
//! let mut page = Aggregator::new()
//!     .with_member("settings", settings.watch())
//!     .with_member("skills", skills.watch());
//!
//! match page.settled().await.status() {
//!     AggregateStatus::Ready => { /* render from each resource's data */ }
//!     AggregateStatus::Failed(message) => { /* render the message only */ }
//!     AggregateStatus::Loading => unreachable!(),
//! }
//! ```

use super::client::ResourceWatch;
use async_trait::async_trait;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// The two signals an aggregator needs from a member, plus a way to wait on it.
#[async_trait]
pub trait AsyncResource: Send + Sync {
    fn loading(&self) -> bool;
    fn error(&self) -> Option<String>;

    /// Resolves on the member's next change; `false` once it can no longer change.
    async fn changed(&mut self) -> bool;
}

#[async_trait]
impl<T: Clone + Send + Sync> AsyncResource for ResourceWatch<T> {
    fn loading(&self) -> bool {
        ResourceWatch::loading(self)
    }

    fn error(&self) -> Option<String> {
        ResourceWatch::error(self)
    }

    async fn changed(&mut self) -> bool {
        ResourceWatch::changed(self).await
    }
}

/// Combined signal of all members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateState {
    pub loading: bool,
    pub error: Option<String>,
}

/// What the page should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateStatus {
    Loading,
    Failed(String),
    Ready,
}

impl AggregateState {
    /// Loading wins over error: the loading view shows until every member is done.
    pub fn status(&self) -> AggregateStatus {
        match (&self.loading, &self.error) {
            (true, _) => AggregateStatus::Loading,
            (false, Some(message)) => AggregateStatus::Failed(message.clone()),
            (false, None) => AggregateStatus::Ready,
        }
    }
}

/// How member states are folded into one [`AggregateState`].
pub trait FoldStrategy {
    fn fold(members: &[Box<dyn AsyncResource>]) -> AggregateState;
}

/// Loading while any member loads; the first error in declaration order wins.
///
/// A single failing member turns the whole aggregate into an error, even if
/// every other member has data. Pages do not attempt partial rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllOrFirstError;

impl FoldStrategy for AllOrFirstError {
    fn fold(members: &[Box<dyn AsyncResource>]) -> AggregateState {
        members
            .iter()
            .fold(AggregateState::default(), |mut acc, member| {
                acc.loading |= member.loading();
                if acc.error.is_none() {
                    acc.error = member.error();
                }
                acc
            })
    }
}

/// A fixed, ordered list of resources viewed as one.
pub struct Aggregator<S: FoldStrategy = AllOrFirstError> {
    labels: Vec<&'static str>,
    members: Vec<Box<dyn AsyncResource>>,
    _strategy: PhantomData<fn() -> S>,
}

impl Aggregator<AllOrFirstError> {
    pub fn new() -> Self {
        Self::with_strategy()
    }
}

impl Default for Aggregator<AllOrFirstError> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FoldStrategy> Aggregator<S> {
    pub fn with_strategy() -> Self {
        Self {
            labels: Vec::new(),
            members: Vec::new(),
            _strategy: PhantomData,
        }
    }

    /// Appends a member. Declaration order decides which error is reported first.
    pub fn with_member(mut self, label: &'static str, member: impl AsyncResource + 'static) -> Self {
        self.labels.push(label);
        self.members.push(Box::new(member));
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn state(&self) -> AggregateState {
        S::fold(&self.members)
    }

    pub fn status(&self) -> AggregateStatus {
        self.state().status()
    }

    /// Waits until no member is loading.
    ///
    /// Waiting on whichever member still loads is enough: the aggregate can only
    /// leave `loading` once that member has. If a member goes away while still
    /// loading, the current (loading) state is returned instead of waiting forever.
    pub async fn settled(&mut self) -> AggregateState {
        loop {
            let state = self.state();
            if !state.loading {
                return state;
            }

            let Some(index) = self.members.iter().position(|m| m.loading()) else {
                return state;
            };
            let label = self.labels[index];
            debug!(resource = label, "Waiting for resource");
            if !self.members[index].changed().await {
                warn!(resource = label, "Resource closed while loading");
                return self.state();
            }
        }
    }
}
