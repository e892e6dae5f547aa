//! # Mock Network
//!
//! [`MockFetcher`] stands in for the HTTP layer in tests. It implements both
//! [`Fetcher`] and [`Submitter`], counts calls per URL, and replays scripted
//! replies.
//!
//! ## Scripting replies
//!
//! ```ignore
//! let mock = MockFetcher::new();
//! mock.expect_get("/api/Projects").return_ok(json!([]));
//! mock.expect_get("/api/Skills").return_err(FetchError::Transport("network down".into()));
//! let pending = mock.expect_get("/api/AboutMe").return_pending();
//! mock.always_get("/api/AboutMe").return_ok(json!([]));
//!
//! let fetcher: Arc<dyn Fetcher> = Arc::new(mock.clone());
//! // ... spawn resources with `fetcher` ...
//!
//! pending.resolve_ok(json!([{ "text": "hi" }]));
//! mock.verify(); // every queued reply was consumed
//! ```
//!
//! Replies queued with `expect_get` are consumed in order, per URL. A URL with
//! no queued reply falls back to its `always_get` reply; with neither, the
//! request fails with a transport error naming the URL.
//!
//! ## Delayed responses
//!
//! `return_pending` hands back a [`PendingReply`]. The request stays in flight
//! until the test resolves it, which makes cancellation races deterministic:
//! tear the resource down first, resolve afterwards, then assert nothing moved.

use super::core::{Fetcher, Submitter};
use super::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{oneshot, Notify};

type Reply = Result<Value, FetchError>;

enum Scripted {
    Ready(Reply),
    Pending(oneshot::Receiver<Reply>),
}

#[derive(Default)]
struct Script {
    queued: HashMap<String, VecDeque<Scripted>>,
    repeating: HashMap<String, Reply>,
    submissions: VecDeque<Result<u16, FetchError>>,
    calls: HashMap<String, usize>,
    posted: Vec<(String, Value)>,
}

impl Script {
    fn next_reply(&mut self, url: &str) -> Option<Scripted> {
        if let Some(reply) = self.queued.get_mut(url).and_then(VecDeque::pop_front) {
            return Some(reply);
        }
        self.repeating.get(url).cloned().map(Scripted::Ready)
    }
}

/// In-memory network with per-URL scripted replies.
#[derive(Clone, Default)]
pub struct MockFetcher {
    script: Arc<Mutex<Script>>,
    calls_changed: Arc<Notify>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one reply for the next GET of `url`.
    pub fn expect_get(&self, url: impl Into<String>) -> GetExpectationBuilder {
        GetExpectationBuilder {
            url: url.into(),
            script: self.script.clone(),
        }
    }

    /// Sets the reply used for every GET of `url` once its queue is empty.
    pub fn always_get(&self, url: impl Into<String>) -> RepeatingExpectationBuilder {
        RepeatingExpectationBuilder {
            url: url.into(),
            script: self.script.clone(),
        }
    }

    /// Queues one reply for the next POST, whatever its URL.
    pub fn expect_post(&self) -> PostExpectationBuilder {
        PostExpectationBuilder {
            script: self.script.clone(),
        }
    }

    /// Number of GETs issued against `url` so far.
    pub fn calls(&self, url: &str) -> usize {
        self.lock().calls.get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Bodies POSTed so far, with their URLs.
    pub fn posted(&self) -> Vec<(String, Value)> {
        self.lock().posted.clone()
    }

    /// Waits until `url` has been requested at least `count` times.
    pub async fn wait_for_calls(&self, url: &str, count: usize) {
        loop {
            let notified = self.calls_changed.notified();
            if self.calls(url) >= count {
                return;
            }
            notified.await;
        }
    }

    /// Panics if a queued reply was never consumed.
    pub fn verify(&self) {
        let script = self.lock();
        let remaining: usize = script.queued.values().map(VecDeque::len).sum::<usize>()
            + script.submissions.len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().expect("mock script poisoned")
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get(&self, url: &str) -> Result<Value, FetchError> {
        let reply = {
            let mut script = self.lock();
            *script.calls.entry(url.to_string()).or_default() += 1;
            script.next_reply(url)
        };
        self.calls_changed.notify_waiters();

        match reply {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Pending(rx)) => rx.await.unwrap_or(Err(FetchError::Cancelled)),
            None => Err(FetchError::Transport(format!("no reply scripted for {url}"))),
        }
    }
}

#[async_trait]
impl Submitter for MockFetcher {
    async fn post(&self, url: &str, body: Value) -> Result<u16, FetchError> {
        let mut script = self.lock();
        script.posted.push((url.to_string(), body));
        script
            .submissions
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("no reply scripted for {url}"))))
    }
}

/// Builder for one queued GET reply.
pub struct GetExpectationBuilder {
    url: String,
    script: Arc<Mutex<Script>>,
}

impl GetExpectationBuilder {
    pub fn return_ok(self, body: Value) {
        self.push(Scripted::Ready(Ok(body)));
    }

    pub fn return_err(self, error: FetchError) {
        self.push(Scripted::Ready(Err(error)));
    }

    /// The request stays in flight until the returned handle is resolved.
    pub fn return_pending(self) -> PendingReply {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Pending(rx));
        PendingReply { tx }
    }

    fn push(self, reply: Scripted) {
        let mut script = self.script.lock().expect("mock script poisoned");
        script.queued.entry(self.url).or_default().push_back(reply);
    }
}

/// Builder for the fallback GET reply of a URL.
pub struct RepeatingExpectationBuilder {
    url: String,
    script: Arc<Mutex<Script>>,
}

impl RepeatingExpectationBuilder {
    pub fn return_ok(self, body: Value) {
        self.set(Ok(body));
    }

    pub fn return_err(self, error: FetchError) {
        self.set(Err(error));
    }

    fn set(self, reply: Reply) {
        let mut script = self.script.lock().expect("mock script poisoned");
        script.repeating.insert(self.url, reply);
    }
}

/// Builder for one queued POST reply.
pub struct PostExpectationBuilder {
    script: Arc<Mutex<Script>>,
}

impl PostExpectationBuilder {
    pub fn return_status(self, status: u16) {
        self.push(Ok(status));
    }

    pub fn return_err(self, error: FetchError) {
        self.push(Err(error));
    }

    fn push(self, reply: Result<u16, FetchError>) {
        let mut script = self.script.lock().expect("mock script poisoned");
        script.submissions.push_back(reply);
    }
}

/// A reply the test delivers by hand.
pub struct PendingReply {
    tx: oneshot::Sender<Reply>,
}

impl PendingReply {
    /// `false` if the request was already cancelled.
    pub fn resolve_ok(self, body: Value) -> bool {
        self.tx.send(Ok(body)).is_ok()
    }

    /// `false` if the request was already cancelled.
    pub fn resolve_err(self, error: FetchError) -> bool {
        self.tx.send(Err(error)).is_ok()
    }
}
