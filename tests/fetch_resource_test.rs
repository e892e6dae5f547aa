use portfolio_fetch::framework::mock::MockFetcher;
use portfolio_fetch::framework::{
    AggregateState, AggregateStatus, Aggregator, FetchError, Fetcher, FrameworkError, OnSuccess,
    Phase, ResourceProps,
};
use portfolio_fetch::framework::spawn_resource;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn fetcher(mock: &MockFetcher) -> Arc<dyn Fetcher> {
    Arc::new(mock.clone())
}

async fn let_tasks_run() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Same props re-rendered many times: exactly one request.
#[tokio::test]
async fn test_rerender_with_same_identity_fetches_once() {
    let mock = MockFetcher::new();
    mock.always_get("/api/Projects").return_ok(json!([{ "title": "Weather App" }]));

    let props = ResourceProps::<Value>::new("/api/Projects");
    let client = spawn_resource(fetcher(&mock), props.clone());
    client.settled().await;

    for _ in 0..10 {
        client.render(props.clone()).await.expect("render failed");
    }

    let state = client.state();
    assert_eq!(mock.calls("/api/Projects"), 1);
    assert_eq!(state.data, Some(json!([{ "title": "Weather App" }])));
    assert!(state.has_executed());
}

/// Teardown wins over a response that arrives afterwards.
#[tokio::test]
async fn test_teardown_before_resolve_leaves_state_untouched() {
    let mock = MockFetcher::new();
    let pending = mock.expect_get("/api/AboutMe").return_pending();

    let client = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/api/AboutMe"));
    mock.wait_for_calls("/api/AboutMe", 1).await;
    let before = client.state();
    assert!(before.loading);

    client.teardown().await.expect("teardown failed");
    let _ = pending.resolve_ok(json!([{ "text": "too late" }]));
    let_tasks_run().await;

    assert_eq!(client.state(), before);
    assert_eq!(client.state().data, None);
    assert_eq!(
        client.render(ResourceProps::new("/api/AboutMe")).await,
        Err(FrameworkError::ActorClosed)
    );
    assert!(client.is_closed());
}

/// A failed resource is not retried by re-rendering, but toggling `enabled` retries once.
#[tokio::test]
async fn test_retry_after_failure_via_enable_toggle() {
    let mock = MockFetcher::new();
    mock.expect_get("/api/Skills")
        .return_err(FetchError::Transport("network down".into()));
    mock.expect_get("/api/Skills").return_ok(json!({ "value": 1 }));

    let client = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/api/Skills"));
    let state = client.settled().await;
    assert_eq!(state.error.as_deref(), Some("network down"));
    assert_eq!(state.phase, Phase::Failed);

    client.render(ResourceProps::new("/api/Skills")).await.unwrap();
    assert_eq!(mock.calls("/api/Skills"), 1);

    client.set_enabled(false).await.unwrap();
    client.set_enabled(true).await.unwrap();
    let state = client.settled().await;

    assert_eq!(mock.calls("/api/Skills"), 2);
    assert_eq!(state.data, Some(json!({ "value": 1 })));
    assert_eq!(state.error, None);
    mock.verify();
}

/// A failed resource pointed at another endpoint retries exactly once there.
#[tokio::test]
async fn test_retry_after_failure_via_identity_change() {
    let mock = MockFetcher::new();
    mock.expect_get("/a")
        .return_err(FetchError::Transport("network down".into()));
    mock.expect_get("/b").return_ok(json!({ "value": 2 }));

    let client = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/a"));
    assert_eq!(client.settled().await.phase, Phase::Failed);

    client.set_endpoint("/b").await.unwrap();
    let state = client.settled().await;

    assert_eq!(mock.calls("/a"), 1);
    assert_eq!(mock.calls("/b"), 1);
    assert_eq!(state.data, Some(json!({ "value": 2 })));
    assert_eq!(state.error, None);
    assert_eq!(state.phase, Phase::Succeeded);
    mock.verify();
}

/// The callback fires once per activation, even when replaced on every render.
#[tokio::test]
async fn test_success_callback_once_per_activation() {
    let mock = MockFetcher::new();
    mock.always_get("/api/Experiences").return_ok(json!([]));
    let fired = Arc::new(AtomicUsize::new(0));

    let props = || {
        let fired = fired.clone();
        ResourceProps::<Value>::new("/api/Experiences").on_success(OnSuccess::new(move |_| {
            fired.fetch_add(1, Ordering::SeqCst);
        }))
    };

    let client = spawn_resource(fetcher(&mock), props());
    client.settled().await;
    for _ in 0..3 {
        client.render(props()).await.unwrap();
    }
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    client.render(props().enabled(false)).await.unwrap();
    client.render(props()).await.unwrap();
    client.settled().await;
    assert_eq!(fired.load(Ordering::SeqCst), 2);
    assert_eq!(mock.calls("/api/Experiences"), 2);
}

/// A loads, B fails: the aggregate goes loading -> loading -> error.
#[tokio::test]
async fn test_two_resources_one_failing() {
    let mock = MockFetcher::new();
    mock.expect_get("/a").return_ok(json!({ "value": 1 }));
    let b_reply = mock.expect_get("/b").return_pending();

    let a = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/a"));
    let b = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/b"));
    let mut page = Aggregator::new()
        .with_member("a", a.watch())
        .with_member("b", b.watch());

    assert!(page.state().loading);

    a.settled().await;
    mock.wait_for_calls("/b", 1).await;
    assert_eq!(
        page.state(),
        AggregateState {
            loading: true,
            error: None
        }
    );

    assert!(b_reply.resolve_err(FetchError::Transport("network down".into())));
    let state = page.settled().await;

    assert_eq!(
        state,
        AggregateState {
            loading: false,
            error: Some("network down".into())
        }
    );
    assert_eq!(page.status(), AggregateStatus::Failed("network down".into()));
    assert_eq!(a.state().data, Some(json!({ "value": 1 })));
    assert_eq!(b.state().data, None);
}

/// Once settled, same-identity re-renders never bring `loading` back.
#[tokio::test]
async fn test_aggregate_stays_settled_across_rerenders() {
    let mock = MockFetcher::new();
    mock.always_get("/a").return_ok(json!(1));
    mock.always_get("/b").return_ok(json!(2));

    let a = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/a"));
    let b = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/b"));
    let mut page = Aggregator::new()
        .with_member("a", a.watch())
        .with_member("b", b.watch());

    assert_eq!(page.settled().await.status(), AggregateStatus::Ready);

    for _ in 0..5 {
        a.render(ResourceProps::new("/a")).await.unwrap();
        b.render(ResourceProps::new("/b")).await.unwrap();
        assert!(!page.state().loading);
    }
    assert_eq!(mock.total_calls(), 2);
}

/// A disabled member never holds the aggregate in `loading`.
#[tokio::test]
async fn test_disabled_member_does_not_block_the_aggregate() {
    let mock = MockFetcher::new();
    mock.expect_get("/a").return_ok(json!("a"));

    let a = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/a"));
    let off = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/off").enabled(false));
    let mut page = Aggregator::new()
        .with_member("a", a.watch())
        .with_member("off", off.watch());

    assert_eq!(page.settled().await.status(), AggregateStatus::Ready);
    assert_eq!(mock.calls("/off"), 0);
    mock.verify();
}

/// Disabling while in flight aborts the request; nothing it returns is applied.
#[tokio::test]
async fn test_disable_while_in_flight_discards_response() {
    let mock = MockFetcher::new();
    let pending = mock.expect_get("/a").return_pending();

    let client = spawn_resource::<Value>(fetcher(&mock), ResourceProps::new("/a"));
    mock.wait_for_calls("/a", 1).await;

    client.set_enabled(false).await.unwrap();
    let _ = pending.resolve_ok(json!("late"));
    let_tasks_run().await;

    let state = client.state();
    assert_eq!(state.phase, Phase::Disabled);
    assert!(!state.loading);
    assert_eq!(state.data, None);
    assert_eq!(state.error, None);
}
