use portfolio_fetch::config::AppConfig;
use portfolio_fetch::framework::mock::MockFetcher;
use portfolio_fetch::framework::FetchError;
use portfolio_fetch::lifecycle::{
    HomePage, PageView, ABOUT_ME_PATH, ACCOUNT_SETTINGS_PATH, EXPERIENCES_PATH, PROJECTS_PATH,
    SKILLS_PATH,
};
use portfolio_fetch::model::DEFAULT_TYPEWRITER_WORDS;
use serde_json::json;
use std::sync::Arc;

const BASE: &str = "http://backend.test";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn config() -> AppConfig {
    AppConfig::new(BASE).expect("valid base url")
}

/// Scripts a healthy backend for every source except those in `skip`.
fn healthy_backend(mock: &MockFetcher, skip: &[&str]) {
    let replies = [
        (
            ACCOUNT_SETTINGS_PATH,
            json!([{
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "github": "https://github.com/ada",
                "typewriterWords": "Engineer, Analyst"
            }]),
        ),
        (
            ABOUT_ME_PATH,
            json!([{ "text": "I like engines.", "logo": "/ada.png" }]),
        ),
        (
            EXPERIENCES_PATH,
            json!([{ "_id": "1", "company": "Analytical Engines", "role": "Programmer" }]),
        ),
        (
            PROJECTS_PATH,
            json!([
                { "title": "Note G", "githubLink": "https://github.com/ada/note-g" },
                { "title": "Weather App" }
            ]),
        ),
        (
            SKILLS_PATH,
            json!([
                { "name": "Rust", "category": "Languages", "iconName": "FaRust" },
                { "name": "Docker", "category": "Developer Tools", "iconName": "FaDocker" },
                { "name": "Chess", "category": "Hobbies" }
            ]),
        ),
    ];
    for (path, body) in replies {
        if !skip.contains(&path) {
            mock.always_get(url(path)).return_ok(body);
        }
    }
}

#[tokio::test]
async fn test_full_page_mount_is_ready() {
    let mock = MockFetcher::new();
    healthy_backend(&mock, &[]);

    let page = HomePage::mount(&config(), Arc::new(mock.clone()));
    let view = page.settled().await;

    let PageView::Ready(content) = &view else {
        panic!("expected ready page, got {view:?}");
    };
    let account = content.account.clone().expect("account settings");
    assert_eq!(account.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(content.typewriter_words(), vec!["Engineer", "Analyst"]);
    assert_eq!(
        content.about.as_ref().and_then(|a| a.text.as_deref()),
        Some("I like engines.")
    );
    assert_eq!(content.experiences.len(), 1);
    assert_eq!(content.projects.len(), 2);
    assert_eq!(content.skills.languages.len(), 1);
    assert_eq!(content.skills.tools.len(), 1);
    assert_eq!(content.skills.len(), 2);

    // Re-rendering with the mount-time transforms never refetches.
    page.rerender().await.expect("rerender failed");
    page.rerender().await.expect("rerender failed");
    assert_eq!(mock.total_calls(), 5);
    assert!(matches!(page.view(), PageView::Ready(_)));

    page.unmount().await.expect("unmount failed");
}

#[tokio::test]
async fn test_one_failing_source_fails_the_page() {
    let mock = MockFetcher::new();
    healthy_backend(&mock, &[SKILLS_PATH]);
    mock.always_get(url(SKILLS_PATH)).return_err(FetchError::Status(500));

    let page = HomePage::mount(&config(), Arc::new(mock.clone()));
    assert_eq!(
        page.settled().await,
        PageView::Error("Request failed with status code 500".into())
    );
    page.unmount().await.expect("unmount failed");
}

#[tokio::test]
async fn test_first_failing_source_in_page_order_is_reported() {
    let mock = MockFetcher::new();
    healthy_backend(&mock, &[ACCOUNT_SETTINGS_PATH, PROJECTS_PATH]);
    mock.always_get(url(PROJECTS_PATH))
        .return_err(FetchError::Transport("projects down".into()));
    mock.always_get(url(ACCOUNT_SETTINGS_PATH))
        .return_err(FetchError::Transport("settings down".into()));

    let page = HomePage::mount(&config(), Arc::new(mock.clone()));
    assert_eq!(page.settled().await, PageView::Error("settings down".into()));
}

#[tokio::test]
async fn test_empty_singletons_fall_back_to_defaults() {
    let mock = MockFetcher::new();
    healthy_backend(&mock, &[ACCOUNT_SETTINGS_PATH, ABOUT_ME_PATH]);
    mock.always_get(url(ACCOUNT_SETTINGS_PATH)).return_ok(json!([]));
    mock.always_get(url(ABOUT_ME_PATH)).return_ok(json!([]));

    let page = HomePage::mount(&config(), Arc::new(mock.clone()));
    let PageView::Ready(content) = page.settled().await else {
        panic!("expected ready page");
    };
    assert_eq!(content.account, None);
    assert_eq!(content.about, None);
    assert_eq!(content.typewriter_words(), DEFAULT_TYPEWRITER_WORDS);
}

#[tokio::test]
async fn test_unmount_while_loading() {
    let mock = MockFetcher::new();
    healthy_backend(&mock, &[SKILLS_PATH]);
    let skills = mock.expect_get(url(SKILLS_PATH)).return_pending();

    let page = HomePage::mount(&config(), Arc::new(mock.clone()));
    mock.wait_for_calls(&url(SKILLS_PATH), 1).await;
    assert_eq!(page.view(), PageView::Loading);

    page.unmount().await.expect("unmount failed");
    let _ = skills.resolve_ok(json!([]));
}
