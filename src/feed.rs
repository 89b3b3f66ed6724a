use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::config::RuntimeConfig;
use crate::reveal::{use_viewport_animator, RevealTarget, CARD_SELECTOR};

pub const FAILURE_MESSAGE: &str = "Failed to load projects from GitHub. Please try again later.";
const MISSING_DESCRIPTION: &str = "No description provided.";
const MISSING_LANGUAGE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub updated_at: DateTime<Utc>,
}

impl RepositoryRecord {
    pub fn description_text(&self) -> &str {
        non_empty(self.description.as_deref()).unwrap_or(MISSING_DESCRIPTION)
    }

    pub fn language_text(&self) -> &str {
        non_empty(self.language.as_deref()).unwrap_or(MISSING_LANGUAGE)
    }

    pub fn card_id(&self) -> String {
        format!("project-{}", self.name)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("http {0}")]
    Status(u16),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("repository listing is only fetched in the browser")]
    Unsupported,
}

/// Newest first; ties keep their feed order.
pub fn sort_by_recency(records: &mut [RepositoryRecord]) {
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeedState {
    Loading,
    Loaded(Vec<RepositoryRecord>),
    Failed,
}

impl FeedState {
    pub fn from_result(result: Result<Vec<RepositoryRecord>, FeedError>) -> Self {
        match result {
            Ok(mut records) => {
                sort_by_recency(&mut records);
                tracing::debug!("feed: loaded {} repositories", records.len());
                FeedState::Loaded(records)
            }
            Err(err) => {
                tracing::error!("feed: failed to load projects: {err}");
                FeedState::Failed
            }
        }
    }

    pub fn cards(&self) -> &[RepositoryRecord] {
        match self {
            FeedState::Loaded(records) => records,
            _ => &[],
        }
    }

    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            FeedState::Failed => Some(FAILURE_MESSAGE),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn fetch_repositories(url: &str) -> Result<Vec<RepositoryRecord>, FeedError> {
    let response = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|err| FeedError::Request(err.to_string()))?;
    if !response.ok() {
        return Err(FeedError::Status(response.status()));
    }
    response
        .json::<Vec<RepositoryRecord>>()
        .await
        .map_err(|err| FeedError::Decode(err.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_repositories(_url: &str) -> Result<Vec<RepositoryRecord>, FeedError> {
    Err(FeedError::Unsupported)
}

#[component]
pub fn ProjectFeed() -> Element {
    let config = use_context::<RuntimeConfig>();
    let mut animator = use_viewport_animator();
    let mut state = use_signal(|| FeedState::Loading);
    let mut started = use_signal(|| false);
    let mut cards_registered = use_signal(|| false);

    use_effect(move || {
        if started() {
            return;
        }
        started.set(true);
        let url = config.repos_api_url.clone();
        spawn(async move {
            let result = fetch_repositories(&url).await;
            state.set(FeedState::from_result(result));
        });
    });

    use_effect(move || {
        if !matches!(*state.read(), FeedState::Loaded(_)) || cards_registered() {
            return;
        }
        cards_registered.set(true);
        animator.observe_all(CARD_SELECTOR, RevealTarget::Card);
    });

    let current = state();
    rsx! {
        div { id: "project-list", class: "project-list",
            if matches!(current, FeedState::Loading) {
                p { class: "feed-status", "Loading projects..." }
            }
            if let Some(message) = current.failure_message() {
                p { class: "feed-status feed-error", "{message}" }
            }
            for repo in current.cards() {
                ProjectCard { key: "{repo.name}", repo: repo.clone(), visible_class: animator.class_for("project", &repo.card_id()) }
            }
        }
    }
}

#[component]
fn ProjectCard(repo: RepositoryRecord, visible_class: String) -> Element {
    let description = repo.description_text().to_string();
    let language = repo.language_text().to_string();
    rsx! {
        div { id: "{repo.card_id()}", class: "{visible_class}",
            h3 {
                a { href: "{repo.html_url}", target: "_blank", rel: "noopener noreferrer", "{repo.name}" }
            }
            hr {}
            p { "{description}" }
            ul {
                li { strong { "Language:" } " {language}" }
                li { strong { i { class: "fas fa-star" } " Stars:" } " {repo.stargazers_count}" }
                li { strong { i { class: "fas fa-eye" } " Watchers:" } " {repo.watchers_count}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str, updated_at: &str) -> RepositoryRecord {
        RepositoryRecord {
            name: name.to_string(),
            html_url: format!("https://github.com/pennyw1ze/{name}"),
            description: Some(format!("{name} description")),
            language: Some("Rust".to_string()),
            stargazers_count: 1,
            watchers_count: 1,
            updated_at: updated_at.parse().unwrap(),
        }
    }

    fn names(records: &[RepositoryRecord]) -> Vec<&str> {
        records.iter().map(|record| record.name.as_str()).collect()
    }

    #[test]
    fn loaded_feed_is_newest_first() {
        let state = FeedState::from_result(Ok(vec![
            record("old", "2021-03-01T10:00:00Z"),
            record("newest", "2024-06-30T08:15:00Z"),
            record("middle", "2023-01-15T12:00:00Z"),
        ]));
        assert_eq!(names(state.cards()), vec!["newest", "middle", "old"]);
        assert_eq!(state.failure_message(), None);
    }

    #[test]
    fn equal_timestamps_keep_feed_order() {
        let mut records = vec![
            record("first", "2023-01-01T00:00:00Z"),
            record("second", "2023-01-01T00:00:00Z"),
            record("latest", "2023-02-01T00:00:00Z"),
        ];
        sort_by_recency(&mut records);
        assert_eq!(names(&records), vec!["latest", "first", "second"]);
    }

    #[test]
    fn missing_fields_use_fallbacks() {
        let repo: RepositoryRecord = serde_json::from_str(
            r#"{
                "name": "dotfiles",
                "html_url": "https://github.com/pennyw1ze/dotfiles",
                "description": null,
                "language": null,
                "stargazers_count": 3,
                "watchers_count": 2,
                "updated_at": "2024-02-10T18:22:31Z",
                "fork": false
            }"#,
        )
        .unwrap();
        assert_eq!(repo.description_text(), "No description provided.");
        assert_eq!(repo.language_text(), "N/A");
        assert_eq!(repo.card_id(), "project-dotfiles");
    }

    #[test]
    fn empty_description_uses_fallback() {
        let mut repo = record("site", "2024-01-01T00:00:00Z");
        repo.description = Some(String::new());
        assert_eq!(repo.description_text(), "No description provided.");
        assert_eq!(repo.language_text(), "Rust");
    }

    #[test]
    fn failure_renders_single_message_and_no_cards() {
        let state = FeedState::from_result(Err(FeedError::Status(403)));
        assert_eq!(state, FeedState::Failed);
        assert!(state.cards().is_empty());
        assert_eq!(state.failure_message(), Some(FAILURE_MESSAGE));
    }

    #[test]
    fn decode_error_names_cause() {
        let err = FeedError::Decode("expected a sequence".to_string());
        assert_eq!(err.to_string(), "decode failed: expected a sequence");
    }
}
