//! Activity aggregator against an in-memory GitHub.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use codey::activity;
use codey::engine::{self, DailyActivity};
use codey::github::client::Query;
use codey::github::{GitHubApi, UserProfile};
use codey::state::PetState;
use codey::{CodeyError, Config, Result};

/// Serves canned JSON by path; listings only have a first page
#[derive(Default)]
struct FakeGitHub {
    routes: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl FakeGitHub {
    fn route(mut self, path: &str, body: Value) -> Self {
        self.routes.insert(path.to_string(), body);
        self
    }

    fn called(&self, path: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|p| p == path)
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn get_json(&self, path: &str, query: &Query<'_>) -> Result<Value> {
        self.calls.lock().unwrap().push(path.to_string());

        let page = query
            .iter()
            .find(|(key, _)| *key == "page")
            .map(|(_, value)| value.as_str());
        if matches!(page, Some(p) if p != "1") {
            return Ok(json!([]));
        }

        self.routes.get(path).cloned().ok_or_else(|| CodeyError::ApiError {
            status: 404,
            url: Arc::new(path.to_string()),
            body: Arc::new("Not Found".to_string()),
        })
    }

    async fn graphql(&self, _query: &str, _variables: Value) -> Result<Value> {
        Err(CodeyError::network("GraphQL is not used by the aggregator"))
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

fn hours_ago(hours: i64) -> String {
    (now() - Duration::hours(hours)).to_rfc3339()
}

fn config() -> Config {
    Config {
        token: "test-token".into(),
        ..Config::default()
    }
}

fn repos() -> Value {
    json!([
        {
            "name": "a", "full_name": "octocat/a", "fork": false,
            "description": "A parser", "license": { "key": "mit", "name": "MIT" },
            "open_issues_count": 0, "stargazers_count": 5, "forks_count": 1, "language": "Rust"
        },
        {
            "name": "b", "full_name": "octocat/b", "fork": false,
            "description": null, "license": null,
            "open_issues_count": 0, "stargazers_count": 0, "forks_count": 0, "language": "Python"
        },
        {
            "name": "c", "full_name": "octocat/c", "fork": true,
            "description": "upstream", "license": null,
            "open_issues_count": 0, "stargazers_count": 2, "forks_count": 0, "language": "Go"
        }
    ])
}

fn events() -> Value {
    json!([
        {
            "type": "PushEvent", "created_at": hours_ago(2),
            "payload": { "commits": [
                { "sha": "1", "message": "Add parser for config files" },
                { "sha": "2", "message": "fix" }
            ]}
        },
        {
            "type": "PullRequestEvent", "created_at": hours_ago(3),
            "payload": { "action": "closed", "pull_request": { "merged": true } }
        },
        {
            "type": "IssuesEvent", "created_at": hours_ago(5),
            "payload": { "action": "opened", "issue": { "title": "Bug in parser" } }
        },
        {
            "type": "IssuesEvent", "created_at": hours_ago(4),
            "payload": { "action": "closed", "issue": { "title": "Bug in parser" } }
        },
        {
            "type": "PushEvent", "created_at": hours_ago(72),
            "payload": { "commits": [{ "sha": "0", "message": "old work" }] }
        }
    ])
}

// ==================== Aggregation ====================

#[tokio::test]
async fn test_collect_reduces_events_and_repos() {
    let api = FakeGitHub::default()
        .route("/users/octocat/events/public", events())
        .route("/users/octocat/repos", repos())
        .route("/repos/octocat/a/languages", json!({ "Rust": 1000, "Shell": 10 }))
        .route("/repos/octocat/b/languages", json!({ "Python": 500 }));

    let summary = activity::collect(&api, &config(), "octocat", now()).await;

    assert_eq!(summary.daily_commits, 2);
    assert_eq!(summary.daily_prs, 1);
    assert_eq!(summary.total_stars, 5);
    assert_eq!(summary.total_forks, 1);
    assert_eq!(summary.own_repos, 2);
    assert_eq!(summary.fork_repos, 1);
    assert_eq!(summary.repos.len(), 3);

    assert_eq!(summary.languages.dominant, "Rust");
    assert_eq!(summary.languages.distinct, 3);
    assert_eq!(summary.languages.diversity_penalty, 1.0);
    assert!((summary.avg_repo_quality - 0.75).abs() < 1e-9);

    assert!((summary.commit_quality.score - 0.85).abs() < 1e-9);
    assert_eq!(
        summary.commit_quality.penalties,
        vec!["lazy_messages".to_string(), "short_messages".to_string()]
    );

    assert_eq!(summary.issues.opened, 1);
    assert_eq!(summary.issues.closed, 1);
    assert!((summary.issues.score - 1.35).abs() < 1e-9);

    // the fork is never sampled for languages, and push events made the fallback unnecessary
    assert!(!api.called("/repos/octocat/c/languages"));
    assert!(!api.called("/repos/octocat/a/commits"));
}

#[tokio::test]
async fn test_commit_fallback_when_feed_has_no_pushes() {
    let api = FakeGitHub::default()
        .route("/users/octocat/events/public", json!([]))
        .route("/users/octocat/repos", repos())
        .route(
            "/repos/octocat/a/commits",
            json!([
                { "sha": "x", "commit": { "message": "Implement streaming decoder\n\nDetails" } },
                { "sha": "y", "commit": { "message": "Document the decoder API" } },
                { "sha": "z", "commit": { "message": "Add decoder benchmarks" } }
            ]),
        );

    let summary = activity::collect(&api, &config(), "octocat", now()).await;

    assert_eq!(summary.daily_commits, 3);
    assert_eq!(summary.commit_quality.score, 1.0);
    assert!(api.called("/repos/octocat/a/commits"));
    assert!(api.called("/repos/octocat/b/commits"));
    assert!(!api.called("/repos/octocat/c/commits"));
}

#[test]
fn test_every_source_failing_degrades_to_defaults() {
    let api = FakeGitHub::default();

    let summary = tokio_test::block_on(activity::collect(&api, &config(), "ghost", now()));

    assert_eq!(summary.daily_commits, 0);
    assert_eq!(summary.daily_prs, 0);
    assert_eq!(summary.total_stars, 0);
    assert_eq!(summary.languages.dominant, "unknown");
    assert_eq!(summary.avg_repo_quality, 0.0);
    assert_eq!(summary.issues.score, 1.0);
}

// ==================== Aggregation into the engine ====================

#[tokio::test]
async fn test_collected_summary_feeds_an_update() {
    let api = FakeGitHub::default()
        .route("/users/octocat/events/public", events())
        .route("/users/octocat/repos", repos())
        .route("/repos/octocat/a/languages", json!({ "Rust": 1000 }));
    let config = config();
    let user = UserProfile {
        login: "octocat".into(),
        followers: 4,
        following: 1,
        public_repos: 3,
        created_at: Some("2018-01-01T00:00:00Z".into()),
    };

    let summary = activity::collect(&api, &config, "octocat", now()).await;
    let daily = DailyActivity::for_day(
        summary.daily_commits,
        summary.daily_prs,
        now(),
        config.balance.weekend_bonus,
    );
    let mut state = PetState::default();
    engine::update(&mut state, &daily, &summary, &user, &config.balance, now());

    let stats = &state.brutal_stats;
    assert_eq!(stats.dominant_language, "Rust");
    assert_eq!(stats.total_stars, 5);
    assert_eq!(stats.issues_closed, 1);
    assert_eq!(stats.social_penalties, vec!["quality_curator".to_string()]);
    assert!(stats.social_score > 1.2);
    assert_eq!(state.total_commits, 2);
    assert_eq!(state.streak, 1);
}
