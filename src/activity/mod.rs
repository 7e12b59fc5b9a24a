//! Activity aggregation
//!
//! Reduces the public event feed and the repository listing of one owner to
//! the handful of counts and scores the stat engine consumes. Every fetch
//! degrades to an empty value on failure so a flaky API never aborts a run.

pub mod quality;

use crate::config::Config;
use crate::errors::ErrorRecovery;
use crate::github::models::{LanguageBytes, RepoCommit};
use crate::github::{fetch, fetch_paginated, Event, GitHubApi, Pagination, Repository};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use quality::{CommitQuality, IssueActivity, LanguageProfile};

/// Everything the aggregator learned about an owner in one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub daily_commits: u32,
    pub daily_prs: u32,
    pub total_stars: u64,
    pub total_forks: u64,
    pub own_repos: usize,
    pub fork_repos: usize,
    pub languages: LanguageProfile,
    pub avg_repo_quality: f64,
    pub commit_quality: CommitQuality,
    pub issues: IssueActivity,
    /// Every repository listed, forks included
    #[serde(skip)]
    pub repos: Vec<Repository>,
}

/// `GET /users/{owner}/events/public`, at most `event_pages` pages
pub async fn fetch_events<A: GitHubApi + ?Sized>(api: &A, config: &Config, owner: &str) -> Vec<Event> {
    fetch_paginated(
        api,
        &format!("/users/{owner}/events/public"),
        &[],
        Pagination {
            per_page: config.event_page_size,
            max_pages: config.event_pages,
        },
    )
    .await
}

/// `GET /users/{owner}/repos`, most recently pushed first
pub async fn fetch_repos<A: GitHubApi + ?Sized>(
    api: &A,
    config: &Config,
    owner: &str,
) -> Vec<Repository> {
    fetch_paginated(
        api,
        &format!("/users/{owner}/repos"),
        &[("sort", "pushed".to_string())],
        Pagination {
            per_page: config.repo_page_size,
            max_pages: config.repo_max_pages,
        },
    )
    .await
}

/// Byte totals per language across the first `language_sample` own repos
async fn sample_languages<A: GitHubApi + ?Sized>(
    api: &A,
    config: &Config,
    own: &[&Repository],
) -> LanguageBytes {
    let mut totals = LanguageBytes::new();
    for repo in own.iter().take(config.language_sample) {
        let path = format!("/repos/{}/languages", repo.full_name);
        let languages = ErrorRecovery::or_empty(fetch(api, &path, &[]).await, &path);
        quality::merge_languages(&mut totals, languages);
    }
    totals
}

/// Commits authored by `owner` in the last 24 hours, read straight from the
/// most recently pushed repositories.
async fn fallback_commits<A: GitHubApi + ?Sized>(
    api: &A,
    config: &Config,
    owner: &str,
    own: &[&Repository],
    now: DateTime<Utc>,
) -> Vec<RepoCommit> {
    let since = (now - Duration::days(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut commits = Vec::new();

    for repo in own.iter().take(config.commit_fallback_repos) {
        let path = format!("/repos/{}/commits", repo.full_name);
        let query = [
            ("author", owner.to_string()),
            ("since", since.clone()),
            ("per_page", "100".to_string()),
        ];
        let batch: Vec<RepoCommit> = ErrorRecovery::or_empty(fetch(api, &path, &query).await, &path);
        if !batch.is_empty() {
            debug!("{} commits in {} since {}", batch.len(), repo.full_name, since);
        }
        commits.extend(batch);
    }

    commits
}

/// Collect and reduce one owner's activity as seen at `now`
pub async fn collect<A: GitHubApi + ?Sized>(
    api: &A,
    config: &Config,
    owner: &str,
    now: DateTime<Utc>,
) -> ActivitySummary {
    let events = fetch_events(api, config, owner).await;
    let repos = fetch_repos(api, config, owner).await;
    info!(
        "Fetched {} events and {} repositories for {}",
        events.len(),
        repos.len(),
        owner
    );

    let own: Vec<&Repository> = repos.iter().filter(|repo| !repo.fork).collect();
    let fork_repos = repos.len() - own.len();

    let mut recent = quality::recent_activity(&events, now);
    if recent.commits == 0 && !own.is_empty() {
        debug!("No push events in the last day, querying commits directly");
        let commits = fallback_commits(api, config, owner, &own, now).await;
        recent.commits = commits.len() as u32;
        recent.messages = commits.into_iter().map(|c| c.commit.message).collect();
    }

    let totals = sample_languages(api, config, &own).await;
    let total_stars = own.iter().map(|repo| repo.stargazers_count).sum();
    let total_forks = own.iter().map(|repo| repo.forks_count).sum();
    let own_repos = own.len();
    let avg_repo_quality = quality::average_repo_quality(&own);

    let summary = ActivitySummary {
        daily_commits: recent.commits,
        daily_prs: recent.prs,
        total_stars,
        total_forks,
        own_repos,
        fork_repos,
        languages: quality::language_profile(&totals),
        avg_repo_quality,
        commit_quality: quality::commit_quality(&recent.messages),
        issues: quality::issue_activity(&events),
        repos,
    };

    info!(
        "Activity: {} commits, {} PRs, {} stars, dominant language {}",
        summary.daily_commits, summary.daily_prs, summary.total_stars, summary.languages.dominant
    );
    summary
}
