//! Star report: repository star totals from the GraphQL API
//!
//! Writes a Markdown summary and appends one JSON line per run to a history
//! file. Unlike the daily update, any API failure here is fatal.

use crate::errors::{CodeyError, Result};
use crate::github::models::{StarRepoNode, StarUserData};
use crate::github::GitHubApi;
use crate::render::write_artifact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const REPOSITORIES_QUERY: &str = "query($login: String!, $isFork: Boolean!, $cursor: String) {
  user(login: $login) {
    repositories(first: 100, after: $cursor, privacy: PUBLIC, isFork: $isFork, ownerAffiliations: OWNER) {
      nodes { name stargazerCount isArchived isDisabled isLocked owner { login } }
      pageInfo { hasNextPage endCursor }
    }
  }
}";

const TOP_REPOS: usize = 10;
const DEFAULT_REPO_NAME: &str = "Codey";

/// Every public repository of `login`, forks or non-forks, following the cursor
pub async fn fetch_repositories<A: GitHubApi + ?Sized>(
    api: &A,
    login: &str,
    is_fork: bool,
) -> Result<Vec<StarRepoNode>> {
    let mut repos = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let variables = json!({ "login": login, "isFork": is_fork, "cursor": cursor });
        let data: StarUserData = serde_json::from_value(api.graphql(REPOSITORIES_QUERY, variables).await?)
            .map_err(|e| CodeyError::parse(format!("Unexpected repositories payload: {e}")))?;

        let connection = data
            .user
            .ok_or_else(|| CodeyError::GraphQlError(Arc::new(format!("User '{login}' not found"))))?
            .repositories;
        repos.extend(connection.nodes);

        match connection.page_info.end_cursor {
            Some(next) if connection.page_info.has_next_page => cursor = Some(next),
            _ => break,
        }
    }

    debug!("Fetched {} {} repositories for {}", repos.len(), if is_fork { "forked" } else { "own" }, login);
    Ok(repos)
}

/// Repositories owned by one login, split by availability and sorted by stars
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoGroup {
    pub active: Vec<StarRepoNode>,
    pub archived: Vec<StarRepoNode>,
}

impl RepoGroup {
    /// Keep only repos owned by `login`; archived, disabled and locked ones are set aside
    pub fn split(repos: Vec<StarRepoNode>, login: &str) -> Self {
        let (mut archived, mut active): (Vec<_>, Vec<_>) = repos
            .into_iter()
            .filter(|repo| repo.owner.login == login)
            .partition(StarRepoNode::is_inactive);

        active.sort_by(|a, b| b.stargazer_count.cmp(&a.stargazer_count));
        archived.sort_by(|a, b| b.stargazer_count.cmp(&a.stargazer_count));
        Self { active, archived }
    }

    pub fn active_stars(&self) -> u64 {
        self.active.iter().map(|r| r.stargazer_count).sum()
    }

    pub fn archived_stars(&self) -> u64 {
        self.archived.iter().map(|r| r.stargazer_count).sum()
    }

    pub fn zero_stars(&self) -> usize {
        self.active.iter().filter(|r| r.stargazer_count == 0).count()
    }

    pub fn starred(&self) -> Vec<&StarRepoNode> {
        self.active.iter().filter(|r| r.stargazer_count > 0).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarSummary {
    pub username: String,
    pub repo_name: String,
    pub own: RepoGroup,
    pub fork: RepoGroup,
}

impl StarSummary {
    pub fn new(username: &str, repo_name: Option<&str>, own: Vec<StarRepoNode>, fork: Vec<StarRepoNode>) -> Self {
        Self {
            username: username.to_string(),
            repo_name: repo_name.unwrap_or(DEFAULT_REPO_NAME).to_string(),
            own: RepoGroup::split(own, username),
            fork: RepoGroup::split(fork, username),
        }
    }

    /// Active forks per active own repo, rounded to two decimals
    pub fn fork_ratio(&self) -> f64 {
        let ratio = self.fork.active.len() as f64 / self.own.active.len().max(1) as f64;
        (ratio * 100.0).round() / 100.0
    }

    pub fn own_stars(&self) -> u64 {
        self.own.active_stars() + self.own.archived_stars()
    }

    /// Own stars plus stars on active forks
    pub fn grand_total(&self) -> u64 {
        self.own_stars() + self.fork.active_stars()
    }
}

pub fn fork_ratio_verdict(ratio: f64) -> &'static str {
    if ratio > 5.0 {
        "SPAM FOLLOWER DETECTED"
    } else if ratio > 2.0 {
        "high — lots of forks"
    } else if ratio < 0.5 {
        "low — original builder"
    } else {
        "clean"
    }
}

fn repo_table(out: &mut fmt::Formatter<'_>, repos: &[&StarRepoNode]) -> fmt::Result {
    if repos.is_empty() {
        return writeln!(out, "_None_\n");
    }
    writeln!(out, "| Repository | Stars |")?;
    writeln!(out, "|---|---|")?;
    for repo in repos {
        writeln!(out, "| {} | {} |", repo.name, repo.stargazer_count)?;
    }
    writeln!(out)
}

fn details(out: &mut fmt::Formatter<'_>, summary: &str, repos: &[&StarRepoNode]) -> fmt::Result {
    writeln!(out, "<details>")?;
    writeln!(out, "<summary>{summary}</summary>\n")?;
    repo_table(out, repos)?;
    writeln!(out, "</details>\n")
}

fn write_markdown(out: &mut fmt::Formatter<'_>, s: &StarSummary, generated: &str) -> fmt::Result {
    let (own, fork) = (&s.own, &s.fork);
    let ratio = s.fork_ratio();
    let home = format!("https://github.com/{}/{}", s.username, s.repo_name);

    writeln!(out, "# Codey Star Report — {}\n", s.username)?;
    writeln!(out, "![](https://github.com/{}.png?size=80)\n", s.username)?;
    writeln!(out, "> Generated: {generated}  ")?;
    writeln!(out, "> Powered by [Codey]({home})\n")?;
    writeln!(out, "---\n")?;

    writeln!(out, "<details>")?;
    writeln!(out, "<summary>Summary</summary>\n")?;
    writeln!(out, "| | Active | Archived | Total |")?;
    writeln!(out, "|---|---|---|---|")?;
    writeln!(
        out,
        "| Own Repos | {} | {} | {} |",
        own.active.len(),
        own.archived.len(),
        own.active.len() + own.archived.len()
    )?;
    writeln!(
        out,
        "| Own Stars | {} | {} | {} |",
        own.active_stars(),
        own.archived_stars(),
        s.own_stars()
    )?;
    writeln!(
        out,
        "| Forks | {} | {} | {} |",
        fork.active.len(),
        fork.archived.len(),
        fork.active.len() + fork.archived.len()
    )?;
    writeln!(
        out,
        "| Fork Stars | {} | {} | {} |",
        fork.active_stars(),
        fork.archived_stars(),
        fork.active_stars() + fork.archived_stars()
    )?;
    writeln!(out, "| **Grand Total Stars** | | | **{}** |\n", s.grand_total())?;
    writeln!(out, "- Fork Ratio: {} — {}", ratio, fork_ratio_verdict(ratio))?;
    writeln!(out, "- Repos with 0 stars: {}", own.zero_stars())?;
    writeln!(out, "\n</details>\n")?;

    let top: Vec<&StarRepoNode> = own.active.iter().take(TOP_REPOS).collect();
    details(out, "Top 10 Repos", &top)?;
    details(out, "All Own Repos", &own.starred())?;

    if !own.archived.is_empty() {
        let archived: Vec<&StarRepoNode> = own.archived.iter().collect();
        details(out, "Archived Repos", &archived)?;
    }

    let starred_forks = fork.starred();
    if !starred_forks.is_empty() {
        details(out, "Forked Repos with Stars", &starred_forks)?;
    }

    writeln!(out, "---")?;
    writeln!(out, "> Stars are just the surface.")?;
    writeln!(
        out,
        "> [Meet my Codey]({home}) — it tracks commits, streaks, code quality and brutally judges my dev life. Daily."
    )
}

struct Markdown<'a> {
    summary: &'a StarSummary,
    generated: String,
}

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_markdown(f, self.summary, &self.generated)
    }
}

/// Render `CODEY_STAR_REPORT.md`
pub fn render_markdown(summary: &StarSummary, now: DateTime<Utc>) -> String {
    Markdown {
        summary,
        generated: now.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
    .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRepo {
    pub name: String,
    pub stars: u64,
}

/// One line of the append-only run history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: String,
    pub run_utc: String,
    pub username: String,
    pub own_active: usize,
    pub own_archived: usize,
    pub own_stars_active: u64,
    pub own_stars_archived: u64,
    pub own_stars_total: u64,
    pub own_zero_stars: usize,
    pub fork_active: usize,
    pub fork_stars: u64,
    pub fork_ratio: f64,
    pub grand_total_stars: u64,
    pub top10: Vec<TopRepo>,
}

impl HistoryRecord {
    pub fn new(summary: &StarSummary, now: DateTime<Utc>) -> Self {
        Self {
            date: now.format("%Y-%m-%d").to_string(),
            run_utc: now.format("%Y-%m-%d %H:%M UTC").to_string(),
            username: summary.username.clone(),
            own_active: summary.own.active.len(),
            own_archived: summary.own.archived.len(),
            own_stars_active: summary.own.active_stars(),
            own_stars_archived: summary.own.archived_stars(),
            own_stars_total: summary.own_stars(),
            own_zero_stars: summary.own.zero_stars(),
            fork_active: summary.fork.active.len(),
            fork_stars: summary.fork.active_stars(),
            fork_ratio: summary.fork_ratio(),
            grand_total_stars: summary.grand_total(),
            top10: summary
                .own
                .active
                .iter()
                .take(TOP_REPOS)
                .map(|repo| TopRepo {
                    name: repo.name.clone(),
                    stars: repo.stargazer_count,
                })
                .collect(),
        }
    }
}

/// Append one JSON line to the history file, creating it if needed
pub fn append_history(path: &Path, record: &HistoryRecord) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let line = serde_json::to_string(record)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Fetch, summarise and write both star-report artifacts
pub async fn run<A: GitHubApi + ?Sized>(
    api: &A,
    username: &str,
    repo_name: Option<&str>,
    report_path: &Path,
    history_path: &Path,
    now: DateTime<Utc>,
) -> Result<StarSummary> {
    info!("Collecting star stats for {}", username);
    let own = fetch_repositories(api, username, false).await?;
    let fork = fetch_repositories(api, username, true).await?;
    let summary = StarSummary::new(username, repo_name, own, fork);

    info!(
        "Own: {} repos, {} stars; forks: {} repos, {} stars; total {} stars",
        summary.own.active.len(),
        summary.own.active_stars(),
        summary.fork.active.len(),
        summary.fork.active_stars(),
        summary.grand_total()
    );

    write_artifact(report_path, &render_markdown(&summary, now))?;
    append_history(history_path, &HistoryRecord::new(&summary, now))?;
    info!("Star report written to {:?}, history appended to {:?}", report_path, history_path);

    Ok(summary)
}
