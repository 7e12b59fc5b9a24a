//! Pure scoring helpers for raw GitHub data

use crate::github::models::{Event, LanguageBytes, Repository};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const LAZY_KEYWORDS: [&str; 5] = ["fix", "todo", "wip", "typo", "oops"];
const GOOD_ISSUE_KEYWORDS: [&str; 8] = [
    "bug",
    "fix",
    "enhancement",
    "feature",
    "improvement",
    "refactor",
    "docs",
    "test",
];
const SPAM_ISSUE_KEYWORDS: [&str; 5] = ["test123", "asdf", "please help", "urgent", "idk"];

/// Only the newest commits are judged
const COMMIT_SAMPLE: usize = 20;

/// Commit-message quality in [0.1, 1.0] with the labels that lowered it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitQuality {
    pub score: f64,
    pub penalties: Vec<String>,
}

impl Default for CommitQuality {
    fn default() -> Self {
        Self {
            score: 1.0,
            penalties: Vec::new(),
        }
    }
}

impl CommitQuality {
    fn flag(&mut self, label: &str, cost: f64) {
        self.score -= cost;
        if !self.penalties.iter().any(|p| p == label) {
            self.penalties.push(label.to_string());
        }
    }
}

/// Score commit messages, newest first.
///
/// Lazy keywords cost 0.05, messages under 10 characters cost 0.1, and long
/// one-line messages without a body cost 0.05.
pub fn commit_quality<S: AsRef<str>>(messages: &[S]) -> CommitQuality {
    let mut quality = CommitQuality::default();

    for message in messages.iter().take(COMMIT_SAMPLE) {
        let message = message.as_ref().to_lowercase();
        let length = message.chars().count();

        if LAZY_KEYWORDS.iter().any(|word| message.contains(word)) {
            quality.flag("lazy_messages", 0.05);
        }
        if length < 10 {
            quality.flag("short_messages", 0.1);
        }
        if !message.contains('\n') && length > 50 {
            quality.flag("no_description", 0.05);
        }
    }

    quality.score = quality.score.max(0.1);
    quality
}

/// Per-repository quality in [0.1, 1.0]
pub fn repo_quality(repo: &Repository) -> f64 {
    let mut score: f64 = 1.0;
    if repo.license.is_none() {
        score -= 0.3;
    }
    if !repo.has_description() {
        score -= 0.2;
    }
    if repo.fork {
        score *= 0.1;
    }
    if repo.open_issues_count > 10 {
        score -= 0.2;
    }
    score.max(0.1)
}

/// Mean of [`repo_quality`]; 0.0 when there are no repositories
pub fn average_repo_quality(repos: &[&Repository]) -> f64 {
    if repos.is_empty() {
        return 0.0;
    }
    repos.iter().map(|repo| repo_quality(repo)).sum::<f64>() / repos.len() as f64
}

/// Language mix of the sampled repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageProfile {
    pub dominant: String,
    pub distinct: usize,
    pub diversity_penalty: f64,
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self {
            dominant: "unknown".to_string(),
            distinct: 0,
            diversity_penalty: 1.0,
        }
    }
}

/// Pick the language with most bytes (ties go to the alphabetically first)
/// and derive the diversity penalty: 0.8 above 10 languages, 0.9 for one.
pub fn language_profile(totals: &LanguageBytes) -> LanguageProfile {
    let dominant = totals
        .iter()
        .max_by(|(a_name, a_bytes), (b_name, b_bytes)| {
            a_bytes.cmp(b_bytes).then_with(|| b_name.cmp(a_name))
        })
        .map_or_else(|| "unknown".to_string(), |(name, _)| name.clone());

    let distinct = totals.len();
    let diversity_penalty = match distinct {
        n if n > 10 => 0.8,
        1 => 0.9,
        _ => 1.0,
    };

    LanguageProfile {
        dominant,
        distinct,
        diversity_penalty,
    }
}

/// Add one repository's language breakdown into a running total
pub fn merge_languages(totals: &mut LanguageBytes, repo_languages: LanguageBytes) {
    for (language, bytes) in repo_languages {
        *totals.entry(language).or_insert(0) += bytes;
    }
}

/// Issue behaviour derived from `IssuesEvent` entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueActivity {
    pub score: f64,
    pub opened: u32,
    pub closed: u32,
    pub close_ratio: f64,
    pub quality_hits: u32,
    pub spam_hits: u32,
}

impl Default for IssueActivity {
    fn default() -> Self {
        Self {
            score: 1.0,
            opened: 0,
            closed: 0,
            close_ratio: 0.0,
            quality_hits: 0,
            spam_hits: 0,
        }
    }
}

/// Score issue activity in [0.1, 1.5] over the whole event feed.
///
/// Closing issues earns up to +0.3 via the close ratio, well-labelled titles
/// up to +0.2, spam titles cost up to 0.4, and opening more than five issues
/// while closing under a fifth of them costs 0.3.
pub fn issue_activity(events: &[Event]) -> IssueActivity {
    let mut activity = IssueActivity::default();

    for event in events.iter().filter(|e| e.kind == "IssuesEvent") {
        match event.action() {
            Some("opened") => {
                activity.opened += 1;
                let title = event
                    .payload
                    .issue
                    .as_ref()
                    .map(|issue| issue.title.to_lowercase())
                    .unwrap_or_default();
                if GOOD_ISSUE_KEYWORDS.iter().any(|k| title.contains(k)) {
                    activity.quality_hits += 1;
                }
                if SPAM_ISSUE_KEYWORDS.iter().any(|k| title.contains(k)) {
                    activity.spam_hits += 1;
                }
            }
            Some("closed") => activity.closed += 1,
            _ => {}
        }
    }

    if activity.opened + activity.closed == 0 {
        return activity;
    }

    activity.close_ratio = f64::from(activity.closed) / f64::from(activity.opened.max(1));

    let mut score = 1.0 + activity.close_ratio * 0.3;
    if activity.quality_hits > 0 {
        score += (f64::from(activity.quality_hits) * 0.05).min(0.2);
    }
    if activity.spam_hits > 0 {
        score -= (f64::from(activity.spam_hits) * 0.1).min(0.4);
    }
    if activity.opened > 5 && activity.close_ratio < 0.2 {
        score -= 0.3;
    }
    activity.score = score.clamp(0.1, 1.5);
    activity
}

/// Commits and merged PRs seen in the event feed during the last 24 hours
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentActivity {
    pub commits: u32,
    pub prs: u32,
    pub messages: Vec<String>,
}

pub fn recent_activity(events: &[Event], now: DateTime<Utc>) -> RecentActivity {
    let window_start = now - Duration::days(1);
    let mut recent = RecentActivity::default();

    for event in events {
        let Some(created_at) = event.created_at() else {
            continue;
        };
        if created_at <= window_start {
            continue;
        }

        if event.kind == "PushEvent" {
            recent.commits += event.payload.commits.len() as u32;
            recent
                .messages
                .extend(event.payload.commits.iter().map(|c| c.message.clone()));
        } else if event.is_merged_pull_request() {
            recent.prs += 1;
        }
    }

    recent
}
