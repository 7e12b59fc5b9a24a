//! Typed records for the GitHub REST and GraphQL payloads Codey reads
//!
//! Only the fields Codey uses are modelled. Missing or `null` fields fall
//! back to defaults here so the rest of the crate never guards against them.

use crate::utils::{nullable, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /users/{owner}` and `GET /user`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "nullable")]
    pub login: String,
    #[serde(default, deserialize_with = "nullable")]
    pub followers: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub following: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub public_repos: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserProfile {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of `GET /users/{owner}/repos`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub full_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub fork: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default, deserialize_with = "nullable")]
    pub open_issues_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub stargazers_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub forks_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

impl Repository {
    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }
}

/// A commit inside a `PushEvent` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushCommit {
    #[serde(default, deserialize_with = "nullable")]
    pub sha: String,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequestRef {
    #[serde(default, deserialize_with = "nullable")]
    pub merged: bool,
    #[serde(default)]
    pub merged_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueRef {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub commits: Vec<PushCommit>,
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
    #[serde(default)]
    pub issue: Option<IssueRef>,
}

/// One entry of `GET /users/{owner}/events/public`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub payload: EventPayload,
}

impl Event {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn action(&self) -> Option<&str> {
        self.payload.action.as_deref()
    }

    /// Closed-and-merged pull request event
    pub fn is_merged_pull_request(&self) -> bool {
        self.kind == "PullRequestEvent"
            && self.action() == Some("closed")
            && self
                .payload
                .pull_request
                .as_ref()
                .is_some_and(|pr| pr.merged || pr.merged_at.is_some())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitDetail {
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
}

/// One entry of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoCommit {
    #[serde(default, deserialize_with = "nullable")]
    pub sha: String,
    #[serde(default, deserialize_with = "nullable")]
    pub commit: CommitDetail,
}

/// `GET /repos/{owner}/{repo}/languages`: language name to byte count
pub type LanguageBytes = BTreeMap<String, u64>;

/// GraphQL envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorEntry {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StarUserData {
    pub user: Option<StarUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StarUser {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConnection {
    #[serde(default)]
    pub nodes: Vec<StarRepoNode>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

/// Repository node returned by the star-report query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRepoNode {
    pub name: String,
    #[serde(default)]
    pub stargazer_count: u64,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub owner: RepoOwner,
}

impl StarRepoNode {
    pub fn is_inactive(&self) -> bool {
        self.is_archived || self.is_disabled || self.is_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repository_nulls_become_defaults() {
        let repo: Repository = serde_json::from_value(json!({
            "name": "codey",
            "full_name": "octocat/codey",
            "fork": false,
            "description": null,
            "license": null,
            "open_issues_count": null,
            "stargazers_count": 12
        }))
        .unwrap();

        assert_eq!(repo.full_name, "octocat/codey");
        assert!(!repo.has_description());
        assert!(repo.license.is_none());
        assert_eq!(repo.open_issues_count, 0);
        assert_eq!(repo.stargazers_count, 12);
    }

    #[test]
    fn test_push_event_payload() {
        let event: Event = serde_json::from_value(json!({
            "type": "PushEvent",
            "created_at": "2024-05-01T10:00:00Z",
            "payload": { "commits": [ { "sha": "abc", "message": "Add parser" } ] }
        }))
        .unwrap();

        assert_eq!(event.kind, "PushEvent");
        assert_eq!(event.payload.commits.len(), 1);
        assert_eq!(event.payload.commits[0].message, "Add parser");
        assert!(event.created_at().is_some());
    }

    #[test]
    fn test_push_event_with_null_commits() {
        let event: Event = serde_json::from_value(json!({
            "type": "PushEvent",
            "payload": { "commits": null }
        }))
        .unwrap();
        assert!(event.payload.commits.is_empty());
        assert!(event.created_at().is_none());
    }

    #[test]
    fn test_merged_pull_request_detection() {
        let merged: Event = serde_json::from_value(json!({
            "type": "PullRequestEvent",
            "payload": { "action": "closed", "pull_request": { "merged": true } }
        }))
        .unwrap();
        let rejected: Event = serde_json::from_value(json!({
            "type": "PullRequestEvent",
            "payload": { "action": "closed", "pull_request": { "merged": false } }
        }))
        .unwrap();
        let opened: Event = serde_json::from_value(json!({
            "type": "PullRequestEvent",
            "payload": { "action": "opened", "pull_request": { "merged": false } }
        }))
        .unwrap();

        assert!(merged.is_merged_pull_request());
        assert!(!rejected.is_merged_pull_request());
        assert!(!opened.is_merged_pull_request());
    }

    #[test]
    fn test_graphql_repo_node() {
        let page: RepositoryConnection = serde_json::from_value(json!({
            "nodes": [{
                "name": "codey", "stargazerCount": 7, "isArchived": false,
                "isDisabled": false, "isLocked": true, "owner": { "login": "octocat" }
            }],
            "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vyc29y" }
        }))
        .unwrap();

        assert_eq!(page.nodes[0].stargazer_count, 7);
        assert!(page.nodes[0].is_inactive());
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("Y3Vyc29y"));
    }
}
