//! GitHub API integration
//!
//! REST listings (user, repos, events, commits, languages) and the GraphQL
//! endpoint used by the star report.

pub mod client;
pub mod models;

pub use client::{fetch, fetch_paginated, GitHubApi, GitHubClient, Pagination, Query};
pub use models::{Event, Repository, UserProfile};

use crate::errors::Result;

/// Login of the account that owns the token
pub async fn authenticated_login<A: GitHubApi + ?Sized>(api: &A) -> Result<String> {
    let user: UserProfile = fetch(api, "/user", &[]).await?;
    Ok(user.login)
}
