//! GitHub REST/GraphQL client

use crate::config::Config;
use crate::errors::{CodeyError, Result};
use crate::github::models::GraphQlResponse;
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Query-string parameters for a GET request
pub type Query<'a> = [(&'a str, String)];

/// The two calls Codey makes against GitHub.
///
/// Implemented by [`GitHubClient`] for real runs and by in-memory fakes in tests.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Authenticated GET of a REST path; returns the decoded JSON body
    async fn get_json(&self, path: &str, query: &Query<'_>) -> Result<Value>;

    /// GraphQL POST; returns the `data` member, failing on an `errors` array
    async fn graphql(&self, query: &str, variables: Value) -> Result<Value>;
}

/// Page-size and page-cap for a paginated listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub per_page: u32,
    pub max_pages: u32,
}

/// GitHub API client
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    graphql_url: String,
}

impl GitHubClient {
    /// Create a new client with bearer auth and the per-request timeout
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| CodeyError::config(format!("Invalid token format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("codey/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .map_err(|e| CodeyError::network(format!("Failed to create HTTP client: {e}")))?;

        info!("GitHub client initialized with base URL: {}", config.api_url);

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            graphql_url: config.graphql_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Turn an HTTP response into JSON or a typed failure
    async fn handle_response(url: &str, response: Response) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CodeyError::network(format!("Failed to read response from {url}: {e}")))?;

        if !status.is_success() {
            return Err(CodeyError::ApiError {
                status: status.as_u16(),
                url: Arc::new(url.to_string()),
                body: Arc::new(body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| CodeyError::parse(format!("Response from {url} is not JSON: {e}")))
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_json(&self, path: &str, query: &Query<'_>) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CodeyError::network(format!("Request to {url} failed: {e}")))?;

        Self::handle_response(&url, response).await
    }

    async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        debug!("POST {}", self.graphql_url);

        let response = self
            .client
            .post(&self.graphql_url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| {
                CodeyError::network(format!("Request to {} failed: {e}", self.graphql_url))
            })?;

        let value = Self::handle_response(&self.graphql_url, response).await?;
        graphql_data(value)
    }
}

/// Unwrap a GraphQL envelope into its `data`, surfacing `errors`
pub fn graphql_data(value: Value) -> Result<Value> {
    let envelope: GraphQlResponse<Value> = serde_json::from_value(value)
        .map_err(|e| CodeyError::parse(format!("Malformed GraphQL response: {e}")))?;

    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(CodeyError::GraphQlError(Arc::new(messages.join("; "))));
    }

    envelope
        .data
        .ok_or_else(|| CodeyError::parse("GraphQL response has no data"))
}

/// GET a path and decode it into `T`
pub async fn fetch<T, A>(api: &A, path: &str, query: &Query<'_>) -> Result<T>
where
    T: DeserializeOwned,
    A: GitHubApi + ?Sized,
{
    let value = api.get_json(path, query).await?;
    serde_json::from_value(value)
        .map_err(|e| CodeyError::parse(format!("Unexpected response shape from {path}: {e}")))
}

/// Walk `page=1..` until a short or empty page, a failure, or the page cap.
///
/// A failure mid-walk keeps the pages already read.
pub async fn fetch_paginated<T, A>(
    api: &A,
    path: &str,
    query: &Query<'_>,
    pagination: Pagination,
) -> Vec<T>
where
    T: DeserializeOwned,
    A: GitHubApi + ?Sized,
{
    let mut items = Vec::new();

    for page in 1..=pagination.max_pages {
        let mut params: Vec<(&str, String)> = query.to_vec();
        params.push(("per_page", pagination.per_page.to_string()));
        params.push(("page", page.to_string()));

        let batch: Vec<T> = match fetch(api, path, &params).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Stopping pagination of {} at page {}: {}", path, page, e);
                break;
            }
        };

        let short_page = batch.len() < pagination.per_page as usize;
        if batch.is_empty() {
            break;
        }
        items.extend(batch);
        if short_page {
            break;
        }
    }

    debug!("Fetched {} items from {}", items.len(), path);
    items
}
