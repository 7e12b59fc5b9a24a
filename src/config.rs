//! Runtime configuration for Codey
//!
//! Everything that used to be module-level globals (token, target, API URLs,
//! game-balance constants) lives in one immutable [`Config`] built at startup.

use crate::errors::{CodeyError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// The account (and optionally repository) Codey tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub owner: String,
    pub repo: Option<String>,
}

impl Target {
    /// Parse a bare owner, `owner/repo`, or a full URL such as
    /// `https://github.com/owner/repo.git`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let path = match trimmed.split_once("://") {
            // drop scheme and host, keep the path
            Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
            None => trimmed,
        };

        let mut segments = path
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty());

        let owner = segments
            .next()
            .ok_or_else(|| CodeyError::config(format!("Cannot read an owner from '{input}'")))?;
        let repo = segments
            .next()
            .map(|repo| repo.strip_suffix(".git").unwrap_or(repo).to_string())
            .filter(|repo| !repo.is_empty());

        Ok(Self {
            owner: owner.to_string(),
            repo,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repo {
            Some(repo) => write!(f, "{}/{}", self.owner, repo),
            None => write!(f, "{}", self.owner),
        }
    }
}

/// Game-balance constants for the stat engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameBalance {
    pub energy_cost_commit: f64,
    pub energy_cost_pr: f64,
    pub energy_regen_rest: f64,
    pub energy_regen_active: f64,
    pub daily_hunger_decay: f64,
    pub daily_happiness_decay: f64,
    pub xp_per_commit: f64,
    pub xp_per_pr: f64,
    pub xp_per_issue_closed: f64,
    pub hunger_gain_modifier: f64,
    pub happiness_gain_modifier: f64,
    pub base_level_requirement: f64,
    pub streak_loss_divisor: u32,
    pub weekend_bonus: f64,
    pub history_capacity: usize,
    pub inactivity_decay: f64,
    pub energy_decay_floor: f64,
    pub max_level: u32,
}

impl Default for GameBalance {
    fn default() -> Self {
        Self {
            energy_cost_commit: 2.5,
            energy_cost_pr: 5.0,
            energy_regen_rest: 20.0,
            energy_regen_active: 5.0,
            daily_hunger_decay: 20.0,
            daily_happiness_decay: 12.0,
            xp_per_commit: 10.0,
            xp_per_pr: 25.0,
            xp_per_issue_closed: 8.0,
            hunger_gain_modifier: 0.5,
            happiness_gain_modifier: 0.8,
            base_level_requirement: 25.0,
            streak_loss_divisor: 10,
            weekend_bonus: 1.5,
            history_capacity: 30,
            inactivity_decay: 0.95,
            energy_decay_floor: 0.3,
            max_level: 10,
        }
    }
}

/// Configuration for a Codey run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub token (GIT_TOKEN or GITHUB_TOKEN)
    #[serde(skip_serializing)]
    pub token: String,
    /// Tracked owner/repo; `None` means "whoever owns the token"
    pub target: Option<Target>,
    /// REST base URL (default: https://api.github.com)
    pub api_url: String,
    /// GraphQL endpoint (default: {api_url}/graphql)
    pub graphql_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    pub event_pages: u32,
    pub event_page_size: u32,
    pub repo_page_size: u32,
    pub repo_max_pages: u32,
    /// How many recently pushed repos are sampled for languages
    pub language_sample: usize,
    /// How many repos the direct /commits fallback may query
    pub commit_fallback_repos: usize,
    pub balance: GameBalance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            target: None,
            api_url: "https://api.github.com".to_string(),
            graphql_url: "https://api.github.com/graphql".to_string(),
            timeout_seconds: 20,
            event_pages: 10,
            event_page_size: 30,
            repo_page_size: 100,
            repo_max_pages: 50,
            language_sample: 5,
            commit_fallback_repos: 10,
            balance: GameBalance::default(),
        }
    }
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = non_empty("GIT_TOKEN")
            .or_else(|| non_empty("GITHUB_TOKEN"))
            .ok_or_else(|| {
                CodeyError::config(
                    "GitHub token not found. Set GIT_TOKEN or GITHUB_TOKEN environment variable",
                )
            })?;

        let mut config = Self {
            token: token.trim().to_string(),
            ..Self::default()
        };

        if let Some(target) = non_empty("GIT_REPOSITORY").or_else(|| non_empty("GITHUB_REPOSITORY"))
        {
            config.target = Some(Target::parse(&target)?);
        }

        if let Some(api_url) = non_empty("CODEY_API_URL") {
            config.api_url = api_url.trim_end_matches('/').to_string();
            config.graphql_url = format!("{}/graphql", config.api_url);
        }

        if let Some(graphql_url) = non_empty("CODEY_GRAPHQL_URL") {
            config.graphql_url = graphql_url;
        }

        if let Some(timeout) = non_empty("CODEY_TIMEOUT_SECONDS") {
            config.timeout_seconds = timeout.parse().unwrap_or(config.timeout_seconds);
        }

        Ok(config)
    }

    /// Override the tracked target (e.g. from `--target`)
    pub fn with_target(mut self, target: Option<Target>) -> Self {
        if target.is_some() {
            self.target = target;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(CodeyError::config("Token cannot be empty"));
        }

        if self.api_url.is_empty() || self.graphql_url.is_empty() {
            return Err(CodeyError::config("API URLs cannot be empty"));
        }

        if self.timeout_seconds == 0 {
            return Err(CodeyError::config("Timeout must be greater than 0"));
        }

        if self.event_page_size == 0 || self.repo_page_size == 0 {
            return Err(CodeyError::config("Page sizes must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[rstest]
    #[case("octocat", "octocat", None)]
    #[case("  octocat/hello-world ", "octocat", Some("hello-world"))]
    #[case("https://github.com/octocat", "octocat", None)]
    #[case("https://github.com/octocat/", "octocat", None)]
    #[case("https://github.com/octocat/hello-world", "octocat", Some("hello-world"))]
    #[case("http://github.example.org/octocat/hello-world.git", "octocat", Some("hello-world"))]
    fn test_target_parse(#[case] input: &str, #[case] owner: &str, #[case] repo: Option<&str>) {
        let target = Target::parse(input).unwrap();
        assert_eq!(target.owner, owner);
        assert_eq!(target.repo.as_deref(), repo);
    }

    #[test]
    fn test_target_parse_rejects_empty() {
        assert!(Target::parse("   ").is_err());
        assert!(Target::parse("https://github.com/").is_err());
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::parse("a/b").unwrap().to_string(), "a/b");
        assert_eq!(Target::parse("a").unwrap().to_string(), "a");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.timeout_seconds, 20);
        assert_eq!(config.event_pages * config.event_page_size, 300);
        assert!(config.token.is_empty());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let result = Config::from_lookup(lookup(&[("GITHUB_REPOSITORY", "octocat")]));
        assert!(matches!(result, Err(CodeyError::ConfigurationError(_))));
    }

    #[test]
    fn test_git_token_takes_precedence() {
        let config = Config::from_lookup(lookup(&[
            ("GIT_TOKEN", "primary"),
            ("GITHUB_TOKEN", "secondary"),
            ("GITHUB_REPOSITORY", "https://github.com/octocat/codey"),
        ]))
        .unwrap();
        assert_eq!(config.token, "primary");
        assert_eq!(config.target, Some(Target::parse("octocat/codey").unwrap()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_url_override_moves_graphql() {
        let config = Config::from_lookup(lookup(&[
            ("GITHUB_TOKEN", "t"),
            ("CODEY_API_URL", "http://localhost:8080/"),
            ("CODEY_TIMEOUT_SECONDS", "nonsense"),
        ]))
        .unwrap();
        assert_eq!(config.graphql_url, "http://localhost:8080/graphql");
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.timeout_seconds, 20);
    }

    #[test]
    fn test_cli_target_overrides_env() {
        let config = Config::from_lookup(lookup(&[
            ("GITHUB_TOKEN", "t"),
            ("GITHUB_REPOSITORY", "someone/else"),
        ]))
        .unwrap()
        .with_target(Some(Target::parse("octocat").unwrap()));
        assert_eq!(config.target.unwrap().owner, "octocat");
    }
}
