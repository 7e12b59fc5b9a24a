//! Social/quality scoring and the tier system

use crate::github::{Repository, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Experience bracket derived from account age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Noob,
    Developer,
    Veteran,
    Elder,
}

impl Tier {
    /// Step function of account age in years
    pub fn from_years(years: f64) -> Self {
        if years < 2.0 {
            Tier::Noob
        } else if years < 5.0 {
            Tier::Developer
        } else if years < 8.0 {
            Tier::Veteran
        } else {
            Tier::Elder
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Noob => "noob",
            Tier::Developer => "developer",
            Tier::Veteran => "veteran",
            Tier::Elder => "elder",
        }
    }

    /// Base multipliers before social scaling
    pub fn base_multipliers(&self) -> Multipliers {
        let (xp, decay, requirements) = match self {
            Tier::Noob => (1.0, 0.95, 1.0),
            Tier::Developer => (0.67, 0.90, 1.5),
            Tier::Veteran => (0.40, 0.85, 2.5),
            Tier::Elder => (0.20, 0.80, 4.0),
        };
        Multipliers {
            xp,
            decay,
            requirements,
        }
    }

    /// Tier multipliers with XP scaled by the social score
    pub fn multipliers(&self, social_score: f64) -> Multipliers {
        let mut multipliers = self.base_multipliers();
        multipliers.xp *= social_score;
        multipliers
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// XP gain, stat decay and level-requirement scaling for a tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Multipliers {
    pub xp: f64,
    pub decay: f64,
    pub requirements: f64,
}

impl Default for Multipliers {
    fn default() -> Self {
        Tier::Noob.base_multipliers()
    }
}

/// Result of the follow/fork/star pattern check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialScore {
    pub score: f64,
    pub ffr: f64,
    pub fork_ratio: f64,
    pub stars_per_repo: f64,
    /// Triggered pattern labels; `quality_curator` is a bonus but still counts
    pub penalties: Vec<String>,
}

/// Detect follow spam, fork leeching and star-less repo spam.
///
/// Conditions combine multiplicatively; the score is floored at 0.1.
pub fn social_score(user: &UserProfile, repos: &[Repository]) -> SocialScore {
    let ffr = user.following as f64 / user.followers.max(1) as f64;

    let own: Vec<&Repository> = repos.iter().filter(|repo| !repo.fork).collect();
    let forks = repos.len() - own.len();
    let own_count = own.len().max(1) as f64;
    let fork_ratio = forks as f64 / own_count;
    let total_stars: u64 = own.iter().map(|repo| repo.stargazers_count).sum();
    let stars_per_repo = total_stars as f64 / own_count;

    let mut score = 1.0;
    let mut penalties = Vec::new();

    if ffr > 5.0 {
        score *= 0.25;
        penalties.push("spam_follower".to_string());
    } else if ffr > 2.0 {
        score *= 0.75;
        penalties.push("desperate_networker".to_string());
    } else if ffr < 0.5 {
        score *= 1.25;
        penalties.push("quality_curator".to_string());
    }

    if fork_ratio > 2.0 {
        score *= 0.5;
        penalties.push("fork_leech".to_string());
    }

    if stars_per_repo < 1.0 && own.len() > 5 {
        score *= 0.7;
        penalties.push("code_spammer".to_string());
    }

    SocialScore {
        score: f64::max(score, 0.1),
        ffr,
        fork_ratio,
        stars_per_repo,
        penalties,
    }
}

/// Account age in years (days / 365.25); 1.0 when the creation date is unknown
pub fn github_years(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match created_at {
        Some(created) => (now - created).num_days() as f64 / 365.25,
        None => 1.0,
    }
}
