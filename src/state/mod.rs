//! Persistent pet state
//!
//! [`PetState`] is the whole `codey.json` document. Missing keys are filled
//! with defaults at load time, unknown keys are carried through untouched.

pub mod persistence;

use crate::scoring::{Multipliers, Tier};
use crate::utils::{nullable, or_default, parse_timestamp, readable_items};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub use persistence::{load_state, load_state_or_default, save_state};

/// Mood of the pet, recomputed every update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Struggling,
    Exhausted,
    Grinding,
    Elite,
    Wise,
    #[default]
    Neutral,
    Overwhelmed,
}

impl Mood {
    /// Parse a stored mood; unknown names map to `Neutral`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "happy" => Mood::Happy,
            "struggling" => Mood::Struggling,
            "exhausted" => Mood::Exhausted,
            "grinding" => Mood::Grinding,
            "elite" => Mood::Elite,
            "wise" => Mood::Wise,
            "overwhelmed" => Mood::Overwhelmed,
            _ => Mood::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Struggling => "struggling",
            Mood::Exhausted => "exhausted",
            Mood::Grinding => "grinding",
            Mood::Elite => "elite",
            Mood::Wise => "wise",
            Mood::Neutral => "neutral",
            Mood::Overwhelmed => "overwhelmed",
        }
    }

    /// Capitalised name for display
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name: Option<String> = Option::deserialize(deserializer)?;
        Ok(name.as_deref().map_or(Mood::Neutral, Mood::from_name))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One per-run snapshot in the bounded history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: String,
    #[serde(default)]
    pub daily_commits: u32,
    #[serde(default)]
    pub daily_prs: u32,
    #[serde(default)]
    pub health: f64,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub tier: Tier,
}

impl HistoryEntry {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Derived scores from the last update; recomputed in full every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrutalStats {
    pub tier: Tier,
    pub github_years: f64,
    pub social_score: f64,
    pub social_penalties: Vec<String>,
    pub avg_repo_quality: f64,
    pub commit_quality_score: f64,
    pub commit_quality_penalties: Vec<String>,
    pub multipliers: Multipliers,
    pub total_stars: u64,
    pub language_diversity_penalty: f64,
    pub xp_earned: f64,
    pub dominant_language: String,
    pub issues_closed: u32,
    pub issue_close_ratio: f64,
    pub issue_score: f64,
    pub can_prestige: bool,
    pub prestige_missing: Vec<String>,
}

impl Default for BrutalStats {
    fn default() -> Self {
        Self {
            tier: Tier::Noob,
            github_years: 0.0,
            social_score: 1.0,
            social_penalties: Vec::new(),
            avg_repo_quality: 0.0,
            commit_quality_score: 1.0,
            commit_quality_penalties: Vec::new(),
            multipliers: Multipliers::default(),
            total_stars: 0,
            language_diversity_penalty: 1.0,
            xp_earned: 0.0,
            dominant_language: "unknown".to_string(),
            issues_closed: 0,
            issue_close_ratio: 0.0,
            issue_score: 1.0,
            can_prestige: false,
            prestige_missing: Vec::new(),
        }
    }
}

impl BrutalStats {
    /// Social plus commit-quality penalty labels
    pub fn penalty_count(&self) -> usize {
        self.social_penalties.len() + self.commit_quality_penalties.len()
    }
}

fn default_stat() -> f64 {
    50.0
}

fn default_level() -> u32 {
    1
}

/// The `codey.json` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetState {
    #[serde(default = "default_stat")]
    pub health: f64,
    #[serde(default = "default_stat")]
    pub hunger: f64,
    #[serde(default = "default_stat")]
    pub happiness: f64,
    #[serde(default = "default_stat")]
    pub energy: f64,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub total_commits: u64,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default, deserialize_with = "readable_items")]
    pub achievements: Vec<String>,
    #[serde(default, deserialize_with = "readable_items")]
    pub history: Vec<HistoryEntry>,
    /// Recomputed every update, so an unreadable cache is replaced
    #[serde(default, deserialize_with = "or_default")]
    pub brutal_stats: BrutalStats,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub prestige_level: u32,
    /// Keys this version does not know about, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PetState {
    fn default() -> Self {
        Self {
            health: default_stat(),
            hunger: default_stat(),
            happiness: default_stat(),
            energy: default_stat(),
            level: default_level(),
            streak: 0,
            total_commits: 0,
            mood: Mood::Neutral,
            achievements: Vec::new(),
            history: Vec::new(),
            brutal_stats: BrutalStats::default(),
            last_update: None,
            prestige_level: 0,
            extra: Map::new(),
        }
    }
}

impl PetState {
    /// Parsed `last_update`; `None` when absent or unreadable
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update.as_deref().and_then(parse_timestamp)
    }

    pub fn has_achievement(&self, badge: &str) -> bool {
        self.achievements.iter().any(|a| a == badge)
    }

    /// The last `count` achievements, oldest first
    pub fn recent_achievements(&self, count: usize) -> &[String] {
        let start = self.achievements.len().saturating_sub(count);
        &self.achievements[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_gets_defaults() {
        let state: PetState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, PetState::default());
        assert_eq!(state.health, 50.0);
        assert_eq!(state.level, 1);
        assert_eq!(state.brutal_stats.dominant_language, "unknown");
    }

    #[test]
    fn test_legacy_document_migrates() {
        let state: PetState = serde_json::from_value(json!({
            "health": 72,
            "hunger": 80,
            "happiness": 60,
            "energy": 76,
            "level": 4,
            "streak": 12,
            "total_commits": 90,
            "mood": "sleepy",
            "rpg_stats": { "str": 3 },
            "achievements": ["🚀 First Steps"],
            "history": [{ "timestamp": "2024-01-01T10:00:00", "mood": "happy", "tier": "developer" }],
            "brutal_stats": {},
            "last_update": "2024-01-01T10:00:00.123456"
        }))
        .unwrap();

        assert_eq!(state.health, 72.0);
        assert_eq!(state.mood, Mood::Neutral);
        assert_eq!(state.prestige_level, 0);
        assert_eq!(state.extra.get("rpg_stats"), Some(&json!({ "str": 3 })));
        assert_eq!(state.history[0].tier, Tier::Developer);
        assert!(state.history[0].timestamp().is_some());
        assert!(state.last_update().is_some());
        assert_eq!(state.brutal_stats.social_score, 1.0);
    }

    #[test]
    fn test_null_collections_become_empty() {
        let state: PetState = serde_json::from_value(json!({
            "achievements": null,
            "history": null,
            "brutal_stats": null,
            "mood": null
        }))
        .unwrap();
        assert!(state.achievements.is_empty());
        assert!(state.history.is_empty());
        assert_eq!(state.mood, Mood::Neutral);
    }

    #[test]
    fn test_unknown_keys_survive_serialization() {
        let mut state = PetState::default();
        state.extra.insert("custom".into(), json!([1, 2, 3]));
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["custom"], json!([1, 2, 3]));
        assert_eq!(value["mood"], json!("neutral"));
        assert_eq!(value["brutal_stats"]["tier"], json!("noob"));
    }

    #[test]
    fn test_mood_names() {
        assert_eq!(Mood::from_name("ELITE"), Mood::Elite);
        assert_eq!(Mood::from_name("whatever"), Mood::Neutral);
        assert_eq!(Mood::Overwhelmed.title(), "Overwhelmed");
    }

    #[test]
    fn test_recent_achievements() {
        let state = PetState {
            achievements: vec!["a".into(), "b".into(), "c".into()],
            ..PetState::default()
        };
        assert_eq!(state.recent_achievements(2), ["b", "c"]);
        assert_eq!(state.recent_achievements(10).len(), 3);
        assert!(state.has_achievement("a"));
    }
}
