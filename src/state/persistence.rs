//! State Store: reads and writes `codey.json`
//!
//! The file is rewritten whole, once, at the end of a run. A missing file
//! means a new pet; an unreadable one is an error and is never replaced.

use super::PetState;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Load state from disk
///
/// # Returns
/// * `Ok(Some(state))` if the file was read and parsed
/// * `Ok(None)` if no state file exists yet
/// * `Err` if the file exists but cannot be read or parsed
pub fn load_state(path: &Path) -> Result<Option<PetState>> {
    if !path.exists() {
        debug!("No saved state at {:?}", path);
        return Ok(None);
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pet state from file: {path:?}"))?;

    let state: PetState = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse pet state JSON from file: {path:?}"))?;

    info!("Loaded pet state from {:?}", path);
    Ok(Some(state))
}

/// Load state, starting a fresh pet only when no file exists yet
pub fn load_state_or_default(path: &Path) -> Result<PetState> {
    Ok(load_state(path)?.unwrap_or_else(|| {
        info!("{:?} not found, creating a new pet", path);
        PetState::default()
    }))
}

/// Save state to disk as pretty-printed JSON
pub fn save_state(path: &Path, state: &PetState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create state directory: {parent:?}"))?;
    }

    let json =
        serde_json::to_string_pretty(state).with_context(|| "Failed to serialize pet state to JSON")?;

    fs::write(path, json).with_context(|| format!("Failed to write pet state to file: {path:?}"))?;

    debug!("Saved pet state to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BrutalStats, HistoryEntry, Mood};
    use crate::scoring::Tier;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_state() -> PetState {
        let mut state = PetState {
            health: 45.166_666_666_666_664,
            hunger: 55.0,
            happiness: 38.0,
            energy: 42.5,
            level: 3,
            streak: 9,
            total_commits: 61,
            mood: Mood::Grinding,
            achievements: vec!["🚀 First Steps".into(), "📅 Weekly Warrior".into()],
            history: vec![HistoryEntry {
                timestamp: "2024-05-02T12:00:00+00:00".into(),
                daily_commits: 5,
                daily_prs: 1,
                health: 50.0,
                mood: Mood::Happy,
                streak: 8,
                tier: Tier::Veteran,
            }],
            last_update: Some("2024-05-02T12:00:00+00:00".into()),
            prestige_level: 1,
            ..PetState::default()
        };
        state.brutal_stats.social_score = 0.1 + 0.2;
        state.brutal_stats.prestige_missing = vec!["min_total_stars".into()];
        state.extra.insert("rpg_stats".into(), json!({}));
        state
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codey.json");
        assert!(load_state(&path).unwrap().is_none());
        assert_eq!(load_state_or_default(&path).unwrap(), PetState::default());
    }

    #[test]
    fn test_round_trip_is_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codey.json");
        let state = sample_state();

        save_state(&path, &state).unwrap();
        let loaded = load_state(&path).unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_present_keys_are_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codey.json");
        fs::write(&path, r#"{ "health": 0, "level": 7, "streak": 3 }"#).unwrap();

        let loaded = load_state(&path).unwrap().unwrap();
        assert_eq!(loaded.health, 0.0);
        assert_eq!(loaded.level, 7);
        assert_eq!(loaded.streak, 3);
        assert_eq!(loaded.hunger, 50.0);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codey.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load_state(&path).is_err());
        assert!(load_state_or_default(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_partial_cache_keeps_the_durable_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codey.json");
        let document = json!({
            "level": 7,
            "streak": 55,
            "total_commits": 420,
            "achievements": ["🚀 First Steps", "💯 Century Club"],
            "brutal_stats": {
                "tier": "veteran",
                "multipliers": { "xp": 0.4, "requirements": 2.5 }
            }
        });
        fs::write(&path, document.to_string()).unwrap();

        let state = load_state_or_default(&path).unwrap();
        assert_eq!(state.level, 7);
        assert_eq!(state.streak, 55);
        assert_eq!(state.total_commits, 420);
        assert_eq!(state.achievements.len(), 2);
        assert_eq!(state.brutal_stats.tier, Tier::Veteran);
        assert_eq!(state.brutal_stats.multipliers.xp, 0.4);
        assert_eq!(state.brutal_stats.multipliers.requirements, 2.5);
        assert_eq!(state.brutal_stats.multipliers.decay, Tier::Noob.base_multipliers().decay);

        save_state(&path, &state).unwrap();
        let reloaded = load_state(&path).unwrap().unwrap();
        assert_eq!(reloaded.level, 7);
        assert_eq!(reloaded.achievements, state.achievements);
    }

    #[test]
    fn test_malformed_cache_and_history_entries_are_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codey.json");
        let document = json!({
            "level": 4,
            "total_commits": 80,
            "achievements": ["🚀 First Steps", 42],
            "history": [
                { "timestamp": "2024-05-01T10:00:00+00:00", "daily_commits": 3 },
                { "daily_commits": -1 },
                "garbage"
            ],
            "brutal_stats": { "tier": "wizard", "social_score": "high" }
        });
        fs::write(&path, document.to_string()).unwrap();

        let state = load_state(&path).unwrap().unwrap();
        assert_eq!(state.level, 4);
        assert_eq!(state.total_commits, 80);
        assert_eq!(state.achievements, vec!["🚀 First Steps".to_string()]);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].daily_commits, 3);
        assert_eq!(state.brutal_stats, BrutalStats::default());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("codey.json");
        save_state(&path, &PetState::default()).unwrap();
        assert!(path.exists());
    }
}
