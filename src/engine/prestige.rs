//! Prestige eligibility and the explicit prestige action

use crate::errors::{CodeyError, Result};
use crate::state::{BrutalStats, PetState};
use std::sync::Arc;
use tracing::info;

/// Thresholds a max-level pet must also meet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrestigeRequirements {
    pub level: u32,
    pub min_years: f64,
    pub min_social_score: f64,
    pub min_repo_quality: f64,
    pub min_total_stars: u64,
}

impl Default for PrestigeRequirements {
    fn default() -> Self {
        Self {
            level: 10,
            min_years: 5.0,
            min_social_score: 1.0,
            min_repo_quality: 0.6,
            min_total_stars: 100,
        }
    }
}

impl PrestigeRequirements {
    /// Eligibility flag and the names of unmet requirements.
    ///
    /// Below max level only `level_10` is reported.
    pub fn check(&self, level: u32, stats: &BrutalStats) -> (bool, Vec<String>) {
        if level < self.level {
            return (false, vec![format!("level_{}", self.level)]);
        }

        let checks = [
            ("min_years", stats.github_years >= self.min_years),
            ("min_social_score", stats.social_score >= self.min_social_score),
            ("min_repo_quality", stats.avg_repo_quality >= self.min_repo_quality),
            ("min_total_stars", stats.total_stars >= self.min_total_stars),
        ];

        let missing: Vec<String> = checks
            .iter()
            .filter(|(_, met)| !met)
            .map(|(name, _)| (*name).to_string())
            .collect();

        (missing.is_empty(), missing)
    }
}

/// Spend an eligible max-level pet for one prestige level.
///
/// Commits and level restart; streak, stats, achievements and history stay.
/// Returns the new prestige level.
pub fn apply_prestige(state: &mut PetState, requirements: &PrestigeRequirements) -> Result<u32> {
    let (eligible, missing) = requirements.check(state.level, &state.brutal_stats);

    if !eligible || !state.brutal_stats.can_prestige {
        let missing = if missing.is_empty() {
            // eligible on the numbers but not yet confirmed by an update
            vec!["update".to_string()]
        } else {
            missing
        };
        return Err(CodeyError::PrestigeUnavailable {
            missing: Arc::new(missing),
        });
    }

    state.prestige_level += 1;
    state.total_commits = 0;
    state.level = 1;
    state.brutal_stats.can_prestige = false;
    state.brutal_stats.prestige_missing = vec![format!("level_{}", requirements.level)];

    info!("Codey reached prestige level {}", state.prestige_level);
    Ok(state.prestige_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eligible_state() -> PetState {
        let mut state = PetState {
            level: 10,
            total_commits: 400,
            streak: 42,
            achievements: vec!["🏆 Max Level".into()],
            ..PetState::default()
        };
        state.brutal_stats.github_years = 6.0;
        state.brutal_stats.social_score = 1.1;
        state.brutal_stats.avg_repo_quality = 0.7;
        state.brutal_stats.total_stars = 150;
        state.brutal_stats.can_prestige = true;
        state
    }

    #[test]
    fn test_below_max_level_reports_level_only() {
        let (ok, missing) = PrestigeRequirements::default().check(9, &BrutalStats::default());
        assert!(!ok);
        assert_eq!(missing, vec!["level_10"]);
    }

    #[test]
    fn test_missing_requirements_are_named() {
        let mut stats = BrutalStats::default();
        stats.github_years = 5.0;
        stats.social_score = 0.9;
        stats.avg_repo_quality = 0.6;
        stats.total_stars = 99;
        let (ok, missing) = PrestigeRequirements::default().check(10, &stats);
        assert!(!ok);
        assert_eq!(missing, vec!["min_social_score", "min_total_stars"]);
    }

    #[test]
    fn test_apply_prestige_resets_progress() {
        let mut state = eligible_state();
        let level = apply_prestige(&mut state, &PrestigeRequirements::default()).unwrap();

        assert_eq!(level, 1);
        assert_eq!(state.level, 1);
        assert_eq!(state.total_commits, 0);
        assert_eq!(state.streak, 42);
        assert_eq!(state.achievements.len(), 1);
        assert!(!state.brutal_stats.can_prestige);

        // cannot prestige twice without a new update
        assert!(apply_prestige(&mut state, &PrestigeRequirements::default()).is_err());
    }

    #[test]
    fn test_apply_prestige_refuses_ineligible() {
        let mut state = eligible_state();
        state.brutal_stats.total_stars = 3;
        state.brutal_stats.can_prestige = false;

        let err = apply_prestige(&mut state, &PrestigeRequirements::default()).unwrap_err();
        assert!(matches!(
            err,
            CodeyError::PrestigeUnavailable { ref missing } if missing.as_slice() == ["min_total_stars"]
        ));
        assert_eq!(state.prestige_level, 0);
        assert_eq!(state.total_commits, 400);
    }
}
