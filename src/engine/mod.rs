//! Stat Engine
//!
//! One call to [`update`] turns yesterday's activity into the next pet state.
//! The order of the steps is fixed; later steps read values earlier ones
//! wrote (mood reads the fresh health, achievements read the fresh snapshot).

pub mod achievements;
pub mod prestige;

use crate::activity::ActivitySummary;
use crate::config::GameBalance;
use crate::github::UserProfile;
use crate::scoring::{self, Tier};
use crate::state::{BrutalStats, HistoryEntry, Mood, PetState};
use crate::utils::days_between;
use achievements::{Achievement, RunContext};
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use prestige::PrestigeRequirements;
use tracing::{debug, info};

pub use prestige::apply_prestige;

/// Counts fed to the engine: bonus-adjusted for rewards, raw for the counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyActivity {
    pub commits: u32,
    pub prs: u32,
    pub raw_commits: u32,
    pub raw_prs: u32,
}

impl DailyActivity {
    /// No weekend bonus
    pub fn plain(commits: u32, prs: u32) -> Self {
        Self {
            commits,
            prs,
            raw_commits: commits,
            raw_prs: prs,
        }
    }

    /// Apply the weekend bonus (`floor(raw * bonus)`) on Saturday and Sunday
    pub fn for_day(raw_commits: u32, raw_prs: u32, now: DateTime<Utc>, bonus: f64) -> Self {
        if !is_weekend(now) {
            return Self::plain(raw_commits, raw_prs);
        }

        let boost = |raw: u32| (f64::from(raw) * bonus).floor() as u32;
        Self {
            commits: boost(raw_commits),
            prs: boost(raw_prs),
            raw_commits,
            raw_prs,
        }
    }

    pub fn is_active(&self) -> bool {
        self.commits > 0 || self.prs > 0
    }
}

pub fn is_weekend(now: DateTime<Utc>) -> bool {
    matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
}

/// What a single update produced besides the new state
#[derive(Debug, Clone, Default)]
pub struct UpdateOutcome {
    pub xp_earned: f64,
    pub newly_unlocked: Vec<&'static Achievement>,
}

/// Decay health and happiness by `base^days` and energy by
/// `max(floor, base^days)` when more than a day has passed.
pub fn apply_inactivity_decay(state: &mut PetState, now: DateTime<Utc>, balance: &GameBalance) {
    let Some(last_update) = state.last_update() else {
        return;
    };

    let days = days_between(last_update, now);
    if days <= 1 {
        return;
    }

    let factor = balance.inactivity_decay.powi(days as i32);
    state.health *= factor;
    state.happiness *= factor;
    state.energy *= factor.max(balance.energy_decay_floor);
    debug!("Applied {} days of inactivity decay (x{:.3})", days, factor);
}

/// Mood chain, first match wins
pub fn select_mood(health: f64, energy: f64, stats: &BrutalStats) -> Mood {
    if health < 30.0 {
        Mood::Struggling
    } else if energy < 20.0 {
        Mood::Exhausted
    } else if stats.penalty_count() > 2 {
        Mood::Overwhelmed
    } else if stats.social_score > 1.2 {
        Mood::Elite
    } else if stats.tier == Tier::Elder && health > 70.0 {
        Mood::Wise
    } else if health > 80.0 {
        Mood::Happy
    } else {
        Mood::Grinding
    }
}

/// `min(max_level, 1 + floor(total_commits / (base * requirement)))`
pub fn level_for(total_commits: u64, requirement_multiplier: f64, balance: &GameBalance) -> u32 {
    let per_level = balance.base_level_requirement * requirement_multiplier;
    let earned = (total_commits as f64 / per_level).floor() as u32;
    earned.saturating_add(1).min(balance.max_level)
}

/// Run one daily update.
pub fn update(
    state: &mut PetState,
    daily: &DailyActivity,
    summary: &ActivitySummary,
    user: &UserProfile,
    balance: &GameBalance,
    now: DateTime<Utc>,
) -> UpdateOutcome {
    let github_years = scoring::github_years(user.created_at(), now);
    let tier = Tier::from_years(github_years);
    let social = scoring::social_score(user, &summary.repos);
    let multipliers = tier.multipliers(social.score);
    let issues = &summary.issues;

    // 1. inactivity decay
    apply_inactivity_decay(state, now, balance);

    // 2. history, pre-update values
    let keep = balance.history_capacity.saturating_sub(1);
    let excess = state.history.len().saturating_sub(keep);
    state.history.drain(..excess);
    state.history.push(HistoryEntry {
        timestamp: now.to_rfc3339(),
        daily_commits: daily.commits,
        daily_prs: daily.prs,
        health: state.health,
        mood: state.mood,
        streak: state.streak,
        tier,
    });

    // 3. experience
    let commit_xp = f64::from(daily.commits)
        * balance.xp_per_commit
        * multipliers.xp
        * summary.commit_quality.score;
    let pr_xp = f64::from(daily.prs) * balance.xp_per_pr * multipliers.xp;
    let issue_xp = f64::from(issues.closed) * balance.xp_per_issue_closed * multipliers.xp;
    let total_xp = (commit_xp + pr_xp + issue_xp)
        * summary.languages.diversity_penalty
        * issues.score;

    // 4. daily decay
    state.hunger = (state.hunger - balance.daily_hunger_decay).max(0.0);
    state.happiness = (state.happiness - balance.daily_happiness_decay).max(0.0);

    // 5. energy, one net step
    let energy_cost =
        f64::from(daily.commits) * balance.energy_cost_commit + f64::from(daily.prs) * balance.energy_cost_pr;
    let regen = if energy_cost == 0.0 {
        balance.energy_regen_rest
    } else {
        balance.energy_regen_active
    };
    state.energy = (state.energy - energy_cost + regen).clamp(0.0, 100.0);

    // 6. rewards
    state.hunger = (state.hunger + total_xp * balance.hunger_gain_modifier).min(100.0);
    state.happiness = (state.happiness + pr_xp * balance.happiness_gain_modifier).min(100.0);

    // 7. health
    state.health = (state.hunger + state.happiness + state.energy) / 3.0;

    // 8. streak
    if daily.is_active() {
        state.streak += 1;
    } else {
        let loss = (state.streak / balance.streak_loss_divisor.max(1)).max(1);
        state.streak = state.streak.saturating_sub(loss);
    }

    // 9. permanent counter and level
    state.total_commits += u64::from(daily.raw_commits);
    let level = level_for(state.total_commits, multipliers.requirements, balance);
    state.level = state.level.max(level).min(balance.max_level);

    // 10. snapshot
    state.brutal_stats = BrutalStats {
        tier,
        github_years,
        social_score: social.score,
        social_penalties: social.penalties,
        avg_repo_quality: summary.avg_repo_quality,
        commit_quality_score: summary.commit_quality.score,
        commit_quality_penalties: summary.commit_quality.penalties.clone(),
        multipliers,
        total_stars: summary.total_stars,
        language_diversity_penalty: summary.languages.diversity_penalty,
        xp_earned: total_xp,
        dominant_language: summary.languages.dominant.clone(),
        issues_closed: issues.closed,
        issue_close_ratio: issues.close_ratio,
        issue_score: issues.score,
        can_prestige: false,
        prestige_missing: Vec::new(),
    };

    // 11. mood
    state.mood = select_mood(state.health, state.energy, &state.brutal_stats);

    // 12. achievements
    let run = RunContext {
        github_years,
        is_weekend: is_weekend(now),
        hour: now.hour(),
        raw_commits: daily.raw_commits,
    };
    let newly_unlocked = achievements::unlock_new(state, &run);

    // 13. prestige eligibility
    let requirements = PrestigeRequirements {
        level: balance.max_level,
        ..PrestigeRequirements::default()
    };
    let (can_prestige, missing) = requirements.check(state.level, &state.brutal_stats);
    state.brutal_stats.can_prestige = can_prestige;
    state.brutal_stats.prestige_missing = missing;

    // 14. timestamp
    state.last_update = Some(now.to_rfc3339());

    info!(
        "Update: tier {} ({:.1}y), health {:.0}%, mood {}, {:.0} XP",
        tier, github_years, state.health, state.mood, total_xp
    );
    for achievement in &newly_unlocked {
        info!("Achievement unlocked: {}", achievement.badge());
    }

    UpdateOutcome {
        xp_earned: total_xp,
        newly_unlocked,
    }
}
