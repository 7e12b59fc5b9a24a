//! Achievement catalogue and unlock checks
//!
//! Badges are stored in the state as `"<emoji> <name>"` strings. Once a badge
//! is in the list it stays there.

use crate::scoring::Tier;
use crate::state::PetState;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }

    /// Accent colour used for borders and labels
    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Common => "#6b7280",
            Rarity::Uncommon => "#10b981",
            Rarity::Rare => "#3b82f6",
            Rarity::Epic => "#8b5cf6",
            Rarity::Legendary => "#f59e0b",
        }
    }

    /// Light background tint
    pub fn background(&self) -> &'static str {
        match self {
            Rarity::Common => "#f3f4f6",
            Rarity::Uncommon => "#d1fae5",
            Rarity::Rare => "#dbeafe",
            Rarity::Epic => "#ede9fe",
            Rarity::Legendary => "#fef3c7",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unlock condition of a badge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unlock {
    Tier(Tier),
    MinYears(f64),
    SocialAbove(f64),
    RepoQualityAbove(f64),
    StreakAtLeast(u32),
    PrestigeAtLeast(u32),
    IssueCloser { ratio_above: f64, min_closed: u32 },
    CommitsAtLeast(u64),
    StarsAtLeast(u64),
    HealthAtLeast(f64),
    LevelAtLeast(u32),
    WeekendCommit,
    NightCommit,
}

/// Run facts that are not part of the stored state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunContext {
    pub github_years: f64,
    pub is_weekend: bool,
    /// Hour of the run, UTC
    pub hour: u32,
    pub raw_commits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Achievement {
    pub id: &'static str,
    pub emoji: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub unlock: Unlock,
}

impl Achievement {
    /// The string stored in `PetState::achievements`
    pub fn badge(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }

    /// File name stem for the badge card, e.g. `first-steps`
    pub fn file_stem(&self) -> String {
        self.id.replace('_', "-")
    }

    /// A stored badge names this achievement; older files may carry a
    /// different emoji, so the name alone is enough.
    pub fn matches_badge(&self, stored: &str) -> bool {
        stored == self.badge()
            || stored
                .strip_suffix(self.name)
                .is_some_and(|prefix| prefix.ends_with(' '))
    }

    pub fn is_unlocked(&self, achievements: &[String]) -> bool {
        achievements.iter().any(|stored| self.matches_badge(stored))
    }

    pub fn is_met(&self, state: &PetState, run: &RunContext) -> bool {
        let stats = &state.brutal_stats;
        match self.unlock {
            Unlock::Tier(tier) => stats.tier == tier,
            Unlock::MinYears(years) => run.github_years >= years,
            Unlock::SocialAbove(score) => stats.social_score > score,
            Unlock::RepoQualityAbove(quality) => stats.avg_repo_quality > quality,
            Unlock::StreakAtLeast(days) => state.streak >= days,
            Unlock::PrestigeAtLeast(level) => state.prestige_level >= level,
            Unlock::IssueCloser {
                ratio_above,
                min_closed,
            } => stats.issue_close_ratio > ratio_above && stats.issues_closed >= min_closed,
            Unlock::CommitsAtLeast(commits) => state.total_commits >= commits,
            Unlock::StarsAtLeast(stars) => stats.total_stars >= stars,
            Unlock::HealthAtLeast(health) => state.health >= health,
            Unlock::LevelAtLeast(level) => state.level >= level,
            Unlock::WeekendCommit => run.is_weekend && run.raw_commits > 0,
            Unlock::NightCommit => (run.hour >= 23 || run.hour <= 5) && run.raw_commits > 0,
        }
    }
}

pub static CATALOGUE: [Achievement; 17] = [
    Achievement {
        id: "elder_council",
        emoji: "🧙\u{200d}\u{2642}\u{fe0f}",
        name: "Elder Council",
        description: "Reached the elder tier",
        rarity: Rarity::Legendary,
        unlock: Unlock::Tier(Tier::Elder),
    },
    Achievement {
        id: "decade_survivor",
        emoji: "💀",
        name: "Decade Survivor",
        description: "Ten years on GitHub",
        rarity: Rarity::Legendary,
        unlock: Unlock::MinYears(10.0),
    },
    Achievement {
        id: "social_elite",
        emoji: "👑",
        name: "Social Elite",
        description: "Social score above 1.2",
        rarity: Rarity::Epic,
        unlock: Unlock::SocialAbove(1.2),
    },
    Achievement {
        id: "quality_craftsman",
        emoji: "💎",
        name: "Quality Craftsman",
        description: "Average repository quality above 0.8",
        rarity: Rarity::Epic,
        unlock: Unlock::RepoQualityAbove(0.8),
    },
    Achievement {
        id: "century_streak",
        emoji: "🔥",
        name: "Century Streak",
        description: "100 day streak",
        rarity: Rarity::Legendary,
        unlock: Unlock::StreakAtLeast(100),
    },
    Achievement {
        id: "prestige_master",
        emoji: "⭐",
        name: "Prestige Master",
        description: "Prestiged at least once",
        rarity: Rarity::Legendary,
        unlock: Unlock::PrestigeAtLeast(1),
    },
    Achievement {
        id: "bug_slayer",
        emoji: "🐛",
        name: "Bug Slayer",
        description: "Closed at least 5 issues with a close ratio above 0.8",
        rarity: Rarity::Rare,
        unlock: Unlock::IssueCloser {
            ratio_above: 0.8,
            min_closed: 5,
        },
    },
    Achievement {
        id: "first_steps",
        emoji: "🚀",
        name: "First Steps",
        description: "First commit counted",
        rarity: Rarity::Common,
        unlock: Unlock::CommitsAtLeast(1),
    },
    Achievement {
        id: "weekly_warrior",
        emoji: "📅",
        name: "Weekly Warrior",
        description: "7 day streak",
        rarity: Rarity::Uncommon,
        unlock: Unlock::StreakAtLeast(7),
    },
    Achievement {
        id: "monthly_master",
        emoji: "💪",
        name: "Monthly Master",
        description: "30 day streak",
        rarity: Rarity::Rare,
        unlock: Unlock::StreakAtLeast(30),
    },
    Achievement {
        id: "century_club",
        emoji: "💯",
        name: "Century Club",
        description: "100 commits counted",
        rarity: Rarity::Uncommon,
        unlock: Unlock::CommitsAtLeast(100),
    },
    Achievement {
        id: "commit_crusher",
        emoji: "🎯",
        name: "Commit Crusher",
        description: "1000 commits counted",
        rarity: Rarity::Epic,
        unlock: Unlock::CommitsAtLeast(1000),
    },
    Achievement {
        id: "star_collector",
        emoji: "🌟",
        name: "Star Collector",
        description: "100 stars on own repositories",
        rarity: Rarity::Epic,
        unlock: Unlock::StarsAtLeast(100),
    },
    Achievement {
        id: "perfect_care",
        emoji: "💚",
        name: "Perfect Care",
        description: "Health at 99% or more",
        rarity: Rarity::Rare,
        unlock: Unlock::HealthAtLeast(99.0),
    },
    Achievement {
        id: "max_level",
        emoji: "🏆",
        name: "Max Level",
        description: "Reached level 10",
        rarity: Rarity::Legendary,
        unlock: Unlock::LevelAtLeast(10),
    },
    Achievement {
        id: "weekend_warrior",
        emoji: "🏖️",
        name: "Weekend Warrior",
        description: "Committed on a weekend",
        rarity: Rarity::Uncommon,
        unlock: Unlock::WeekendCommit,
    },
    Achievement {
        id: "night_owl",
        emoji: "🦉",
        name: "Night Owl",
        description: "Committed late at night",
        rarity: Rarity::Uncommon,
        unlock: Unlock::NightCommit,
    },
];

/// Look up a catalogue entry by its stored badge string
pub fn find_by_badge(badge: &str) -> Option<&'static Achievement> {
    CATALOGUE
        .iter()
        .find(|achievement| achievement.matches_badge(badge))
}

/// Append every newly met badge in catalogue order; returns the new ones
pub fn unlock_new(state: &mut PetState, run: &RunContext) -> Vec<&'static Achievement> {
    let mut unlocked = Vec::new();

    for achievement in &CATALOGUE {
        if achievement.is_unlocked(&state.achievements) || !achievement.is_met(state, run) {
            continue;
        }
        state.achievements.push(achievement.badge());
        unlocked.push(achievement);
    }

    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> RunContext {
        RunContext {
            github_years: 1.0,
            is_weekend: false,
            hour: 12,
            raw_commits: 0,
        }
    }

    #[test]
    fn test_catalogue_ids_are_unique() {
        let mut ids: Vec<&str> = CATALOGUE.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATALOGUE.len());
    }

    #[test]
    fn test_unlocks_in_catalogue_order_once() {
        let mut state = PetState {
            total_commits: 150,
            streak: 8,
            ..PetState::default()
        };

        let first = unlock_new(&mut state, &run());
        let names: Vec<&str> = first.iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["First Steps", "Weekly Warrior", "Century Club"]);
        assert_eq!(state.achievements[0], "🚀 First Steps");

        let second = unlock_new(&mut state, &run());
        assert!(second.is_empty());
        assert_eq!(state.achievements.len(), 3);
    }

    #[test]
    fn test_legacy_badge_is_not_duplicated() {
        let mut state = PetState {
            streak: 7,
            achievements: vec!["🔥 Weekly Warrior".into()],
            ..PetState::default()
        };
        assert!(unlock_new(&mut state, &run()).is_empty());
    }

    #[test]
    fn test_time_based_badges_need_commits() {
        let mut state = PetState::default();
        let idle_night = RunContext {
            hour: 2,
            is_weekend: true,
            ..run()
        };
        assert!(unlock_new(&mut state, &idle_night).is_empty());

        let busy_night = RunContext {
            raw_commits: 1,
            ..idle_night
        };
        let names: Vec<&str> = unlock_new(&mut state, &busy_night)
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(names, vec!["weekend_warrior", "night_owl"]);
    }

    #[test]
    fn test_bug_slayer_needs_both_conditions() {
        let mut state = PetState::default();
        state.brutal_stats.issue_close_ratio = 0.9;
        state.brutal_stats.issues_closed = 4;
        let bug_slayer = &CATALOGUE[6];
        assert!(!bug_slayer.is_met(&state, &run()));
        state.brutal_stats.issues_closed = 5;
        assert!(bug_slayer.is_met(&state, &run()));
    }

    #[test]
    fn test_badge_lookup_and_file_stem() {
        let found = find_by_badge("🏆 Max Level").unwrap();
        assert_eq!(found.file_stem(), "max-level");
        assert_eq!(found.rarity, Rarity::Legendary);
        assert!(find_by_badge("🙃 Unknown").is_none());
    }
}
