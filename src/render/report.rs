//! Markdown status report (`CODEY_REPORT.md`)

use super::{mood_emoji, prestige_stars, tier_emoji, RenderContext};
use crate::engine::achievements::find_by_badge;
use crate::state::PetState;
use std::fmt;

/// History rows shown in the report, newest first
const HISTORY_ROWS: usize = 7;

fn stat_bar(value: f64) -> String {
    let filled = (value.clamp(0.0, 100.0) / 10.0).round() as usize;
    format!("{}{}", "▰".repeat(filled), "▱".repeat(10 - filled))
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn prestige_section(out: &mut fmt::Formatter<'_>, state: &PetState) -> fmt::Result {
    let stats = &state.brutal_stats;
    writeln!(out, "## Prestige\n")?;
    writeln!(
        out,
        "- Prestige level: {}{}",
        state.prestige_level,
        if state.prestige_level > 0 {
            format!(" {}", prestige_stars(state.prestige_level, "⭐"))
        } else {
            String::new()
        }
    )?;
    if stats.can_prestige {
        writeln!(out, "- Status: **ready**, run `codey prestige` to reset for a star")?;
    } else {
        writeln!(out, "- Status: locked")?;
        writeln!(out, "- Missing: {}", list_or_none(&stats.prestige_missing))?;
    }
    writeln!(out)
}

fn achievements_section(out: &mut fmt::Formatter<'_>, state: &PetState) -> fmt::Result {
    writeln!(out, "## Achievements ({})\n", state.achievements.len())?;
    if state.achievements.is_empty() {
        return writeln!(out, "_None yet_\n");
    }
    for badge in &state.achievements {
        match find_by_badge(badge) {
            Some(achievement) => writeln!(
                out,
                "- {} _({})_: {}",
                badge, achievement.rarity, achievement.description
            )?,
            None => writeln!(out, "- {badge}")?,
        }
    }
    writeln!(out)
}

fn history_section(out: &mut fmt::Formatter<'_>, state: &PetState) -> fmt::Result {
    writeln!(out, "## Recent history\n")?;
    if state.history.is_empty() {
        return writeln!(out, "_No runs recorded yet_\n");
    }
    writeln!(out, "| Date | Commits | PRs | Health | Mood | Streak | Tier |")?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for entry in state.history.iter().rev().take(HISTORY_ROWS) {
        let date = entry
            .timestamp()
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| entry.timestamp.clone());
        writeln!(
            out,
            "| {} | {} | {} | {:.1} | {} | {} | {} |",
            date, entry.daily_commits, entry.daily_prs, entry.health, entry.mood, entry.streak, entry.tier
        )?;
    }
    writeln!(out)
}

fn write_report(out: &mut fmt::Formatter<'_>, state: &PetState, context: &RenderContext) -> fmt::Result {
    let stats = &state.brutal_stats;

    writeln!(
        out,
        "# {} Codey: Level {} {}\n",
        tier_emoji(stats.tier),
        state.level,
        mood_emoji(state.mood)
    )?;
    writeln!(out, "> Generated: {}  ", context.timestamp())?;
    if let Some(season) = context.season {
        writeln!(out, "> Season: {} {} (x{})", season.emoji, season.name, season.multiplier)?;
    }
    writeln!(out)?;

    writeln!(out, "- Tier: **{}** ({:.1} years on GitHub)", stats.tier.as_str().to_uppercase(), stats.github_years)?;
    writeln!(out, "- Mood: **{}**", state.mood.title())?;
    writeln!(out, "- Dominant language: {}", stats.dominant_language)?;
    writeln!(out)?;

    writeln!(out, "## Stats\n")?;
    writeln!(out, "| Stat | Value | |")?;
    writeln!(out, "|---|---|---|")?;
    for (name, value) in [
        ("❤️ Health", state.health),
        ("🍖 Hunger", state.hunger),
        ("😊 Happiness", state.happiness),
        ("⚡ Energy", state.energy),
    ] {
        writeln!(out, "| {} | {:.1} | {} |", name, value, stat_bar(value))?;
    }
    writeln!(out, "| 👥 Social | {:.2} | |", stats.social_score)?;
    writeln!(out, "| 💎 Repo quality | {:.2} | |", stats.avg_repo_quality)?;
    writeln!(out, "| ✍️ Commit quality | {:.2} | |", stats.commit_quality_score)?;
    writeln!(out)?;

    writeln!(out, "## Activity\n")?;
    writeln!(out, "- Streak: {} days", state.streak)?;
    writeln!(out, "- Total commits: {}", state.total_commits)?;
    writeln!(out, "- Stars: {}", stats.total_stars)?;
    writeln!(
        out,
        "- Issues closed: {} (close ratio {:.2})",
        stats.issues_closed, stats.issue_close_ratio
    )?;
    writeln!(
        out,
        "- XP last run: {:.1} (x{:.2} multiplier)",
        stats.xp_earned, stats.multipliers.xp
    )?;
    writeln!(out, "- Social penalties: {}", list_or_none(&stats.social_penalties))?;
    writeln!(out, "- Commit penalties: {}", list_or_none(&stats.commit_quality_penalties))?;
    writeln!(out)?;

    prestige_section(out, state)?;
    achievements_section(out, state)?;
    history_section(out, state)
}

struct Report<'a> {
    state: &'a PetState,
    context: &'a RenderContext,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self.state, self.context)
    }
}

/// Render the Markdown status report
pub fn render_report(state: &PetState, context: &RenderContext) -> String {
    Report { state, context }.to_string()
}
