//! The default dark card

use super::svg::{circle, document, group, rect, text, translate, Element};
use super::{
    badge_icon, mood_emoji, pet_emoji, prestige_stars, tier_color, tier_emoji, RenderContext, Theme,
    CANVAS_HEIGHT, CANVAS_WIDTH,
};
use crate::state::PetState;

const BACKGROUND: &str = "#0d1117";
const CARD: &str = "#161b22";
const TEXT: &str = "#f0f6fc";
const SECONDARY_TEXT: &str = "#8b949e";
const BORDER: &str = "#30363d";
const TRACK: &str = "#21262d";
const HEALTH: &str = "#f85149";
const HUNGER: &str = "#ffa657";
const HAPPINESS: &str = "#a855f7";
const ENERGY: &str = "#3fb950";

const BAR_WIDTH: f64 = 330.0;
const SHOWN_ACHIEVEMENTS: usize = 4;

pub struct DefaultTheme;

/// Width of a bar for a value in [0, 100]
fn bar_width(value: f64) -> f64 {
    (value * 3.3).clamp(0.0, BAR_WIDTH)
}

fn stat_bar(y: f64, label: &str, value_label: String, fill_width: f64, color: &str) -> Element {
    group()
        .child(
            text(0.0, y, label)
                .attr("fill", TEXT)
                .attr("font-weight", "bold")
                .attr("font-size", 14),
        )
        .child(
            text(BAR_WIDTH, y, value_label)
                .attr("fill", SECONDARY_TEXT)
                .attr("font-size", 12)
                .attr("text-anchor", "end"),
        )
        .child(rect(0.0, y + 5.0, BAR_WIDTH, 12.0).attr("fill", TRACK).attr("rx", 6))
        .child(rect(0.0, y + 5.0, fill_width, 12.0).attr("fill", color).attr("rx", 6))
}

fn achievements_row(state: &PetState) -> Element {
    let shown = state.recent_achievements(SHOWN_ACHIEVEMENTS);
    let (width, gap) = (35.0, 10.0);
    let start_x = 580.0 - shown.len() as f64 * (width + gap);

    group().children(shown.iter().enumerate().map(|(i, badge)| {
        let x = start_x + i as f64 * (width + gap) + width / 2.0;
        text(x, 48.0, badge_icon(badge))
            .attr("text-anchor", "middle")
            .attr("fill", TEXT)
            .attr("font-size", 20)
    }))
}

fn season_pill(context: &RenderContext, accent: &str) -> Option<Element> {
    let season = context.season?;
    let width = 150.0;
    Some(
        group()
            .child(
                rect(120.0 - width / 2.0, 10.0, width, 35.0)
                    .attr("rx", 17.5)
                    .attr("fill", accent)
                    .attr("opacity", 0.9)
                    .attr("stroke", BORDER)
                    .attr("stroke-width", 1.5),
            )
            .child(
                text(120.0, 33.0, format!("{} {}", season.emoji, season.name))
                    .attr("text-anchor", "middle")
                    .attr("fill", TEXT)
                    .attr("font-size", 12)
                    .attr("font-weight", "bold"),
            ),
    )
}

fn prestige_line(state: &PetState, accent: &str) -> Option<Element> {
    let line = if state.prestige_level > 0 {
        let stars = prestige_stars(state.prestige_level, "⭐");
        text(315.0, 85.0, format!("{stars} PRESTIGE {stars}"))
            .attr("fill", accent)
            .attr("font-size", 14)
    } else if state.brutal_stats.can_prestige {
        text(315.0, 85.0, "✨ PRESTIGE READY ✨")
            .attr("fill", ENERGY)
            .attr("font-size", 12)
    } else {
        return None;
    };
    Some(line.attr("text-anchor", "middle").attr("font-weight", "bold"))
}

fn pet_area(state: &PetState, accent: &str) -> Element {
    let stats = &state.brutal_stats;
    group()
        .attr("transform", translate(0.0, 84.0))
        .child(
            circle(120.0, 150.0, 57.5)
                .attr("fill", TRACK)
                .attr("stroke", accent)
                .attr("stroke-width", 3),
        )
        .child(
            text(120.0, 176.0, pet_emoji(&stats.dominant_language))
                .attr("text-anchor", "middle")
                .attr("font-size", 65),
        )
        .child(
            circle(120.0, 225.0, 25.0)
                .attr("fill", TRACK)
                .attr("stroke", BORDER)
                .attr("stroke-width", 1),
        )
        .child(
            text(120.0, 233.0, mood_emoji(state.mood))
                .attr("text-anchor", "middle")
                .attr("font-size", 25),
        )
        .child(
            text(
                120.0,
                270.0,
                format!("{} • {:.1}y", state.mood.title(), stats.github_years),
            )
            .attr("text-anchor", "middle")
            .attr("fill", SECONDARY_TEXT)
            .attr("font-size", 11),
        )
}

fn stat_bars(state: &PetState, accent: &str) -> Element {
    let stats = &state.brutal_stats;
    group()
        .attr("transform", translate(205.0, 120.0))
        .child(stat_bar(20.0, "❤️ Health", format!("{:.0}%", state.health), bar_width(state.health), HEALTH))
        .child(stat_bar(55.0, "🍖 Hunger", format!("{:.0}%", state.hunger), bar_width(state.hunger), HUNGER))
        .child(stat_bar(
            90.0,
            "😊 Happiness",
            format!("{:.0}%", state.happiness),
            bar_width(state.happiness),
            HAPPINESS,
        ))
        .child(stat_bar(125.0, "⚡ Energy", format!("{:.0}%", state.energy), bar_width(state.energy), ENERGY))
        .child(stat_bar(
            160.0,
            "👥 Social",
            format!("{:.2}", stats.social_score),
            (stats.social_score * 165.0).clamp(0.0, BAR_WIDTH),
            accent,
        ))
        .child(stat_bar(
            195.0,
            "💎 Quality",
            format!("{:.2}", stats.avg_repo_quality),
            bar_width(stats.avg_repo_quality * 100.0),
            HAPPINESS,
        ))
}

fn footer(state: &PetState, context: &RenderContext) -> Element {
    let stats = &state.brutal_stats;
    let penalties = if stats.social_penalties.is_empty() {
        "None".to_string()
    } else {
        stats
            .social_penalties
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut activity = format!(
        "🗓️ {} day streak • 📊 {} commits • ⭐ {} stars",
        state.streak, state.total_commits, stats.total_stars
    );
    if stats.issues_closed > 0 {
        activity.push_str(&format!(" • 🐛 {} issues closed", stats.issues_closed));
    }

    group()
        .child(
            group()
                .attr("transform", translate(315.0, 375.0))
                .attr("text-anchor", "middle")
                .child(
                    text(0.0, 0.0, "PET STATUS:")
                        .attr("fill", TEXT)
                        .attr("font-size", 13)
                        .attr("font-weight", "bold"),
                )
                .child(
                    text(
                        0.0,
                        15.0,
                        format!(
                            "Tier: {} • XP Mult: {:.2}x • Penalties: {}",
                            stats.tier.as_str().to_uppercase(),
                            stats.multipliers.xp,
                            penalties
                        ),
                    )
                    .attr("fill", SECONDARY_TEXT)
                    .attr("font-size", 11),
                ),
        )
        .child(
            text(315.0, 413.0, activity)
                .attr("text-anchor", "middle")
                .attr("fill", TEXT)
                .attr("font-size", 14),
        )
        .child(
            text(
                315.0,
                438.0,
                format!(
                    "Last Update: {} • Dominant: {}",
                    context.timestamp(),
                    stats.dominant_language
                ),
            )
            .attr("text-anchor", "middle")
            .attr("fill", SECONDARY_TEXT)
            .attr("font-size", 12),
        )
}

impl Theme for DefaultTheme {
    fn name(&self) -> &'static str {
        "default"
    }

    fn render(&self, state: &PetState, context: &RenderContext) -> String {
        let tier = state.brutal_stats.tier;
        let accent = tier_color(tier);

        document(CANVAS_WIDTH, CANVAS_HEIGHT)
            .attr("font-family", "system-ui, -apple-system, sans-serif")
            .child(
                rect(0.0, 0.0, f64::from(CANVAS_WIDTH), f64::from(CANVAS_HEIGHT))
                    .attr("fill", BACKGROUND)
                    .attr("rx", 15),
            )
            .child(
                rect(20.0, 20.0, 590.0, 433.0)
                    .attr("fill", CARD)
                    .attr("rx", 12)
                    .attr("stroke", BORDER)
                    .attr("stroke-width", 1),
            )
            .child_opt(season_pill(context, accent))
            .child(
                text(40.0, 75.0, format!("{} CODEY Level {}", tier_emoji(tier), state.level))
                    .attr("fill", TEXT)
                    .attr("font-size", 18)
                    .attr("font-weight", "bold"),
            )
            .child_opt(prestige_line(state, accent))
            .child(achievements_row(state))
            .child(pet_area(state, accent))
            .child(stat_bars(state, accent))
            .child(footer(state, context))
            .render()
    }
}
