//! Terminal-style card with block-character bars

use super::svg::{circle, document, group, rect, text, translate, Element};
use super::{
    badge_icon, pet_emoji, prestige_stars, RenderContext, Theme, CANVAS_HEIGHT, CANVAS_WIDTH,
};
use crate::state::PetState;

const SEGMENTS: usize = 20;
const SHOWN_ACHIEVEMENTS: usize = 5;
const MONO: &str = "Courier New,monospace";
const SCREEN: &str = "#080010";
const PANEL: &str = "#0c0018";
const NEON: &str = "#bf00ff";
const LILAC: &str = "#e0aaff";
const PINK: &str = "#ff88dd";

const ANIMATIONS: &str = "@keyframes breathe { 0%,100% { transform: translateY(0); } 50% { transform: translateY(-7px); } } \
@keyframes cur { 0%,49% { opacity: 1; } 50%,100% { opacity: 0; } } \
.bot-body { animation: breathe 3.2s ease-in-out infinite; } \
.cursor { animation: cur 1s step-end infinite; }";

pub struct TerminalTheme;

/// `filled` of [`SEGMENTS`] blocks, the rest shaded
fn block_bar(filled: usize) -> String {
    let filled = filled.min(SEGMENTS);
    format!("{}{}", "█".repeat(filled), "░".repeat(SEGMENTS - filled))
}

/// Bar for a value in [0, 100]
fn percent_bar(value: f64) -> String {
    block_bar((value.clamp(0.0, 100.0) / 100.0 * SEGMENTS as f64) as usize)
}

fn stat_row(y: f64, label: &str, bar: String, value: String) -> Element {
    group()
        .child(text(0.0, y, label).attr("opacity", 0.65))
        .child(text(80.0, y, format!("[{bar}]")))
        .child(
            text(374.0, y, value)
                .attr("font-size", 11)
                .attr("opacity", 0.55)
                .attr("text-anchor", "end")
                .attr("fill", PINK),
        )
}

fn robot(state: &PetState) -> Element {
    let stats = &state.brutal_stats;
    group()
        .attr("class", "bot-body")
        .child(rect(72.0, 215.0, 72.0, 85.0).attr("rx", 22).attr("fill", "#9922cc"))
        .child(rect(88.0, 295.0, 16.0, 30.0).attr("rx", 8).attr("fill", "#9922cc"))
        .child(rect(116.0, 295.0, 16.0, 30.0).attr("rx", 8).attr("fill", "#9922cc"))
        .child(rect(64.0, 130.0, 88.0, 78.0).attr("rx", 28).attr("fill", "#b040ee"))
        .child(
            rect(74.0, 142.0, 68.0, 52.0)
                .attr("rx", 14)
                .attr("fill", "#1a0030")
                .attr("stroke", "#cc44ff"),
        )
        .child(circle(89.0, 168.0, 10.0).attr("fill", LILAC))
        .child(circle(127.0, 168.0, 10.0).attr("fill", LILAC))
        .child(
            Element::new("line")
                .num("x1", 108.0)
                .num("y1", 130.0)
                .num("x2", 108.0)
                .num("y2", 102.0)
                .attr("stroke", "#cc44ff")
                .attr("stroke-width", 3),
        )
        .child(circle(108.0, 94.0, 8.0).attr("fill", "#ff44cc"))
        .child(
            text(108.0, 268.0, pet_emoji(&stats.dominant_language))
                .attr("text-anchor", "middle")
                .attr("font-size", 28),
        )
        .child(
            text(
                108.0,
                358.0,
                format!("{} • {:.1}y", state.mood.as_str().to_uppercase(), stats.github_years),
            )
            .attr("text-anchor", "middle")
            .attr("font-family", MONO)
            .attr("font-size", 11)
            .attr("fill", LILAC),
        )
}

fn achievement_icons(state: &PetState) -> Element {
    group().children(
        state
            .recent_achievements(SHOWN_ACHIEVEMENTS)
            .iter()
            .enumerate()
            .map(|(i, badge)| {
                let x = 22.0 + i as f64 * 46.0;
                let ring = if i % 2 == 0 { LILAC } else { PINK };
                group()
                    .child(
                        circle(x, 30.0, 19.0)
                            .attr("fill", PANEL)
                            .attr("stroke", ring)
                            .attr("stroke-width", 1.5),
                    )
                    .child(
                        text(x, 37.0, badge_icon(badge))
                            .attr("text-anchor", "middle")
                            .attr("font-size", 17),
                    )
            }),
    )
}

fn console(state: &PetState, context: &RenderContext) -> Element {
    let stats = &state.brutal_stats;
    let tier = stats.tier.as_str().to_uppercase();
    let social_blocks = (stats.social_score * 10.0).clamp(0.0, SEGMENTS as f64) as usize;
    let quality_blocks = (stats.avg_repo_quality * SEGMENTS as f64).clamp(0.0, SEGMENTS as f64) as usize;
    let penalties = match stats.social_penalties.as_slice() {
        [] => "None".to_string(),
        list => list.iter().take(2).cloned().collect::<Vec<_>>().join(", "),
    };
    let season = context
        .season
        .map(|s| format!("SEASON={} {} x{}", s.emoji, s.name, s.multiplier))
        .unwrap_or_default();

    group()
        .attr("transform", translate(232.0, 50.0))
        .attr("font-family", MONO)
        .attr("fill", LILAC)
        .child(text(0.0, 16.0, "user@codey:~$ cat stats.log").attr("font-size", 13).attr("font-weight", "bold"))
        .child(
            rect(0.0, 22.0, 376.0, 34.0)
                .attr("rx", 4)
                .attr("fill", NEON)
                .attr("fill-opacity", 0.1)
                .attr("stroke", NEON),
        )
        .child(
            text(
                8.0,
                35.0,
                format!(
                    "[{}] LVL {} • {:.1}y • XP={:.2}x • {} PRESTIGE",
                    tier,
                    state.level,
                    stats.github_years,
                    stats.multipliers.xp,
                    prestige_stars(state.prestige_level, "★")
                ),
            )
            .attr("font-size", 11)
            .attr("font-weight", "bold"),
        )
        .child(
            text(8.0, 50.0, format!("MOOD={}", state.mood.as_str().to_uppercase()))
                .attr("font-size", 11)
                .attr("font-weight", "bold")
                .attr("fill", PINK),
        )
        .child(
            group()
                .attr("transform", translate(0.0, 64.0))
                .attr("font-size", 12)
                .child(stat_row(0.0, "health", percent_bar(state.health), format!("{:.0}%", state.health)))
                .child(stat_row(22.0, "hunger", percent_bar(state.hunger), format!("{:.0}%", state.hunger)))
                .child(stat_row(
                    44.0,
                    "happiness",
                    percent_bar(state.happiness),
                    format!("{:.0}%", state.happiness),
                ))
                .child(stat_row(66.0, "energy", percent_bar(state.energy), format!("{:.0}%", state.energy)))
                .child(stat_row(
                    88.0,
                    "social",
                    block_bar(social_blocks),
                    format!("{:.2}", stats.social_score),
                ))
                .child(stat_row(
                    110.0,
                    "quality",
                    block_bar(quality_blocks),
                    format!("{:.2}", stats.avg_repo_quality),
                )),
        )
        .child(
            group()
                .attr("transform", translate(0.0, 198.0))
                .attr("font-size", 12)
                .child(text(0.0, 0.0, "$ cat activity.log").attr("font-size", 11).attr("opacity", 0.5))
                .child(text(
                    0.0,
                    20.0,
                    format!(
                        "STREAK={}d • COMMITS={} • STARS={}",
                        state.streak, state.total_commits, stats.total_stars
                    ),
                ))
                .child(text(0.0, 40.0, format!("DOMINANT={} • TIER={}", stats.dominant_language, tier)))
                .child(text(0.0, 60.0, format!("PENALTIES={penalties}")))
                .child(text(0.0, 80.0, season).attr("fill", PINK)),
        )
        .child(
            group()
                .attr("transform", translate(0.0, 300.0))
                .child(text(0.0, 0.0, "$ ls ./achievements/").attr("font-size", 11).attr("opacity", 0.5))
                .child(achievement_icons(state)),
        )
        .child(
            group()
                .attr("transform", translate(0.0, 366.0))
                .child(
                    text(0.0, 16.0, "$ _")
                        .attr("font-size", 13)
                        .attr("font-weight", "bold"),
                )
                .child(
                    text(22.0, 16.0, "█")
                        .attr("class", "cursor")
                        .attr("font-size", 13),
                )
                .child(
                    text(374.0, 16.0, context.timestamp())
                        .attr("font-size", 10)
                        .attr("opacity", 0.45)
                        .attr("text-anchor", "end")
                        .attr("fill", NEON),
                ),
        )
}

impl Theme for TerminalTheme {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn render(&self, state: &PetState, context: &RenderContext) -> String {
        let header = format!(
            "root@codey:~$ ./status --user {} --lvl {} --prestige {}",
            state.brutal_stats.tier.as_str().to_uppercase(),
            state.level,
            state.prestige_level
        );

        document(CANVAS_WIDTH, CANVAS_HEIGHT)
            .child(Element::new("defs").child(Element::new("style").text(ANIMATIONS)))
            .child(rect(0.0, 0.0, f64::from(CANVAS_WIDTH), f64::from(CANVAS_HEIGHT)).attr("fill", SCREEN))
            .child(
                rect(15.0, 15.0, 600.0, 443.0)
                    .attr("fill", PANEL)
                    .attr("stroke", NEON)
                    .attr("stroke-width", 1.5),
            )
            .child(rect(15.0, 15.0, 600.0, 28.0).attr("fill", NEON).attr("opacity", 0.08))
            .child(
                text(26.0, 34.0, header)
                    .attr("fill", LILAC)
                    .attr("font-family", MONO)
                    .attr("font-size", 12)
                    .attr("font-weight", "bold"),
            )
            .child(
                Element::new("line")
                    .num("x1", 220.0)
                    .num("y1", 44.0)
                    .num("x2", 220.0)
                    .num("y2", 455.0)
                    .attr("stroke", NEON)
                    .attr("stroke-dasharray", "4 3")
                    .attr("opacity", 0.3),
            )
            .child(robot(state))
            .child(console(state, context))
            .render()
    }
}
