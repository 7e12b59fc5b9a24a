//! Per-achievement badge cards

use super::svg::{document, rect, text, Element};
use super::write_artifact;
use crate::engine::achievements::Achievement;
use crate::errors::Result;
use std::path::{Path, PathBuf};
use tracing::info;

const WIDTH: u32 = 300;
const HEIGHT: u32 = 120;

/// Render the 300×120 card for one achievement
pub fn render_badge(achievement: &Achievement) -> String {
    let rarity = achievement.rarity;
    let label = rarity.as_str().to_uppercase();
    let label_len = label.chars().count() as f64;

    let gradient = Element::new("linearGradient")
        .attr("id", "bg")
        .attr("x1", "0%")
        .attr("y1", "0%")
        .attr("x2", "100%")
        .attr("y2", "100%")
        .child(
            Element::new("stop")
                .attr("offset", "0%")
                .attr("style", format!("stop-color:{};stop-opacity:1", rarity.background())),
        )
        .child(
            Element::new("stop")
                .attr("offset", "100%")
                .attr("style", "stop-color:#ffffff;stop-opacity:1"),
        );
    let glow = Element::new("filter")
        .attr("id", "glow")
        .child(
            Element::new("feGaussianBlur")
                .attr("stdDeviation", 3)
                .attr("result", "coloredBlur"),
        )
        .child(
            Element::new("feMerge")
                .child(Element::new("feMergeNode").attr("in", "coloredBlur"))
                .child(Element::new("feMergeNode").attr("in", "SourceGraphic")),
        );

    document(WIDTH, HEIGHT)
        .child(Element::new("defs").child(gradient).child(glow))
        .child(
            rect(0.0, 0.0, f64::from(WIDTH), f64::from(HEIGHT))
                .attr("fill", "url(#bg)")
                .attr("rx", 15)
                .attr("stroke", rarity.color())
                .attr("stroke-width", 3),
        )
        .child(
            text(60.0, 70.0, achievement.emoji)
                .attr("text-anchor", "middle")
                .attr("font-size", 48)
                .attr("filter", "url(#glow)"),
        )
        .child(
            text(120.0, 35.0, "🏆 Achievement Unlocked!")
                .attr("font-family", "Arial, sans-serif")
                .attr("font-size", 18)
                .attr("font-weight", "bold")
                .attr("fill", rarity.color()),
        )
        .child(
            text(120.0, 55.0, achievement.name)
                .attr("font-family", "Arial, sans-serif")
                .attr("font-size", 16)
                .attr("font-weight", "bold")
                .attr("fill", "#1f2937"),
        )
        .child(
            text(120.0, 75.0, achievement.description)
                .attr("font-family", "Arial, sans-serif")
                .attr("font-size", 12)
                .attr("fill", "#6b7280"),
        )
        .child(
            rect(120.0, 85.0, label_len * 8.0 + 16.0, 20.0)
                .attr("rx", 10)
                .attr("fill", rarity.color())
                .attr("opacity", 0.2),
        )
        .child(
            text(120.0 + label_len * 4.0 + 8.0, 98.0, label)
                .attr("text-anchor", "middle")
                .attr("font-family", "Arial, sans-serif")
                .attr("font-size", 10)
                .attr("font-weight", "bold")
                .attr("fill", rarity.color()),
        )
        .render()
}

/// Write one badge per achievement into `dir`.
///
/// # Returns
///
/// * Paths of the written files, in input order
pub fn write_badges(dir: &Path, achievements: &[&Achievement]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(achievements.len());
    for achievement in achievements {
        let path = dir.join(format!("{}.svg", achievement.file_stem()));
        write_artifact(&path, &render_badge(achievement))?;
        info!("Achievement badge created: {:?}", path);
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::achievements::{find_by_badge, CATALOGUE};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_badge_card_layout() {
        let bug_slayer = find_by_badge("🐛 Bug Slayer").unwrap();
        let svg = render_badge(bug_slayer);

        assert!(svg.starts_with("<svg width=\"300\" height=\"120\""));
        assert!(svg.contains("Achievement Unlocked!"));
        assert!(svg.contains(">Bug Slayer<"));
        assert!(svg.contains(&format!("stop-color:{}", bug_slayer.rarity.background())));
        assert!(svg.contains(&format!(">{}<", bug_slayer.rarity.as_str().to_uppercase())));
    }

    #[test]
    fn test_pill_width_follows_label() {
        let first_steps = find_by_badge("🚀 First Steps").unwrap();
        let len = first_steps.rarity.as_str().len() as f64;
        let svg = render_badge(first_steps);
        let width = super::super::svg::num(len * 8.0 + 16.0);
        assert!(svg.contains(&format!("x=\"120\" y=\"85\" width=\"{width}\" height=\"20\"")));
    }

    #[test]
    fn test_write_badges_uses_dashed_ids() {
        let dir = TempDir::new().unwrap();
        let chosen = [&CATALOGUE[7], &CATALOGUE[8]];
        let written = write_badges(&dir.path().join("achievements"), &chosen).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("first-steps.svg"));
        assert!(written[1].ends_with("weekly-warrior.svg"));
        let contents = fs::read_to_string(&written[1]).unwrap();
        assert!(contents.contains("Weekly Warrior"));
    }
}
