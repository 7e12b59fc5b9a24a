//! Renderer: SVG themes, achievement badges and the Markdown report
//!
//! All renderers read a finished [`PetState`] and never modify it.

pub mod badge;
pub mod default;
pub mod report;
pub mod svg;
pub mod terminal;

use crate::errors::{CodeyError, Result};
use crate::scoring::Tier;
use crate::state::{Mood, PetState};
use chrono::{DateTime, Datelike, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Canvas size shared by both themes
pub const CANVAS_WIDTH: u32 = 630;
pub const CANVAS_HEIGHT: u32 = 473;

/// Month-keyed seasonal event; shown on the card, not used in scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Season {
    pub emoji: &'static str,
    pub name: &'static str,
    pub multiplier: f64,
}

pub fn season_for(month: u32) -> Option<Season> {
    let (emoji, name, multiplier) = match month {
        1 => ("🎯", "New Year", 1.2),
        2 => ("💖", "OS Love", 1.1),
        3 => ("🧹", "Refactor", 1.2),
        4 => ("🐞", "Bug Hunt", 1.1),
        5 => ("🚀", "Deploy", 1.3),
        6 => ("📚", "Docs", 1.1),
        7 => ("🔥", "Grind", 1.4),
        8 => ("🧊", "Freeze", 1.05),
        9 => ("🎓", "School", 1.2),
        10 => ("🎃", "Hacktoberfest", 1.5),
        11 => ("🍁", "Year Push", 1.25),
        12 => ("🎄", "Advent", 1.3),
        _ => return None,
    };
    Some(Season {
        emoji,
        name,
        multiplier,
    })
}

/// Inputs a renderer needs besides the state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub now: DateTime<Utc>,
    pub season: Option<Season>,
}

impl RenderContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            season: season_for(now.month()),
        }
    }

    pub fn timestamp(&self) -> String {
        self.now.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

/// A visual style for the main card
pub trait Theme {
    fn name(&self) -> &'static str;

    fn render(&self, state: &PetState, context: &RenderContext) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Default,
    Terminal,
}

impl ThemeKind {
    pub fn theme(self) -> Box<dyn Theme> {
        match self {
            ThemeKind::Default => Box::new(default::DefaultTheme),
            ThemeKind::Terminal => Box::new(terminal::TerminalTheme),
        }
    }
}

/// Pet emoji for the dominant language
pub fn pet_emoji(language: &str) -> &'static str {
    match language {
        "C" => "🦫",
        "C++" => "🐬",
        "C#" => "🦊",
        "Java" => "🦧",
        "PHP" => "🐘",
        "Python" => "🐍",
        "JavaScript" => "🦔",
        "TypeScript" => "🦋",
        "Ruby" => "💎",
        "Go" => "🐹",
        "Swift" => "🐦",
        "Kotlin" => "🐨",
        "Rust" => "🦀",
        "HTML" => "🦘",
        "CSS" => "🦎",
        "Sass" => "🦄",
        "Vue" => "🐉",
        "React" => "🦥",
        "Angular" => "🦁",
        "Jupyter Notebook" => "🦉",
        "R" => "🐿️",
        "Shell" => "🐌",
        "PowerShell" => "🐺",
        "Bash" => "🦬",
        "Dart" => "🐧",
        "Solidity" => "🔱",
        "Svelte" => "🕊️",
        "Zig" => "🐆",
        _ => "🐲",
    }
}

pub fn mood_emoji(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "😊",
        Mood::Struggling => "😰",
        Mood::Exhausted => "😵",
        Mood::Grinding => "😤",
        Mood::Elite => "😎",
        Mood::Wise => "🧐",
        Mood::Neutral => "😐",
        Mood::Overwhelmed => "🤯",
    }
}

pub fn tier_emoji(tier: Tier) -> &'static str {
    match tier {
        Tier::Noob => "🌱",
        Tier::Developer => "💻",
        Tier::Veteran => "⚔️",
        Tier::Elder => "🧙\u{200d}\u{2642}\u{fe0f}",
    }
}

pub fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::Noob => "#22c55e",
        Tier::Developer => "#3b82f6",
        Tier::Veteran => "#8b5cf6",
        Tier::Elder => "#f59e0b",
    }
}

/// Leading emoji of a stored badge
pub fn badge_icon(badge: &str) -> &str {
    badge.split(' ').next().unwrap_or(badge)
}

/// Stars drawn before switching to a count
pub const MAX_PRESTIGE_STARS: u32 = 5;

/// One `star` per prestige level, or `star×N` past [`MAX_PRESTIGE_STARS`]
pub fn prestige_stars(level: u32, star: &str) -> String {
    if level > MAX_PRESTIGE_STARS {
        format!("{star}×{level}")
    } else {
        star.repeat(level as usize)
    }
}

/// Write a generated artifact, creating parent directories
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    let to_error = |e: std::io::Error| CodeyError::FileWriteError {
        path: path.to_path_buf(),
        message: Arc::new(e.to_string()),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, contents).map_err(to_error)?;

    debug!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(())
}
