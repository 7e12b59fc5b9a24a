//! # Codey
//!
//! A GitHub-profile pet. Each run reads an account's public activity, turns
//! it into pet stats (health, hunger, happiness, energy, level, streak, mood,
//! tier, achievements) and renders an SVG card plus a Markdown report.
//!
//! The pipeline is API client → activity aggregator → social/quality scorer →
//! stat engine → state store and renderer, each in its own module.

pub mod activity;
pub mod config;
pub mod engine;
pub mod errors;
pub mod github;
pub mod render;
pub mod scoring;
pub mod star_report;
pub mod state;
pub mod utils;

pub use config::{Config, GameBalance, Target};
pub use errors::{CodeyError, ErrorRecovery, Result};
pub use state::PetState;
