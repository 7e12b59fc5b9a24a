use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use codey::engine::prestige::PrestigeRequirements;
use codey::engine::{self, DailyActivity};
use codey::github::{authenticated_login, fetch, GitHubClient, UserProfile};
use codey::render::{self, badge, report, RenderContext, ThemeKind};
use codey::state::{self, PetState};
use codey::{activity, star_report, Config, ErrorRecovery, Target};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

const STATE_FILE: &str = "codey.json";
const SVG_FILE: &str = "codey.svg";
const REPORT_FILE: &str = "CODEY_REPORT.md";
const BADGES_DIR: &str = "achievements";
const STAR_REPORT_FILE: &str = "CODEY_STAR_REPORT.md";
const STAR_HISTORY_FILE: &str = ".codey/stats_history.jsonl";

#[derive(Parser, Debug)]
#[command(name = "codey", version, about = "A GitHub-profile pet that lives on your commits")]
struct Cli {
    /// Log at INFO level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log at DEBUG level
    #[arg(long, global = true)]
    debug: bool,

    /// Account to track: owner, owner/repo, or a repository URL
    #[arg(long, global = true, value_name = "TARGET")]
    target: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch activity, update the pet and write every artifact (default)
    Update(UpdateArgs),
    /// Write the star report and append to the star history
    StarReport(StarReportArgs),
    /// Trade an eligible max-level pet for a prestige star
    Prestige(PrestigeArgs),
    /// Re-render the card and report from a saved state, offline
    Render(RenderArgs),
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Card SVG path
    #[arg(long, default_value = SVG_FILE)]
    svg: PathBuf,

    /// Markdown report path
    #[arg(long, default_value = REPORT_FILE)]
    report: PathBuf,

    #[arg(long, value_enum, default_value_t = ThemeKind::Default)]
    theme: ThemeKind,
}

impl Default for OutputArgs {
    fn default() -> Self {
        Self {
            svg: PathBuf::from(SVG_FILE),
            report: PathBuf::from(REPORT_FILE),
            theme: ThemeKind::Default,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct UpdateArgs {
    /// State file
    #[arg(long, default_value = STATE_FILE)]
    state: PathBuf,

    /// Directory for newly unlocked achievement badges
    #[arg(long, default_value = BADGES_DIR)]
    badges_dir: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

impl Default for UpdateArgs {
    fn default() -> Self {
        Self {
            state: PathBuf::from(STATE_FILE),
            badges_dir: PathBuf::from(BADGES_DIR),
            output: OutputArgs::default(),
        }
    }
}

#[derive(Args, Debug)]
struct StarReportArgs {
    #[arg(long, default_value = STAR_REPORT_FILE)]
    report: PathBuf,

    /// Append-only JSON lines history
    #[arg(long, default_value = STAR_HISTORY_FILE)]
    history: PathBuf,
}

#[derive(Args, Debug)]
struct PrestigeArgs {
    #[arg(long, default_value = STATE_FILE)]
    state: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long, default_value = STATE_FILE)]
    state: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

fn init_logging(verbose: bool, debug: bool) {
    let log_level = if debug {
        tracing::Level::DEBUG
    } else if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// Environment config with `--target` applied
fn load_config(target: Option<&str>) -> Result<Config> {
    let target = target.map(Target::parse).transpose()?;
    let config = Config::from_env()?.with_target(target);
    config.validate()?;
    Ok(config)
}

/// Configured owner, else the login that owns the token
async fn resolve_owner(client: &GitHubClient, config: &Config) -> Result<String> {
    if let Some(target) = &config.target {
        return Ok(target.owner.clone());
    }

    let login = authenticated_login(client)
        .await
        .context("No target configured and the token owner could not be resolved")?;
    if login.is_empty() {
        return Err(anyhow!("No target configured and the token owner has no login"));
    }
    info!("No target configured, tracking token owner {}", login);
    Ok(login)
}

fn write_card_and_report(state: &PetState, context: &RenderContext, output: &OutputArgs) -> Result<()> {
    let theme = output.theme.theme();
    render::write_artifact(&output.svg, &theme.render(state, context))?;
    info!("Rendered {} card to {:?}", theme.name(), output.svg);

    render::write_artifact(&output.report, &report::render_report(state, context))?;
    info!("Wrote report to {:?}", output.report);
    Ok(())
}

async fn run_update(target: Option<&str>, args: &UpdateArgs, now: DateTime<Utc>) -> Result<()> {
    let config = load_config(target)?;
    let mut pet = state::load_state_or_default(&args.state)?;
    let client = GitHubClient::new(&config)?;
    let owner = resolve_owner(&client, &config).await?;
    info!("Updating Codey for {}", owner);

    let user: UserProfile = ErrorRecovery::with_default(
        fetch(&client, &format!("/users/{owner}"), &[]).await,
        UserProfile {
            login: owner.clone(),
            ..UserProfile::default()
        },
        "user profile",
    );
    let summary = activity::collect(&client, &config, &owner, now).await;
    let daily = DailyActivity::for_day(
        summary.daily_commits,
        summary.daily_prs,
        now,
        config.balance.weekend_bonus,
    );
    debug!("Daily activity: {:?}", daily);

    let outcome = engine::update(&mut pet, &daily, &summary, &user, &config.balance, now);
    state::save_state(&args.state, &pet)?;

    write_card_and_report(&pet, &RenderContext::at(now), &args.output)?;
    badge::write_badges(&args.badges_dir, &outcome.newly_unlocked)?;

    info!(
        "Codey updated: level {}, health {:.1}, mood {}, prestige {}",
        pet.level,
        pet.health,
        pet.mood,
        if pet.brutal_stats.can_prestige { "ready" } else { "locked" }
    );
    Ok(())
}

async fn run_star_report(target: Option<&str>, args: &StarReportArgs, now: DateTime<Utc>) -> Result<()> {
    let config = load_config(target)?;
    let client = GitHubClient::new(&config)?;
    let owner = resolve_owner(&client, &config).await?;
    let repo_name = config.target.as_ref().and_then(|t| t.repo.as_deref());

    star_report::run(&client, &owner, repo_name, &args.report, &args.history, now).await?;
    Ok(())
}

fn require_state(path: &Path) -> Result<PetState> {
    state::load_state(path)?.ok_or_else(|| anyhow!("No saved state at {}", path.display()))
}

fn run_prestige(args: &PrestigeArgs) -> Result<()> {
    let mut pet = require_state(&args.state)?;
    let prestige_level = engine::apply_prestige(&mut pet, &PrestigeRequirements::default())?;
    state::save_state(&args.state, &pet)?;
    info!("Prestige {} reached, level reset to {}", prestige_level, pet.level);
    Ok(())
}

fn run_render(args: &RenderArgs, now: DateTime<Utc>) -> Result<()> {
    let pet = require_state(&args.state)?;
    write_card_and_report(&pet, &RenderContext::at(now), &args.output)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);
    debug!("Starting codey {}", env!("CARGO_PKG_VERSION"));

    let target = cli.target.as_deref();
    let now = Utc::now();
    let result = match cli.command {
        None => run_update(target, &UpdateArgs::default(), now).await,
        Some(Command::Update(args)) => run_update(target, &args, now).await,
        Some(Command::StarReport(args)) => run_star_report(target, &args, now).await,
        Some(Command::Prestige(args)) => run_prestige(&args),
        Some(Command::Render(args)) => run_render(&args, now),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
