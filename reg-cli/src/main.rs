use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reg_core::FormController;
use reg_core::dom::PageMarkup;
use tracing::{debug, info};

use reg_cli::{logging, report::FormSummary, script::Script, settings::AppConfig};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Replays a scripted user session against the conference registration form.
///
/// Loads the page (the standard registration page unless `--page` is given),
/// attaches the form controller, runs every step of the script and prints
/// the resulting form state and submit outcomes.
#[derive(Debug, Parser)]
#[command(name = "regform")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Event script (TOML list of `[[step]]` tables).
    #[arg(short, long)]
    script: PathBuf,

    /// Page description (TOML). Defaults to the standard registration page.
    #[arg(short, long)]
    page: Option<PathBuf>,

    /// Configuration file with `[form]` and `[logging]` sections.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level or filter directive; overrides the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Append log records to this file; overrides the config file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fail unless the last submit attempt was accepted.
    #[arg(long, default_value_t = false)]
    require_accepted: bool,
}

fn load_page(path: Option<&PathBuf>) -> Result<PageMarkup> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to open page: {}", path.display()))?;
            PageMarkup::from_toml_str(&source)
                .with_context(|| format!("Failed to parse page: {}", path.display()))
        }
        None => Ok(PageMarkup::default()),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(file) = cli.log_file {
        config.logging.file = Some(file);
    }
    logging::init_logging(&config.logging)?;

    let markup = load_page(cli.page.as_ref())?;
    debug!(activities = markup.activities.len(), "page loaded");

    let mut form = FormController::from_markup(&markup, config.form)
        .context("Failed to attach the form controller")?;

    let script = Script::load(&cli.script)
        .with_context(|| format!("Failed to load script: {}", cli.script.display()))?;
    info!("Replaying {} steps from {}", script.steps.len(), cli.script.display());

    let submissions = script
        .replay(&mut form)
        .with_context(|| format!("Script failed: {}", cli.script.display()))?;

    let summary = FormSummary::capture(&form, submissions);
    print!("{summary}");

    if cli.require_accepted && !summary.last_submission_accepted() {
        anyhow::bail!("the last submission was not accepted");
    }

    Ok(())
}
