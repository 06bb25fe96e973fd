//! debrief - render and share assistant CLI session feedback.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use debrief_cli::logging::{LogConfig, LogFormat};
use debrief_cli::{config::Config, logging, share};
use debrief_core::{RedactionEngine, format_feedback, save_feedback};
use debrief_types::SessionData;
use std::path::PathBuf;

/// Render and share feedback from recorded assistant CLI sessions.
#[derive(Parser, Debug)]
#[command(name = "debrief")]
#[command(about = "Render and share assistant CLI session feedback")]
#[command(version)]
struct Cli {
    /// Path to config file (defaults to ./debrief.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrub, format and save a recorded session snapshot
    Render {
        /// Session snapshot JSON exported by the host
        snapshot: PathBuf,

        /// What the user was trying to do
        #[arg(long)]
        task: String,

        /// Problem encountered during the session (repeatable)
        #[arg(long = "problem", value_name = "TEXT")]
        problems: Vec<String>,

        /// How the session ended
        #[arg(long)]
        outcome: String,

        /// Override the configured output directory
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Upload a finished feedback file
    Share {
        #[command(subcommand)]
        target: ShareTarget,
    },
}

#[derive(Subcommand, Debug)]
enum ShareTarget {
    /// Create a GitHub gist (secret unless --public)
    Gist {
        file: PathBuf,

        /// Gist description (defaults to the file name)
        #[arg(long)]
        desc: Option<String>,

        #[arg(long)]
        public: bool,
    },

    /// Open a GitHub issue carrying the human summary
    Issue {
        file: PathBuf,

        /// Target repository ("owner/name"); falls back to share.repo
        #[arg(long)]
        repo: Option<String>,

        /// Issue title (derived from the document when omitted)
        #[arg(long)]
        title: Option<String>,

        /// Label to apply (repeatable; falls back to share.labels)
        #[arg(long = "label", value_name = "LABEL")]
        labels: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.quiet,
        cli.log_format,
    ));

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Render {
            snapshot,
            task,
            problems,
            outcome,
            output_dir,
        } => {
            let content = std::fs::read_to_string(&snapshot)
                .with_context(|| format!("Cannot read {}", snapshot.display()))?;
            let mut session: SessionData = serde_json::from_str(&content)
                .context("Snapshot is not a valid session export")?;

            let engine = RedactionEngine::with_patterns(&config.redaction.extra_patterns)?;
            engine.scrub_session(&mut session);

            let document = format_feedback(&session, &task, &problems, &outcome)?;
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let path = save_feedback(&document, &output_dir)?;
            println!("{}", path.display());
        }

        Commands::Share { target } => match target {
            ShareTarget::Gist { file, desc, public } => {
                let url = share::create_gist(&file, desc.as_deref(), public).await?;
                println!("{url}");
            }
            ShareTarget::Issue {
                file,
                repo,
                title,
                labels,
            } => {
                let repo = repo.or_else(|| config.share.repo.clone()).context(
                    "No repository given; pass --repo or set share.repo in debrief.toml",
                )?;
                let labels = if labels.is_empty() {
                    config.share.labels.clone()
                } else {
                    labels
                };
                let url = share::create_issue(&file, &repo, title.as_deref(), &labels).await?;
                println!("{url}");
            }
        },
    }

    Ok(())
}
