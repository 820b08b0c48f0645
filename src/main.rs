use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use autopush::config::{ConfigManager, Settings};
use autopush::logger;
use autopush::prompts::{self, ConsolePrompter};
use autopush::workflow;
use autopush::git::GitRepo;

#[derive(Parser)]
#[command(name = "autopush")]
#[command(about = "Interactive helper for everyday local Git workflows", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage, commit, pick a branch, configure origin and push
    Run {
        /// Repository directory (prompted for when omitted)
        path: Option<PathBuf>,
    },

    /// List local branches and create, switch to or delete one
    Branches {
        /// Repository directory (prompted for when omitted)
        path: Option<PathBuf>,
    },

    /// Open the collaboration menu: pull, merge, status, log, diff
    Collab {
        /// Repository directory (prompted for when omitted)
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    logger::init_logger()?;
    logger::rotate_log_if_needed()?;

    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();
    let settings = Settings::load()?;
    if !ConfigManager::settings_path()?.exists() {
        // First run: materialize the defaults so they can be edited
        settings.save()?;
    }
    let prompter = ConsolePrompter;

    match cli.command {
        Commands::Run { path } => {
            let path = resolve_path(path)?;
            workflow::run(&path, &settings, &prompter)?;
        }
        Commands::Branches { path } => {
            let path = resolve_path(path)?;
            workflow::manage_branches(&path, &settings, &prompter)?;
        }
        Commands::Collab { path } => {
            let path = resolve_path(path)?;
            let repo = GitRepo::open(&path)?;
            workflow::collab_loop(&repo, &prompter)?;
        }
    }

    Ok(())
}

fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => prompts::prompt_repo_path(),
    }
}
