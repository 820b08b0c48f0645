//! Workflow orchestration.
//!
//! The main workflow runs strictly in order: optional init, stage,
//! commit, branch resolution, remote setup, push. Each step's failure
//! aborts the rest; nothing already done is rolled back. A secondary
//! collaboration loop offers pull, merge (with a working-tree backup
//! first), and the read-only status/log/diff views.

use anyhow::{anyhow, Result};
use colored::Colorize;
use log::info;
use std::path::Path;

use crate::backup;
use crate::branch::{resolve_branch, ResolveOutcome};
use crate::config::Settings;
use crate::git::{self, GitRepo};
use crate::prompts::{BranchTarget, CollabAction, Prompter};
use crate::remote::{ensure_origin, REMOTE_NAME};

/// Run the full stage-commit-branch-push workflow against `path`.
pub fn run(path: &Path, settings: &Settings, prompter: &dyn Prompter) -> Result<()> {
    let repo = open_or_init(path, prompter)?;

    // Stage
    println!("{}", "Staging changes...".cyan().bold());
    match prompter.stage_target(repo.workdir())? {
        Some(target) => repo.stage_path(&target)?,
        None => repo.stage_all()?,
    }

    // Commit
    let message = prompter.commit_message()?;
    repo.commit(&message)?;
    println!("  {} '{message}'", "Committed".green());

    // Branch resolution
    let branch = match prompter.branch_target()? {
        BranchTarget::Default => {
            repo.rename_branch(&settings.default_branch)?;
            settings.default_branch.clone()
        }
        BranchTarget::Named(name) => {
            match resolve_branch(&repo, &name, settings, prompter)? {
                ResolveOutcome::CheckedOut => {}
                ResolveOutcome::Aborted => {
                    println!("{}", "Branch resolution aborted, stopping here.".yellow());
                    return Ok(());
                }
            }
            println!("  {} branch '{name}'", "On".green());

            // Pushing to a named branch needs an explicit go-ahead;
            // the default branch does not.
            if !prompter.confirm_push(&name)? {
                println!("{}", "Push cancelled.".yellow());
                return Ok(());
            }
            name
        }
    };

    // Remote setup, then push
    let url = prompter.remote_url()?;
    ensure_origin(&repo, &url)?;

    println!("{}", format!("Pushing to {REMOTE_NAME}/{branch}...").cyan().bold());
    repo.push_upstream(REMOTE_NAME, &branch)?;
    println!("  {} {REMOTE_NAME}/{branch}", "Pushed".green());
    info!("pushed '{branch}' to {url}");

    if prompter.start_collab()? {
        collab_loop(&repo, prompter)?;
    }

    Ok(())
}

/// Show local branches and resolve an operator-chosen target.
pub fn manage_branches(path: &Path, settings: &Settings, prompter: &dyn Prompter) -> Result<()> {
    let repo = GitRepo::open(path)?;

    let current = repo.current_branch().ok();
    let branches = repo.list_branches()?;
    if branches.is_empty() {
        println!("{}", "No branches yet (no commits).".yellow());
    } else {
        println!("{}", "Local branches:".cyan().bold());
        for name in &branches {
            if Some(name) == current.as_ref() {
                println!("  {} {name}", "*".green());
            } else {
                println!("    {name}");
            }
        }
    }

    let target = match prompter.branch_target()? {
        BranchTarget::Default => settings.default_branch.clone(),
        BranchTarget::Named(name) => name,
    };

    match resolve_branch(&repo, &target, settings, prompter)? {
        ResolveOutcome::CheckedOut => {
            println!("  {} branch '{target}'", "On".green());
        }
        ResolveOutcome::Aborted => {
            println!("{}", "Aborted, nothing changed.".yellow());
        }
    }

    Ok(())
}

/// The pull / merge / status / log / diff loop. Repeats until the
/// operator exits; inspection failures show as "nothing to show".
pub fn collab_loop(repo: &GitRepo, prompter: &dyn Prompter) -> Result<()> {
    loop {
        match prompter.collab_action()? {
            CollabAction::Pull => {
                let branch = repo.current_branch()?;
                println!("{}", format!("Pulling {REMOTE_NAME}/{branch}...").cyan().bold());
                repo.pull(REMOTE_NAME, &branch)?;
                println!("  {}", "Pulled".green());
            }
            CollabAction::Merge => {
                let source = prompter.merge_source()?;
                if !repo.branch_exists(&source) {
                    println!("{}", format!("No branch named '{source}'.").yellow());
                    continue;
                }

                // The merge only runs once the backup has succeeded.
                let dest = backup::create_backup(repo.workdir())?;
                println!("  {} {}", "Backed up to".green(), dest.display());

                repo.merge(&source)?;
                println!("  {} '{source}'", "Merged".green());
            }
            CollabAction::Status => show(repo.status()),
            CollabAction::Log => show(repo.log()),
            CollabAction::Diff => show(repo.diff()),
            CollabAction::Exit => break,
        }
    }

    Ok(())
}

fn show(output: Option<String>) {
    match output {
        Some(text) => println!("{text}"),
        None => println!("{}", "Nothing to show.".yellow()),
    }
}

fn open_or_init(path: &Path, prompter: &dyn Prompter) -> Result<GitRepo> {
    if git::is_repo(path) {
        return GitRepo::open(path);
    }

    if prompter.confirm_init()? {
        println!("{}", "Initializing repository...".cyan().bold());
        GitRepo::init(path)
    } else {
        Err(anyhow!(
            "'{}' is not a git repository and initialization was declined",
            path.display()
        ))
    }
}
