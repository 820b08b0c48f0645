//! User decision seam.
//!
//! Every decision the workflows need is an explicit enumerated value
//! returned through the [`Prompter`] trait. [`ConsolePrompter`] is the
//! interactive implementation over `inquire`; tests drive the same
//! workflows with scripted implementations instead.

use anyhow::{Context, Result};
use colored::Colorize;
use inquire::{Confirm, Select, Text};
use std::path::{Path, PathBuf};

use crate::remote::{is_valid_git_url, ACCEPTED_URL_SCHEMES};

/// Where the main workflow should land the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchTarget {
    /// Push to the default integration branch.
    Default,
    /// Create or reuse a named branch.
    Named(String),
}

/// What to do when the requested branch already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingBranchAction {
    DeleteAndRecreate,
    Switch,
    Abort,
}

impl std::fmt::Display for ExistingBranchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExistingBranchAction::DeleteAndRecreate => {
                write!(f, "Delete it and start fresh from the current checkout")
            }
            ExistingBranchAction::Switch => write!(f, "Switch to the existing branch"),
            ExistingBranchAction::Abort => write!(f, "Abort, leave everything as it is"),
        }
    }
}

/// One action in the collaboration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollabAction {
    Pull,
    Merge,
    Status,
    Log,
    Diff,
    Exit,
}

impl std::fmt::Display for CollabAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollabAction::Pull => write!(f, "Pull from origin"),
            CollabAction::Merge => write!(f, "Merge a branch (backs up the tree first)"),
            CollabAction::Status => write!(f, "Show status"),
            CollabAction::Log => write!(f, "Show recent log"),
            CollabAction::Diff => write!(f, "Show diff"),
            CollabAction::Exit => write!(f, "Exit"),
        }
    }
}

/// Source of every user decision the workflows need.
pub trait Prompter {
    /// Should a repository be initialized in the working directory?
    fn confirm_init(&self) -> Result<bool>;

    /// What to stage: `None` means everything, `Some(path)` a specific
    /// path that exists under the working directory.
    fn stage_target(&self, workdir: &Path) -> Result<Option<String>>;

    /// Non-empty commit message.
    fn commit_message(&self) -> Result<String>;

    /// Push to the default branch or target a named branch?
    fn branch_target(&self) -> Result<BranchTarget>;

    /// The named branch already exists; what now?
    fn existing_branch_action(&self, branch: &str) -> Result<ExistingBranchAction>;

    /// Remote URL for origin, already shape-validated.
    fn remote_url(&self) -> Result<String>;

    /// Confirm pushing to a non-default branch.
    fn confirm_push(&self, branch: &str) -> Result<bool>;

    /// Open the collaboration loop after the main workflow?
    fn start_collab(&self) -> Result<bool>;

    /// Next collaboration action.
    fn collab_action(&self) -> Result<CollabAction>;

    /// Which branch to merge into the current one.
    fn merge_source(&self) -> Result<String>;
}

/// Interactive prompter backed by `inquire`.
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn confirm_init(&self) -> Result<bool> {
        Confirm::new("No repository here. Initialize one?")
            .with_default(true)
            .prompt()
            .context("Failed to read init choice")
    }

    fn stage_target(&self, workdir: &Path) -> Result<Option<String>> {
        loop {
            let input = Text::new("Path to stage (leave empty to stage everything):")
                .with_help_message("Relative to the repository root")
                .prompt()
                .context("Failed to read stage target")?;

            let input = input.trim().to_string();
            if input.is_empty() {
                return Ok(None);
            }
            if workdir.join(&input).exists() {
                return Ok(Some(input));
            }
            println!("{}", format!("'{input}' does not exist, try again.").yellow());
        }
    }

    fn commit_message(&self) -> Result<String> {
        loop {
            let message = Text::new("Commit message:")
                .prompt()
                .context("Failed to read commit message")?;

            let message = message.trim().to_string();
            if !message.is_empty() {
                return Ok(message);
            }
            println!("{}", "A commit message cannot be empty.".yellow());
        }
    }

    fn branch_target(&self) -> Result<BranchTarget> {
        let choice = Select::new(
            "Where should this go?",
            vec!["Push to the default branch", "Use a named branch"],
        )
        .prompt()
        .context("Failed to read branch target")?;

        if choice == "Push to the default branch" {
            return Ok(BranchTarget::Default);
        }

        loop {
            let name = Text::new("Branch name:")
                .prompt()
                .context("Failed to read branch name")?;

            let name = name.trim().to_string();
            if !name.is_empty() {
                return Ok(BranchTarget::Named(name));
            }
            println!("{}", "A branch name cannot be empty.".yellow());
        }
    }

    fn existing_branch_action(&self, branch: &str) -> Result<ExistingBranchAction> {
        Select::new(
            &format!("Branch '{branch}' already exists. What now?"),
            vec![
                ExistingBranchAction::DeleteAndRecreate,
                ExistingBranchAction::Switch,
                ExistingBranchAction::Abort,
            ],
        )
        .prompt()
        .context("Failed to read branch resolution choice")
    }

    fn remote_url(&self) -> Result<String> {
        loop {
            let url = Text::new("Remote repository URL:")
                .with_placeholder("git@github.com:user/repo.git or https://github.com/user/repo.git")
                .prompt()
                .context("Failed to read remote URL")?;

            let url = url.trim().to_string();
            if is_valid_git_url(&url) {
                return Ok(url);
            }
            println!(
                "{}",
                format!("Invalid git URL. Must start with {ACCEPTED_URL_SCHEMES}.").yellow()
            );
        }
    }

    fn confirm_push(&self, branch: &str) -> Result<bool> {
        Confirm::new(&format!("Push to branch '{branch}'?"))
            .with_default(true)
            .prompt()
            .context("Failed to read push confirmation")
    }

    fn start_collab(&self) -> Result<bool> {
        Confirm::new("Open the collaboration menu (pull/merge/status/log/diff)?")
            .with_default(false)
            .prompt()
            .context("Failed to read collaboration choice")
    }

    fn collab_action(&self) -> Result<CollabAction> {
        Select::new(
            "What next?",
            vec![
                CollabAction::Pull,
                CollabAction::Merge,
                CollabAction::Status,
                CollabAction::Log,
                CollabAction::Diff,
                CollabAction::Exit,
            ],
        )
        .prompt()
        .context("Failed to read collaboration action")
    }

    fn merge_source(&self) -> Result<String> {
        loop {
            let name = Text::new("Branch to merge into the current one:")
                .prompt()
                .context("Failed to read merge source")?;

            let name = name.trim().to_string();
            if !name.is_empty() {
                return Ok(name);
            }
            println!("{}", "A branch name cannot be empty.".yellow());
        }
    }
}

/// Ask for the repository directory, expanding a leading tilde and
/// insisting on an existing directory.
pub fn prompt_repo_path() -> Result<PathBuf> {
    loop {
        let input = Text::new("Repository directory:")
            .with_placeholder("~/projects/my-repo")
            .prompt()
            .context("Failed to read repository path")?;

        let path = expand_tilde(input.trim())?;
        if path.is_dir() {
            return Ok(path);
        }
        println!(
            "{}",
            format!("'{}' is not a directory, try again.", path.display()).yellow()
        );
    }
}

/// Expand tilde in path
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path.starts_with("~/") || path == "~" {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        if path == "~" {
            Ok(home)
        } else {
            Ok(home.join(&path[2..]))
        }
    } else {
        Ok(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();

        let expanded = expand_tilde("~/test").unwrap();
        assert_eq!(expanded, home.join("test"));

        let expanded = expand_tilde("~").unwrap();
        assert_eq!(expanded, home);

        let expanded = expand_tilde("/absolute/path").unwrap();
        assert_eq!(expanded, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_menu_labels_are_distinct() {
        let actions = [
            CollabAction::Pull,
            CollabAction::Merge,
            CollabAction::Status,
            CollabAction::Log,
            CollabAction::Diff,
            CollabAction::Exit,
        ];
        let labels: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), labels.len());
    }
}
