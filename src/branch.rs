//! Branch lifecycle management.
//!
//! Resolving a named target branch is a small state machine: probe for
//! the ref, create it when absent, and otherwise ask the operator
//! whether to delete-and-recreate, switch, or abort. Deletion always
//! goes through [`safe_delete`], which first moves the checkout off the
//! branch being removed. The displacement preference order comes from
//! [`Settings::displacement_order`]; when none of the preferred
//! branches exist a fresh orphan branch with a single placeholder
//! commit is synthesized as the landing point.

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::Settings;
use crate::git::GitRepo;
use crate::prompts::{ExistingBranchAction, Prompter};

/// Terminal outcome of branch resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The target branch is checked out.
    CheckedOut,
    /// The operator aborted; repository state is untouched.
    Aborted,
}

/// Ensure `name` is the checked-out branch, creating, recreating or
/// switching as the operator decides. Abort is a non-error early exit.
pub fn resolve_branch(
    repo: &GitRepo,
    name: &str,
    settings: &Settings,
    prompter: &dyn Prompter,
) -> Result<ResolveOutcome> {
    if !repo.branch_exists(name) {
        debug!("branch '{name}' does not exist, creating it");
        repo.checkout_new(name)
            .with_context(|| format!("Failed to create branch '{name}'"))?;
        return Ok(ResolveOutcome::CheckedOut);
    }

    match prompter.existing_branch_action(name)? {
        ExistingBranchAction::DeleteAndRecreate => {
            safe_delete(repo, name, settings)?;
            repo.checkout_new(name)
                .with_context(|| format!("Failed to recreate branch '{name}'"))?;
            info!("branch '{name}' recreated");
            Ok(ResolveOutcome::CheckedOut)
        }
        ExistingBranchAction::Switch => {
            repo.checkout(name)
                .with_context(|| format!("Failed to switch to branch '{name}'"))?;
            Ok(ResolveOutcome::CheckedOut)
        }
        ExistingBranchAction::Abort => Ok(ResolveOutcome::Aborted),
    }
}

/// Delete a branch without ever deleting the active checkout.
///
/// The current branch is determined first; if that fails the whole
/// delete is refused. When the branch to delete is the current one the
/// checkout is displaced beforehand. A branch whose ref never existed
/// (an unborn HEAD) has nothing to delete, so the delete step is
/// skipped; the displacement still happens and is a valid state to
/// leave behind.
pub fn safe_delete(repo: &GitRepo, name: &str, settings: &Settings) -> Result<()> {
    let current = repo
        .current_branch()
        .with_context(|| format!("Refusing to delete '{name}': current branch is unknown"))?;

    let existed = repo.branch_exists(name);

    if current == name {
        displace(repo, name, settings)?;
    }

    if existed {
        repo.delete_branch(name)
            .with_context(|| format!("Failed to delete branch '{name}'"))?;
        info!("branch '{name}' deleted");
    } else {
        debug!("branch '{name}' had no ref, nothing to delete");
    }

    Ok(())
}

/// Move the checkout off `avoid`: first existing preferred branch
/// wins, otherwise synthesize an orphan fallback.
fn displace(repo: &GitRepo, avoid: &str, settings: &Settings) -> Result<()> {
    if let Some(target) = displacement_target(repo, avoid, settings) {
        info!("displacing checkout from '{avoid}' to '{target}'");
        return repo
            .checkout(&target)
            .with_context(|| format!("Failed to check out '{target}' before deleting '{avoid}'"));
    }

    let fallback = orphan_fallback_name(repo, settings);
    info!("no branch to land on, synthesizing orphan '{fallback}'");

    // Already sitting on an unborn branch of the fallback name: the
    // orphan checkout would be a no-op, the placeholder commit births it.
    let already_unborn_here = fallback == avoid && !repo.branch_exists(&fallback);
    if !already_unborn_here {
        repo.checkout_orphan(&fallback)
            .with_context(|| format!("Failed to create orphan branch '{fallback}'"))?;
    }

    // The orphan inherits the previous index; drop it so the
    // placeholder commit carries no tracked files.
    repo.unstage_all();
    repo.commit_empty("Initial commit")
        .context("Failed to create the placeholder commit on the orphan branch")
}

fn displacement_target(repo: &GitRepo, avoid: &str, settings: &Settings) -> Option<String> {
    settings
        .displacement_order
        .iter()
        .find(|name| name.as_str() != avoid && repo.branch_exists(name))
        .cloned()
}

/// First preferred name whose ref does not already exist. A name with
/// an existing ref can only be the branch being deleted's sibling, and
/// an orphan checkout onto it would collide.
fn orphan_fallback_name(repo: &GitRepo, settings: &Settings) -> String {
    settings
        .displacement_order
        .iter()
        .find(|name| !repo.branch_exists(name))
        .cloned()
        .unwrap_or_else(|| "main".to_string())
}
