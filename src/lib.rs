//! # autopush
//!
//! An interactive command-line helper that automates everyday local
//! Git operations by prompting the operator and shelling out to the
//! `git` executable.
//!
//! ## Overview
//!
//! `autopush` walks a repository through the common publish sequence:
//! stage, commit, land on the right branch, configure the `origin`
//! remote, push. A secondary collaboration menu covers pull, merge
//! (preceded by a working-tree backup) and the read-only status, log
//! and diff views.
//!
//! The heart of the tool is branch reconciliation: deciding whether a
//! named branch already exists, whether the current checkout has to be
//! moved aside before a destructive operation, and how to create,
//! delete or switch branches without losing the checkout state.
//!
//! ## Architecture
//!
//! - Git command execution and state queries ([`git`])
//! - Branch lifecycle and safe deletion ([`branch`])
//! - Remote configuration ([`remote`])
//! - Workflow sequencing ([`workflow`])
//! - Pre-merge backups ([`backup`])
//! - User prompts ([`prompts`]), settings ([`config`]) and logging
//!   ([`logger`])

/// Pre-merge working-tree backups into timestamped sibling directories.
pub mod backup;

/// Branch resolution state machine and the safe-delete procedure with
/// checkout displacement.
pub mod branch;

/// Configuration directory management and persisted tool settings
/// (default branch, displacement preference order).
pub mod config;

/// Git operations via the git CLI with an explicit working directory.
/// Strict commands surface stderr in errors; inspection commands are
/// lenient and simply yield nothing on failure.
pub mod git;

/// Logging to console (via `RUST_LOG`) and to a rotating file in the
/// config directory.
pub mod logger;

/// User decision seam: the `Prompter` trait plus the interactive
/// `inquire`-backed implementation.
pub mod prompts;

/// The single-remote ("origin") configuration policy.
pub mod remote;

/// The main stage-commit-branch-push sequence, branch management and
/// the collaboration loop.
pub mod workflow;
