//! Git repository operations via the git CLI.
//!
//! Every operation shells out to the `git` binary with a structured
//! argument list and an explicit working directory. Commands either go
//! through the strict path (non-zero exit becomes an error carrying
//! stderr) or the lenient path used for inspection output, where
//! failure simply means there is nothing to show.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Handle to a local Git repository rooted at an explicit working
/// directory. All state queries hit the repository live; nothing is
/// cached between calls.
pub struct GitRepo {
    workdir: PathBuf,
}

impl GitRepo {
    /// Open an existing Git repository.
    pub fn open(path: &Path) -> Result<Self> {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if !is_repo(&path) {
            return Err(anyhow!(
                "Not a git repository: '{}' (no .git directory)",
                path.display()
            ));
        }

        Ok(Self { workdir: path })
    }

    /// Initialize a new Git repository.
    pub fn init(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory '{}'", path.display()))?;

        let output = Command::new("git")
            .args(["init"])
            .current_dir(path)
            .output()
            .context("Failed to run 'git init'")?;

        if !output.status.success() {
            return Err(anyhow!(
                "git init failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        // Configure a repo-local identity if none is set
        let _ = Command::new("git")
            .args(["config", "user.name", "autopush"])
            .current_dir(path)
            .output();
        let _ = Command::new("git")
            .args(["config", "user.email", "autopush@local"])
            .current_dir(path)
            .output();

        Self::open(path)
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run a git command and return trimmed stdout.
    fn run_git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("Failed to run 'git {}'", args.join(" ")))?;

        if !output.status.success() {
            return Err(anyhow!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a git command, returning Ok if it succeeds (ignoring stdout).
    fn run_git_ok(&self, args: &[&str]) -> Result<()> {
        self.run_git(args)?;
        Ok(())
    }

    /// Check if a git command succeeds (exit code 0).
    fn git_succeeds(&self, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Run an inspection command. Failure or empty output means there
    /// is nothing to show.
    fn run_git_lenient(&self, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let text = String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    // --- staging and committing ---

    /// Stage everything under the working directory.
    pub fn stage_all(&self) -> Result<()> {
        self.run_git_ok(&["add", "-A"])
    }

    /// Stage a specific path, relative to the working directory.
    pub fn stage_path(&self, path: &str) -> Result<()> {
        self.run_git_ok(&["add", "--", path])
    }

    /// Commit staged changes with a message.
    pub fn commit(&self, message: &str) -> Result<()> {
        self.run_git_ok(&["commit", "-m", message])
    }

    /// Create a commit even when nothing is staged.
    pub fn commit_empty(&self, message: &str) -> Result<()> {
        self.run_git_ok(&["commit", "--allow-empty", "-m", message])
    }

    /// Check if there are uncommitted changes.
    pub fn has_changes(&self) -> Result<bool> {
        let output = self.run_git(&["status", "--porcelain"])?;
        Ok(!output.is_empty())
    }

    // --- branch queries ---

    /// Get the current branch name. Fails on detached HEAD, since an
    /// empty answer is indistinguishable from "unknown".
    pub fn current_branch(&self) -> Result<String> {
        let name = self.run_git(&["branch", "--show-current"])?;
        if name.is_empty() {
            return Err(anyhow!(
                "Cannot determine the current branch (detached HEAD?)"
            ));
        }
        Ok(name)
    }

    /// True if a local branch ref with this name exists.
    pub fn branch_exists(&self, name: &str) -> bool {
        self.git_succeeds(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/heads/{name}"),
        ])
    }

    /// List local branch names.
    pub fn list_branches(&self) -> Result<Vec<String>> {
        let output = self.run_git(&["branch", "--format=%(refname:short)"])?;
        if output.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(output.lines().map(|s| s.trim().to_string()).collect())
        }
    }

    // --- branch mutations ---

    /// Rename the current branch, replacing any branch of that name.
    pub fn rename_branch(&self, name: &str) -> Result<()> {
        self.run_git_ok(&["branch", "-M", name])
    }

    /// Check out an existing branch.
    pub fn checkout(&self, name: &str) -> Result<()> {
        self.run_git_ok(&["checkout", name])
    }

    /// Create a new branch and check it out.
    pub fn checkout_new(&self, name: &str) -> Result<()> {
        self.run_git_ok(&["checkout", "-b", name])
    }

    /// Point HEAD at a new unborn branch with no inherited history.
    pub fn checkout_orphan(&self, name: &str) -> Result<()> {
        self.run_git_ok(&["checkout", "--orphan", name])
    }

    /// Drop everything from the index, keeping working-tree files.
    /// Best effort: an already-empty index is not an error.
    pub fn unstage_all(&self) {
        let _ = self.run_git_lenient(&["rm", "-r", "--cached", "."]);
    }

    /// Force-delete a local branch.
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        self.run_git_ok(&["branch", "-D", name])
    }

    // --- remotes ---

    /// Check if a remote exists.
    pub fn remote_exists(&self, name: &str) -> bool {
        self.git_succeeds(&["remote", "get-url", name])
    }

    /// Get the URL for a remote.
    pub fn remote_url(&self, name: &str) -> Result<String> {
        self.run_git(&["remote", "get-url", name])
    }

    /// Add a remote.
    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run_git_ok(&["remote", "add", name, url])
    }

    /// Remove a remote.
    pub fn remove_remote(&self, name: &str) -> Result<()> {
        self.run_git_ok(&["remote", "remove", name])
    }

    /// List all remote names.
    pub fn list_remotes(&self) -> Result<Vec<String>> {
        let output = self.run_git(&["remote"])?;
        if output.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(output.lines().map(|s| s.to_string()).collect())
        }
    }

    // --- remote transfer and merging ---

    /// Push a branch, setting it up to track the remote.
    pub fn push_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        let output = Command::new("git")
            .args(["push", "-u", remote, branch])
            .current_dir(&self.workdir)
            .output()
            .context("Failed to run 'git push'")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "Failed to push to remote '{}': {}\n\n\
                Possible causes:\n\
                1. Authentication failed - ensure credentials are configured\n\
                2. No permission to push to this repository\n\
                3. Network connectivity issues\n\n\
                For HTTPS: Run 'git config --global credential.helper store' and try again\n\
                For SSH: Ensure SSH keys are set up with 'ssh -T git@github.com'",
                remote, stderr
            ));
        }

        Ok(())
    }

    /// Pull a branch from a remote (fetch + merge).
    pub fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        let output = Command::new("git")
            .args(["pull", remote, branch])
            .current_dir(&self.workdir)
            .output()
            .context("Failed to run 'git pull'")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "Failed to pull from remote '{}': {}",
                remote,
                stderr
            ));
        }

        Ok(())
    }

    /// Merge a named branch into the current one.
    pub fn merge(&self, branch: &str) -> Result<()> {
        self.run_git_ok(&["merge", branch])
    }

    // --- inspection (non-fatal) ---

    pub fn status(&self) -> Option<String> {
        self.run_git_lenient(&["status"])
    }

    pub fn log(&self) -> Option<String> {
        self.run_git_lenient(&["log", "--oneline", "--decorate", "-20"])
    }

    pub fn diff(&self) -> Option<String> {
        self.run_git_lenient(&["diff"])
    }
}

/// Check if a directory is a Git repository.
pub fn is_repo(path: &Path) -> bool {
    path.join(".git").exists()
}
