//! End-to-end workflow tests driven by a scripted prompter.

use anyhow::Result;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use tempfile::TempDir;

use autopush::config::Settings;
use autopush::git::GitRepo;
use autopush::prompts::{BranchTarget, CollabAction, ExistingBranchAction, Prompter};
use autopush::workflow;

/// Prompter that replays a fixed script instead of reading a terminal.
struct ScriptedPrompter {
    init: bool,
    stage: Option<String>,
    message: String,
    target: BranchTarget,
    existing_action: ExistingBranchAction,
    push_ok: bool,
    url: String,
    start_collab: bool,
    collab: RefCell<VecDeque<CollabAction>>,
    merge_from: String,
}

impl Default for ScriptedPrompter {
    fn default() -> Self {
        Self {
            init: true,
            stage: None,
            message: "scripted commit".to_string(),
            target: BranchTarget::Default,
            existing_action: ExistingBranchAction::Abort,
            push_ok: false,
            url: "https://github.com/test/repo.git".to_string(),
            start_collab: false,
            collab: RefCell::new(VecDeque::new()),
            merge_from: "feature".to_string(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm_init(&self) -> Result<bool> {
        Ok(self.init)
    }

    fn stage_target(&self, _workdir: &Path) -> Result<Option<String>> {
        Ok(self.stage.clone())
    }

    fn commit_message(&self) -> Result<String> {
        Ok(self.message.clone())
    }

    fn branch_target(&self) -> Result<BranchTarget> {
        Ok(self.target.clone())
    }

    fn existing_branch_action(&self, _branch: &str) -> Result<ExistingBranchAction> {
        Ok(self.existing_action)
    }

    fn remote_url(&self) -> Result<String> {
        Ok(self.url.clone())
    }

    fn confirm_push(&self, _branch: &str) -> Result<bool> {
        Ok(self.push_ok)
    }

    fn start_collab(&self) -> Result<bool> {
        Ok(self.start_collab)
    }

    fn collab_action(&self) -> Result<CollabAction> {
        Ok(self.collab.borrow_mut().pop_front().unwrap_or(CollabAction::Exit))
    }

    fn merge_source(&self) -> Result<String> {
        Ok(self.merge_from.clone())
    }
}

fn seeded_repo(temp: &TempDir) -> GitRepo {
    let repo = GitRepo::init(temp.path()).unwrap();
    std::fs::write(temp.path().join("seed.txt"), "seed").unwrap();
    repo.stage_all().unwrap();
    repo.commit("seed").unwrap();
    repo.rename_branch("main").unwrap();
    repo
}

#[test]
fn run_creates_named_branch_and_stops_when_push_declined() {
    let temp = TempDir::new().unwrap();
    seeded_repo(&temp);
    std::fs::write(temp.path().join("work.txt"), "work").unwrap();

    let prompter = ScriptedPrompter {
        target: BranchTarget::Named("feature-x".to_string()),
        push_ok: false,
        ..Default::default()
    };

    workflow::run(temp.path(), &Settings::default(), &prompter).unwrap();

    let repo = GitRepo::open(temp.path()).unwrap();
    assert_eq!(repo.current_branch().unwrap(), "feature-x");
    assert!(!repo.has_changes().unwrap());
    // Push was declined before the remote was ever configured
    assert!(!repo.remote_exists("origin"));
}

#[test]
fn run_stages_only_the_requested_path() {
    let temp = TempDir::new().unwrap();
    seeded_repo(&temp);
    std::fs::write(temp.path().join("wanted.txt"), "yes").unwrap();
    std::fs::write(temp.path().join("other.txt"), "no").unwrap();

    let prompter = ScriptedPrompter {
        stage: Some("wanted.txt".to_string()),
        target: BranchTarget::Named("partial".to_string()),
        ..Default::default()
    };

    workflow::run(temp.path(), &Settings::default(), &prompter).unwrap();

    let repo = GitRepo::open(temp.path()).unwrap();
    // other.txt stayed out of the commit
    assert!(repo.has_changes().unwrap());
}

#[test]
fn run_aborted_resolution_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    let repo = seeded_repo(&temp);
    repo.checkout_new("feature-x").unwrap();
    repo.checkout("main").unwrap();
    std::fs::write(temp.path().join("work.txt"), "work").unwrap();

    let prompter = ScriptedPrompter {
        target: BranchTarget::Named("feature-x".to_string()),
        existing_action: ExistingBranchAction::Abort,
        ..Default::default()
    };

    workflow::run(temp.path(), &Settings::default(), &prompter).unwrap();

    // The commit landed, the checkout never moved
    let repo = GitRepo::open(temp.path()).unwrap();
    assert_eq!(repo.current_branch().unwrap(), "main");
    assert!(repo.branch_exists("feature-x"));
}

#[test]
fn run_initializes_a_fresh_repository_when_confirmed() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("new.txt"), "new").unwrap();

    let prompter = ScriptedPrompter {
        init: true,
        target: BranchTarget::Named("first".to_string()),
        ..Default::default()
    };

    workflow::run(temp.path(), &Settings::default(), &prompter).unwrap();

    let repo = GitRepo::open(temp.path()).unwrap();
    assert_eq!(repo.current_branch().unwrap(), "first");
}

#[test]
fn run_fails_when_init_is_declined() {
    let temp = TempDir::new().unwrap();

    let prompter = ScriptedPrompter {
        init: false,
        ..Default::default()
    };

    assert!(workflow::run(temp.path(), &Settings::default(), &prompter).is_err());
    assert!(!temp.path().join(".git").exists());
}

#[test]
fn manage_branches_switches_to_existing() {
    let temp = TempDir::new().unwrap();
    let repo = seeded_repo(&temp);
    repo.checkout_new("feature-x").unwrap();
    repo.checkout("main").unwrap();

    let prompter = ScriptedPrompter {
        target: BranchTarget::Named("feature-x".to_string()),
        existing_action: ExistingBranchAction::Switch,
        ..Default::default()
    };

    workflow::manage_branches(temp.path(), &Settings::default(), &prompter).unwrap();

    assert_eq!(repo.current_branch().unwrap(), "feature-x");
}

#[test]
fn manage_branches_delete_and_recreate() {
    let temp = TempDir::new().unwrap();
    let repo = seeded_repo(&temp);
    repo.checkout_new("feature-x").unwrap();
    std::fs::write(temp.path().join("extra.txt"), "extra").unwrap();
    repo.stage_all().unwrap();
    repo.commit("extra").unwrap();

    let prompter = ScriptedPrompter {
        target: BranchTarget::Named("feature-x".to_string()),
        existing_action: ExistingBranchAction::DeleteAndRecreate,
        ..Default::default()
    };

    workflow::manage_branches(temp.path(), &Settings::default(), &prompter).unwrap();

    // Recreated from main: the extra commit is gone
    assert_eq!(repo.current_branch().unwrap(), "feature-x");
    let log = repo.log().unwrap();
    assert!(!log.contains("extra"));
}

#[test]
fn collab_merge_backs_up_before_merging() {
    let temp = TempDir::new().unwrap();
    let work = temp.path().join("project");
    std::fs::create_dir(&work).unwrap();
    let repo = GitRepo::init(&work).unwrap();
    std::fs::write(work.join("seed.txt"), "seed").unwrap();
    repo.stage_all().unwrap();
    repo.commit("seed").unwrap();
    repo.rename_branch("main").unwrap();

    repo.checkout_new("feature").unwrap();
    std::fs::write(work.join("feature.txt"), "feature").unwrap();
    repo.stage_all().unwrap();
    repo.commit("feature work").unwrap();
    repo.checkout("main").unwrap();

    let prompter = ScriptedPrompter {
        collab: RefCell::new(VecDeque::from(vec![CollabAction::Merge, CollabAction::Exit])),
        merge_from: "feature".to_string(),
        ..Default::default()
    };

    workflow::collab_loop(&repo, &prompter).unwrap();

    // Merge landed
    assert!(work.join("feature.txt").exists());

    // And a backup sibling was produced first
    let backups: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("-backup-"))
        .collect();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].path().join("seed.txt").exists());
    assert!(!backups[0].path().join(".git").exists());
}

#[test]
fn collab_merge_of_unknown_branch_is_refused() {
    let temp = TempDir::new().unwrap();
    let work = temp.path().join("project");
    std::fs::create_dir(&work).unwrap();
    let repo = GitRepo::init(&work).unwrap();
    std::fs::write(work.join("seed.txt"), "seed").unwrap();
    repo.stage_all().unwrap();
    repo.commit("seed").unwrap();

    let prompter = ScriptedPrompter {
        collab: RefCell::new(VecDeque::from(vec![CollabAction::Merge, CollabAction::Exit])),
        merge_from: "no-such-branch".to_string(),
        ..Default::default()
    };

    workflow::collab_loop(&repo, &prompter).unwrap();

    // No backup was produced for a refused merge
    let backups: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("-backup-"))
        .collect();
    assert!(backups.is_empty());
}

#[test]
fn collab_pull_from_local_remote() {
    let temp = TempDir::new().unwrap();

    // Upstream repository with one commit
    let upstream_dir = temp.path().join("upstream");
    std::fs::create_dir(&upstream_dir).unwrap();
    let upstream = GitRepo::init(&upstream_dir).unwrap();
    std::fs::write(upstream_dir.join("shared.txt"), "shared").unwrap();
    upstream.stage_all().unwrap();
    upstream.commit("shared").unwrap();
    let upstream_branch = upstream.current_branch().unwrap();

    // Fresh local repository whose unborn branch carries the same
    // default name, tracking the upstream by path
    let local_dir = temp.path().join("local");
    std::fs::create_dir(&local_dir).unwrap();
    let local = GitRepo::init(&local_dir).unwrap();
    assert_eq!(local.current_branch().unwrap(), upstream_branch);
    local
        .add_remote("origin", &upstream_dir.to_string_lossy())
        .unwrap();

    let prompter = ScriptedPrompter {
        collab: RefCell::new(VecDeque::from(vec![CollabAction::Pull, CollabAction::Exit])),
        ..Default::default()
    };

    workflow::collab_loop(&local, &prompter).unwrap();

    assert!(local_dir.join("shared.txt").exists());
}

#[test]
fn collab_inspection_never_fails() {
    let temp = TempDir::new().unwrap();
    let work = temp.path().join("project");
    std::fs::create_dir(&work).unwrap();
    let repo = GitRepo::init(&work).unwrap();

    // Empty repo: log and diff have nothing to show, the loop goes on
    let prompter = ScriptedPrompter {
        collab: RefCell::new(VecDeque::from(vec![
            CollabAction::Status,
            CollabAction::Log,
            CollabAction::Diff,
            CollabAction::Exit,
        ])),
        ..Default::default()
    };

    workflow::collab_loop(&repo, &prompter).unwrap();
}
