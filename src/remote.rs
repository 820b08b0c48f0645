//! Remote configuration.
//!
//! A session supports exactly one destination remote, named "origin".
//! Reconfiguration is replace-not-merge: any existing binding is
//! removed before the new one is added.

use anyhow::{anyhow, Context, Result};
use log::info;

use crate::git::GitRepo;

/// The only remote name this tool manages.
pub const REMOTE_NAME: &str = "origin";

/// Human-readable list of URL schemes [`is_valid_git_url`] accepts,
/// shared by every message that mentions them.
pub const ACCEPTED_URL_SCHEMES: &str = "'https://', 'http://', 'git@' or 'ssh://'";

/// Bind "origin" to `url`, replacing any existing binding.
///
/// The URL shape is checked before any mutation; a malformed URL is
/// refused without touching the repository. The final state always has
/// exactly one "origin", bound to the last URL given.
pub fn ensure_origin(repo: &GitRepo, url: &str) -> Result<()> {
    if !is_valid_git_url(url) {
        return Err(anyhow!(
            "Invalid git URL '{url}'. Must start with {ACCEPTED_URL_SCHEMES}"
        ));
    }

    if repo.remote_exists(REMOTE_NAME) {
        let old = repo.remote_url(REMOTE_NAME).unwrap_or_default();
        info!("replacing remote '{REMOTE_NAME}' ({old} -> {url})");
        repo.remove_remote(REMOTE_NAME)
            .context("Failed to remove the existing 'origin' remote")?;
    } else {
        info!("adding remote '{REMOTE_NAME}' -> {url}");
    }

    repo.add_remote(REMOTE_NAME, url)
        .context("Failed to add the 'origin' remote")
}

/// Validate git URL format
pub fn is_valid_git_url(url: &str) -> bool {
    url.starts_with("https://")
        || url.starts_with("http://")
        || url.starts_with("git@")
        || url.starts_with("ssh://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("https://github.com/user/repo.git", true)]
    #[case("http://gitlab.com/user/repo.git", true)]
    #[case("git@github.com:user/repo.git", true)]
    #[case("ssh://git@github.com/user/repo.git", true)]
    #[case("invalid-url", false)]
    #[case("/local/path", false)]
    #[case("", false)]
    fn test_is_valid_git_url(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_valid_git_url(url), expected);
    }

    #[test]
    fn test_ensure_origin_adds_when_absent() {
        let temp = TempDir::new().unwrap();
        let repo = GitRepo::init(temp.path()).unwrap();

        ensure_origin(&repo, "https://github.com/test/a.git").unwrap();

        assert_eq!(repo.list_remotes().unwrap(), vec!["origin".to_string()]);
        assert_eq!(
            repo.remote_url("origin").unwrap(),
            "https://github.com/test/a.git"
        );
    }

    #[test]
    fn test_ensure_origin_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let repo = GitRepo::init(temp.path()).unwrap();

        ensure_origin(&repo, "https://github.com/test/a.git").unwrap();
        ensure_origin(&repo, "https://github.com/test/b.git").unwrap();

        // exactly one origin, bound to the second URL
        assert_eq!(repo.list_remotes().unwrap(), vec!["origin".to_string()]);
        assert_eq!(
            repo.remote_url("origin").unwrap(),
            "https://github.com/test/b.git"
        );
    }

    #[test]
    fn test_bad_url_error_names_the_accepted_schemes() {
        let temp = TempDir::new().unwrap();
        let repo = GitRepo::init(temp.path()).unwrap();

        let err = ensure_origin(&repo, "not-a-url").unwrap_err();
        assert!(err.to_string().contains(ACCEPTED_URL_SCHEMES));
    }

    #[test]
    fn test_ensure_origin_refuses_bad_url_without_mutating() {
        let temp = TempDir::new().unwrap();
        let repo = GitRepo::init(temp.path()).unwrap();

        ensure_origin(&repo, "git@github.com:test/a.git").unwrap();
        assert!(ensure_origin(&repo, "not-a-url").is_err());

        // The prior binding is untouched
        assert_eq!(
            repo.remote_url("origin").unwrap(),
            "git@github.com:test/a.git"
        );
    }
}
