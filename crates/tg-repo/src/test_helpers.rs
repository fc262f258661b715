//! Repository fixtures for unit and integration testing.
//!
//! These helpers build throwaway Git and Mercurial working copies (optionally
//! with a remote) in temporary directories, driving the real executables.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

use crate::vcs_types::VcsType;

type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Check if the executable for `vcs_type` is available on the system.
pub fn tool_available(vcs_type: VcsType) -> bool {
    Command::new(vcs_type.binary_name())
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Check if git is available on the system.
pub fn git_available() -> bool {
    tool_available(VcsType::Git)
}

/// Check if hg is available on the system.
pub fn hg_available() -> bool {
    tool_available(VcsType::Hg)
}

/// Configuration options for test repository creation.
#[derive(Debug, Clone)]
pub struct TestRepoConfig {
    /// Committer email (default: "test@example.com")
    pub user_email: String,
    /// Committer name (default: "Test User")
    pub user_name: String,
    /// Initial git branch (default: "main"); ignored for hg
    pub initial_branch: String,
    /// Whether to create an initial commit with README.md (default: true)
    pub create_initial_commit: bool,
    /// Initial commit message (default: "Initial commit")
    pub initial_commit_message: String,
}

impl TestRepoConfig {
    /// Create a new TestRepoConfig with default values, allowing fluent configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tg_repo::test_helpers::TestRepoConfig;
    ///
    /// let config = TestRepoConfig::new()
    ///     .initial_branch("trunk")
    ///     .create_initial_commit(false);
    /// assert_eq!(config.initial_branch, "trunk");
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = email.into();
        self
    }

    pub fn user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = name.into();
        self
    }

    pub fn initial_branch(mut self, branch: impl Into<String>) -> Self {
        self.initial_branch = branch.into();
        self
    }

    pub fn create_initial_commit(mut self, create: bool) -> Self {
        self.create_initial_commit = create;
        self
    }

    pub fn initial_commit_message(mut self, message: impl Into<String>) -> Self {
        self.initial_commit_message = message.into();
        self
    }

    fn hg_username(&self) -> String {
        format!("{} <{}>", self.user_name, self.user_email)
    }
}

impl Default for TestRepoConfig {
    fn default() -> Self {
        Self {
            user_email: "test@example.com".to_string(),
            user_name: "Test User".to_string(),
            initial_branch: "main".to_string(),
            create_initial_commit: true,
            initial_commit_message: "Initial commit".to_string(),
        }
    }
}

/// A working copy in a temporary directory.
pub struct TestRepo {
    /// Kept alive for the lifetime of the fixture
    pub dir: TempDir,
    /// Path to the working copy
    pub path: PathBuf,
}

/// A working copy together with the repository it pulls from.
pub struct TestRepoWithRemote {
    pub local: TestRepo,
    /// Git: bare repository; hg: the repository the local copy was cloned from
    pub remote: TestRepo,
}

/// Run `vcs_type`'s executable in `cwd`, returning stdout.
pub fn run_tool(vcs_type: VcsType, cwd: &Path, args: &[&str]) -> TestResult<String> {
    let mut command = Command::new(vcs_type.binary_name());
    command.args(args).current_dir(cwd).stdin(Stdio::null());
    match vcs_type {
        VcsType::Hg => {
            command.env("HGPLAIN", "1");
        }
        VcsType::Git => {
            command
                .env("GIT_CONFIG_NOSYSTEM", "1")
                .env("GIT_TERMINAL_PROMPT", "0");
        }
    }

    let output = command.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} {:?} failed: {}", vcs_type, args, stderr).into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn new_test_dir() -> TestResult<TestRepo> {
    let dir = TempDir::new()?;
    let path = dir.path().canonicalize()?;
    Ok(TestRepo { dir, path })
}

/// Create a git repository in a temporary directory.
pub fn create_git_repo(config: Option<TestRepoConfig>) -> TestResult<TestRepo> {
    let config = config.unwrap_or_default();
    let repo = new_test_dir()?;
    initialize_git_repo(&repo.path, &config)?;
    Ok(repo)
}

/// Create a git repository with a bare remote registered as `origin`.
///
/// Nothing is pushed; see [`push_to_remote`].
pub fn create_git_repo_with_remote(
    config: Option<TestRepoConfig>,
) -> TestResult<TestRepoWithRemote> {
    let remote = new_test_dir()?;
    run_tool(VcsType::Git, &remote.path, &["init", "--bare"])?;

    let local = create_git_repo(config)?;
    let remote_url = remote.path.to_string_lossy().to_string();
    run_tool(VcsType::Git, &local.path, &["remote", "add", "origin", &remote_url])?;

    Ok(TestRepoWithRemote { local, remote })
}

/// Initialize a git repository on an existing directory.
pub fn initialize_git_repo(repo_path: &Path, config: &TestRepoConfig) -> TestResult<()> {
    run_tool(VcsType::Git, repo_path, &["init", "-b", &config.initial_branch])?;

    for args in [
        ["config", "user.email", config.user_email.as_str()],
        ["config", "user.name", config.user_name.as_str()],
        ["config", "commit.gpgsign", "false"],
        ["config", "tag.gpgsign", "false"],
    ] {
        run_tool(VcsType::Git, repo_path, &args)?;
    }

    if config.create_initial_commit {
        create_commit(
            VcsType::Git,
            repo_path,
            "README.md",
            "Initial content",
            &config.initial_commit_message,
        )?;
    }

    Ok(())
}

/// Create a Mercurial repository in a temporary directory.
pub fn create_hg_repo(config: Option<TestRepoConfig>) -> TestResult<TestRepo> {
    let config = config.unwrap_or_default();
    let repo = new_test_dir()?;
    initialize_hg_repo(&repo.path, &config)?;
    Ok(repo)
}

/// Create a Mercurial repository and clone it, so the clone has a `default` path
/// and the cloned changesets are public.
pub fn create_hg_repo_with_remote(
    config: Option<TestRepoConfig>,
) -> TestResult<TestRepoWithRemote> {
    let remote = create_hg_repo(config)?;
    let local = new_test_dir()?;
    let clone_target = local.path.join("clone");
    run_tool(
        VcsType::Hg,
        &local.path,
        &[
            "clone",
            &remote.path.to_string_lossy(),
            &clone_target.to_string_lossy(),
        ],
    )?;

    let config = config_for_clone(&remote.path)?;
    std::fs::OpenOptions::new()
        .append(true)
        .open(clone_target.join(".hg").join("hgrc"))
        .and_then(|mut hgrc| std::io::Write::write_all(&mut hgrc, config.as_bytes()))?;

    Ok(TestRepoWithRemote {
        local: TestRepo {
            dir: local.dir,
            path: clone_target,
        },
        remote,
    })
}

/// The `[ui]` section of the source repository, so clones commit as the same user
fn config_for_clone(source: &Path) -> TestResult<String> {
    let hgrc = std::fs::read_to_string(source.join(".hg").join("hgrc"))?;
    Ok(format!("\n{}", hgrc))
}

/// Initialize a Mercurial repository on an existing directory.
pub fn initialize_hg_repo(repo_path: &Path, config: &TestRepoConfig) -> TestResult<()> {
    run_tool(VcsType::Hg, repo_path, &["init"])?;
    std::fs::write(
        repo_path.join(".hg").join("hgrc"),
        format!("[ui]\nusername = {}\n", config.hg_username()),
    )?;

    if config.create_initial_commit {
        create_commit(
            VcsType::Hg,
            repo_path,
            "README.md",
            "Initial content",
            &config.initial_commit_message,
        )?;
    }

    Ok(())
}

/// Write `filename`, commit it and return the new revision hash.
pub fn create_commit(
    vcs_type: VcsType,
    repo_path: &Path,
    filename: &str,
    content: &str,
    message: &str,
) -> TestResult<String> {
    std::fs::write(repo_path.join(filename), content)?;
    run_tool(vcs_type, repo_path, &["add", filename])?;
    run_tool(vcs_type, repo_path, &["commit", "-m", message])?;

    let head = match vcs_type {
        VcsType::Git => run_tool(vcs_type, repo_path, &["rev-parse", "HEAD"])?,
        VcsType::Hg => run_tool(vcs_type, repo_path, &["log", "-r", ".", "-T", "{node}"])?,
    };
    Ok(head.trim().to_string())
}

/// Push `branch` to `origin` and set it as upstream.
pub fn push_to_remote(repo_path: &Path, branch: &str) -> TestResult<()> {
    run_tool(VcsType::Git, repo_path, &["push", "-u", "origin", branch])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_git_repo_creation() {
        if !git_available() {
            println!("Skipping Git test: git command not available");
            return;
        }

        let repo = create_git_repo(None).unwrap();
        assert!(repo.path.join(".git").exists());

        let log = run_tool(VcsType::Git, &repo.path, &["log", "--oneline", "-1"]).unwrap();
        assert!(log.contains("Initial commit"));
    }

    #[test]
    fn test_git_repo_with_remote_creation() {
        if !git_available() {
            println!("Skipping Git test: git command not available");
            return;
        }

        let repo = create_git_repo_with_remote(None).unwrap();
        assert!(repo.remote.path.join("HEAD").exists());

        let remotes = run_tool(VcsType::Git, &repo.local.path, &["remote"]).unwrap();
        assert_eq!(remotes.trim(), "origin");
    }

    #[test]
    fn test_hg_clone_has_default_path() {
        if !hg_available() {
            println!("Skipping Mercurial test: hg command not available");
            return;
        }

        let repo = create_hg_repo_with_remote(None).unwrap();
        let paths = run_tool(VcsType::Hg, &repo.local.path, &["paths", "--quiet"]).unwrap();
        assert_eq!(paths.trim(), "default");
    }

    #[test]
    fn test_repo_config_builder() {
        let default_config = TestRepoConfig::default();
        assert_eq!(default_config.user_email, "test@example.com");
        assert_eq!(default_config.initial_branch, "main");
        assert!(default_config.create_initial_commit);
        assert_eq!(default_config.hg_username(), "Test User <test@example.com>");

        let custom = TestRepoConfig::new()
            .user_name("Custom User")
            .initial_branch("master")
            .initial_commit_message("Root");
        assert_eq!(custom.user_name, "Custom User");
        assert_eq!(custom.initial_branch, "master");
        assert_eq!(custom.initial_commit_message, "Root");
        assert_eq!(custom.user_email, "test@example.com");
    }
}
