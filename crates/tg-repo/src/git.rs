use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{VcsError, VcsResult};
use crate::repository::Repository;
use crate::runner::{output_lines, select_remote, ToolRunner};
use crate::vcs_types::VcsType;

/// `git rev-parse @{u}` exits with this code when no upstream is configured
const NO_UPSTREAM_EXIT_CODE: i32 = 128;

static LS_REMOTE_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ref:\s+refs/heads/(?P<branch_name>\S+)\s+HEAD")
        .expect("ls-remote HEAD pattern is valid")
});

/// Branch names tried, in order, when nothing better is known
const GUESSED_DEFAULT_BRANCHES: [&str; 2] = ["main", "master"];

type DefaultBranchStrategy = fn(&GitRepository) -> VcsResult<String>;

/// Ways to find the default branch, cheapest first.
const DEFAULT_BRANCH_STRATEGIES: [(&str, DefaultBranchStrategy); 3] = [
    ("cloned metadata", GitRepository::default_branch_from_cloned_metadata),
    ("remote query", GitRepository::default_branch_from_remote_query),
    ("local branch scan", GitRepository::guess_default_branch),
];

/// Git working copy
#[derive(Debug, Clone)]
pub struct GitRepository {
    runner: ToolRunner,
}

impl GitRepository {
    /// Bind to the working copy at `path`, failing if `git` is not on PATH
    pub fn new<P: AsRef<Path>>(path: P) -> VcsResult<Self> {
        let mut runner = ToolRunner::new(VcsType::Git, path)?;
        runner.set_env("GIT_TERMINAL_PROMPT", "0");
        Ok(Self { runner })
    }

    fn run(&self, args: &[&str]) -> VcsResult<String> {
        self.runner.run(args)
    }

    /// Works when the checkout was cloned and `<remote>/HEAD` was recorded
    fn default_branch_from_cloned_metadata(&self) -> VcsResult<String> {
        let remote_head = format!("{}/HEAD", self.remote_name()?);
        let output = self.run(&["rev-parse", "--abbrev-ref", &remote_head])?;
        match strip_remote_prefix(output.trim()) {
            Some(branch) => Ok(branch),
            None => Err(VcsError::UnexpectedOutput {
                command: format!("git rev-parse --abbrev-ref {}", remote_head),
                output,
            }),
        }
    }

    /// Needs network access to the remote
    fn default_branch_from_remote_query(&self) -> VcsResult<String> {
        let remote = self.remote_name()?;
        let output = self.run(&["ls-remote", "--symref", &remote, "HEAD"])?;
        match parse_ls_remote_head(&output) {
            Some(branch) => Ok(branch),
            None => Err(VcsError::UnexpectedOutput {
                command: format!("git ls-remote --symref {} HEAD", remote),
                output,
            }),
        }
    }

    /// Last resort for repositories that were `git init`ed locally
    fn guess_default_branch(&self) -> VcsResult<String> {
        let output = self.run(&["branch", "--all", "--no-color", "--format=%(refname:short)"])?;
        match pick_guessed_branch(&output) {
            Some(branch) => Ok(branch),
            None => Err(VcsError::UnexpectedOutput {
                command: "git branch --all".to_string(),
                output,
            }),
        }
    }
}

impl Repository for GitRepository {
    fn tool(&self) -> VcsType {
        VcsType::Git
    }

    fn path(&self) -> &Path {
        self.runner.root()
    }

    fn binary(&self) -> &Path {
        self.runner.binary()
    }

    fn set_env(&mut self, key: &str, value: &str) {
        self.runner.set_env(key, value);
    }

    fn head_rev(&self) -> VcsResult<String> {
        Ok(self.run(&["rev-parse", "--verify", "HEAD"])?.trim().to_string())
    }

    fn base_rev(&self) -> VcsResult<String> {
        let refs = self.run(&[
            "rev-list",
            "HEAD",
            "--topo-order",
            "--boundary",
            "--not",
            "--remotes",
        ])?;
        match last_boundary(&refs) {
            Some(base) => Ok(base),
            None => self.head_rev(),
        }
    }

    fn branch(&self) -> VcsResult<Option<String>> {
        let branch = self.run(&["branch", "--show-current"])?;
        let branch = branch.trim();
        if branch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(branch.to_string()))
        }
    }

    fn remote_name(&self) -> VcsResult<String> {
        match self.run(&[
            "rev-parse",
            "--verify",
            "--abbrev-ref",
            "--symbolic-full-name",
            "@{u}",
        ]) {
            Ok(upstream) => {
                let upstream = upstream.trim();
                return Ok(upstream.split('/').next().unwrap_or(upstream).to_string());
            }
            Err(e) if e.exit_code() == Some(NO_UPSTREAM_EXIT_CODE) => {}
            Err(e) => return Err(e),
        }

        let remotes = output_lines(&self.run(&["remote"])?);
        select_remote(remotes, VcsType::Git.default_remote())
    }

    fn default_branch(&self) -> VcsResult<String> {
        let mut attempts = Vec::new();

        for (name, strategy) in DEFAULT_BRANCH_STRATEGIES {
            match strategy(self) {
                Ok(branch) => return Ok(branch),
                Err(
                    e @ (VcsError::CommandFailed { .. }
                    | VcsError::UnexpectedOutput { .. }
                    | VcsError::AmbiguousRemote { .. }),
                ) => {
                    debug!(strategy = name, error = %e, "default branch strategy failed");
                    attempts.push(format!("{}: {}", name, e));
                }
                Err(e) => return Err(e),
            }
        }

        Err(VcsError::DefaultBranchNotFound { attempts })
    }

    fn url(&self, remote: Option<&str>) -> VcsResult<String> {
        let remote = remote.unwrap_or(VcsType::Git.default_remote());
        Ok(self.run(&["remote", "get-url", remote])?.trim().to_string())
    }

    fn commit_message(&self, revision: Option<&str>) -> VcsResult<String> {
        let revision = revision.unwrap_or("HEAD");
        self.run(&["log", "-n1", "--format=%B", revision, "--"])
    }

    fn working_directory_clean(&self, untracked: bool, ignored: bool) -> VcsResult<bool> {
        // --porcelain still honors status.showUntrackedFiles, so always be explicit
        let mut args = vec![
            "status",
            "--porcelain",
            if untracked {
                "--untracked-files=all"
            } else {
                "--untracked-files=no"
            },
        ];
        if ignored {
            args.push("--ignored");
        }

        Ok(self.run(&args)?.trim().is_empty())
    }

    fn update(&self, reference: &str) -> VcsResult<()> {
        self.run(&["checkout", "--force", reference])?;
        Ok(())
    }
}

/// Last `-`-prefixed boundary commit in `rev-list --boundary` output
fn last_boundary(rev_list: &str) -> Option<String> {
    rev_list
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix('-'))
        .filter(|rev| !rev.is_empty())
        .map(str::to_string)
}

/// `origin/main` -> `main`, `origin/release/1.0` -> `release/1.0`
fn strip_remote_prefix(abbrev_ref: &str) -> Option<String> {
    match abbrev_ref.split_once('/') {
        Some((_, branch)) if !branch.is_empty() && branch != "HEAD" => Some(branch.to_string()),
        _ => None,
    }
}

fn parse_ls_remote_head(output: &str) -> Option<String> {
    LS_REMOTE_HEAD
        .captures(output)
        .map(|caps| caps["branch_name"].to_string())
}

fn pick_guessed_branch(branch_list: &str) -> Option<String> {
    let branches = output_lines(branch_list);
    GUESSED_DEFAULT_BRANCHES
        .into_iter()
        .find(|candidate| branches.iter().any(|b| b == *candidate))
        .map(|b| b.to_string())
}
