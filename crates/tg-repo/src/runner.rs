use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{VcsError, VcsResult};
use crate::vcs_types::VcsType;

/// Runs a resolved VCS executable inside a working copy.
///
/// Each runner owns a copy of the process environment taken at construction,
/// so overrides never leak into the parent process or sibling repositories.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    root: PathBuf,
    binary: PathBuf,
    env: HashMap<OsString, OsString>,
}

impl ToolRunner {
    /// Resolve the executable for `vcs_type` on PATH and bind it to `root`
    pub fn new<P: AsRef<Path>>(vcs_type: VcsType, root: P) -> VcsResult<Self> {
        let tool = vcs_type.binary_name();
        let binary = which::which(tool).map_err(|source| VcsError::ToolNotFound {
            tool: tool.to_string(),
            source,
        })?;

        Ok(Self {
            root: root.as_ref().to_path_buf(),
            binary,
            env: std::env::vars_os().collect(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Override an entry in this runner's environment copy
    pub fn set_env(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.env.insert(key.into(), value.into());
    }

    pub fn env<K: AsRef<OsStr>>(&self, key: K) -> Option<&OsStr> {
        self.env.get(key.as_ref()).map(OsString::as_os_str)
    }

    /// Run the tool with `args`, returning captured stdout.
    ///
    /// A non-zero exit becomes [`VcsError::CommandFailed`] carrying both
    /// output streams. Failing to spawn the process is [`VcsError::Io`].
    pub fn run(&self, args: &[&str]) -> VcsResult<String> {
        let command = self.describe(args);
        debug!(command = %command, cwd = %self.root.display(), "running VCS command");

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.root)
            .env_clear()
            .envs(&self.env)
            .stdin(Stdio::null())
            .output()?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(VcsError::Utf8)
        } else {
            Err(VcsError::CommandFailed {
                command,
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut parts = vec![self.binary.display().to_string()];
        parts.extend(args.iter().map(|a| a.to_string()));
        parts.join(" ")
    }
}

/// Pick the canonical remote out of the configured ones.
///
/// A single remote wins regardless of its name, otherwise `preferred` must be
/// among the candidates.
pub(crate) fn select_remote(mut remotes: Vec<String>, preferred: &str) -> VcsResult<String> {
    if remotes.len() == 1 {
        return Ok(remotes.swap_remove(0));
    }

    if remotes.iter().any(|r| r == preferred) {
        return Ok(preferred.to_string());
    }

    Err(VcsError::AmbiguousRemote {
        candidates: remotes,
    })
}

/// Non-empty trimmed lines of command output
pub(crate) fn output_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_remote_wins_regardless_of_name() {
        assert_eq!(select_remote(names(&["upstream"]), "origin").unwrap(), "upstream");
    }

    #[test]
    fn preferred_remote_wins_among_many() {
        assert_eq!(
            select_remote(names(&["upstream", "origin"]), "origin").unwrap(),
            "origin"
        );
    }

    #[test]
    fn ambiguous_remotes_are_listed() {
        match select_remote(names(&["fork", "upstream"]), "origin") {
            Err(VcsError::AmbiguousRemote { candidates }) => {
                assert_eq!(candidates, names(&["fork", "upstream"]));
            }
            other => panic!("expected AmbiguousRemote, got {:?}", other),
        }
    }

    #[test]
    fn no_remotes_is_ambiguous() {
        assert!(matches!(
            select_remote(vec![], "default"),
            Err(VcsError::AmbiguousRemote { .. })
        ));
    }

    #[test]
    fn spawn_failure_is_io_error() {
        if !crate::test_helpers::git_available() {
            println!("Skipping Git test: git command not available");
            return;
        }

        let dir = tempfile::TempDir::new().unwrap();
        let runner = ToolRunner::new(VcsType::Git, dir.path().join("gone")).unwrap();
        match runner.run(&["status"]) {
            Err(VcsError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[test]
    fn output_lines_skips_blanks() {
        assert_eq!(output_lines("a\n\n  b  \n"), names(&["a", "b"]));
    }
}
