use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::VcsResult;
use crate::repository::Repository;
use crate::runner::{output_lines, select_remote, ToolRunner};
use crate::vcs_types::VcsType;

const BASE_REVSET: &str = "last(ancestors(.) and public())";

/// Mercurial working copy
#[derive(Debug, Clone)]
pub struct HgRepository {
    runner: ToolRunner,
}

impl HgRepository {
    /// Bind to the working copy at `path`, failing if `hg` is not on PATH
    pub fn new<P: AsRef<Path>>(path: P) -> VcsResult<Self> {
        let mut runner = ToolRunner::new(VcsType::Hg, path)?;
        // Keep aliases, localization and user config out of parsed output
        runner.set_env("HGPLAIN", "1");
        Ok(Self { runner })
    }

    fn run(&self, args: &[&str]) -> VcsResult<String> {
        self.runner.run(args)
    }
}

impl Repository for HgRepository {
    fn tool(&self) -> VcsType {
        VcsType::Hg
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
        Ok(self.run(&["log", "-r", ".", "-T", "{node}"])?.trim().to_string())
    }

    fn base_rev(&self) -> VcsResult<String> {
        let base = self.run(&["log", "-r", BASE_REVSET, "-T", "{node}"])?;
        let base = base.trim();
        if base.is_empty() {
            return self.head_rev();
        }
        Ok(base.to_string())
    }

    fn branch(&self) -> VcsResult<Option<String>> {
        let bookmark_file = self.path().join(".hg").join("bookmarks.current");
        let bookmark = match fs::read_to_string(&bookmark_file) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let bookmark = bookmark.trim_end_matches(['\r', '\n']);
        if bookmark.is_empty() {
            Ok(None)
        } else {
            Ok(Some(bookmark.to_string()))
        }
    }

    fn remote_name(&self) -> VcsResult<String> {
        let remotes = output_lines(&self.run(&["paths", "--quiet"])?);
        select_remote(remotes, VcsType::Hg.default_remote())
    }

    fn default_branch(&self) -> VcsResult<String> {
        // Mercurial recommends keeping development on "default"
        Ok("default".to_string())
    }

    fn url(&self, remote: Option<&str>) -> VcsResult<String> {
        let remote = remote.unwrap_or(VcsType::Hg.default_remote());
        Ok(self.run(&["path", "-T", "{url}", remote])?.trim().to_string())
    }

    fn commit_message(&self, revision: Option<&str>) -> VcsResult<String> {
        let revision = revision.unwrap_or(".");
        self.run(&["log", "-r", revision, "-T", "{desc}"])
    }

    fn working_directory_clean(&self, untracked: bool, ignored: bool) -> VcsResult<bool> {
        let mut args = vec!["status", "--modified", "--added", "--removed", "--deleted"];
        if untracked {
            args.push("--unknown");
        }
        if ignored {
            args.push("--ignored");
        }

        Ok(self.run(&args)?.trim().is_empty())
    }

    fn update(&self, reference: &str) -> VcsResult<()> {
        self.run(&["update", "--check", reference])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_hg_repo, hg_available};
    use std::ffi::OsStr;

    #[test]
    fn plain_output_is_forced() {
        if !hg_available() {
            println!("Skipping Mercurial test: hg command not available");
            return;
        }

        let repo = create_hg_repo(None).unwrap();
        let mut vcs = HgRepository::new(&repo.path).unwrap();
        assert_eq!(vcs.runner.env("HGPLAIN"), Some(OsStr::new("1")));

        vcs.set_env("HGPLAIN", "0");
        assert_eq!(vcs.runner.env("HGPLAIN"), Some(OsStr::new("0")));
        assert_ne!(std::env::var("HGPLAIN").ok().as_deref(), Some("0"));
    }
}
