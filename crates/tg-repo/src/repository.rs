use std::path::Path;

use crate::error::VcsResult;
use crate::vcs_types::VcsType;

/// Operations every VCS backend exposes.
///
/// Queries shell out to the backend's executable and parse its output;
/// nothing is cached between calls.
pub trait Repository: std::fmt::Debug {
    /// Version control system being used
    fn tool(&self) -> VcsType;

    /// Root of the working copy
    fn path(&self) -> &Path;

    /// Absolute path of the resolved executable
    fn binary(&self) -> &Path;

    /// Override an environment entry for subsequent commands of this instance
    fn set_env(&mut self, key: &str, value: &str);

    /// Hash of the revision currently checked out
    fn head_rev(&self) -> VcsResult<String>;

    /// Hash of the revision the current line of work is based on.
    ///
    /// This is the most recent ancestor already present in public or remote
    /// history, or the head revision when there is none.
    fn base_rev(&self) -> VcsResult<String>;

    /// Current branch or bookmark, `None` when detached
    fn branch(&self) -> VcsResult<Option<String>>;

    /// Name of the remote treated as canonical
    fn remote_name(&self) -> VcsResult<String>;

    /// Name of the trunk branch
    fn default_branch(&self) -> VcsResult<String>;

    /// URL of `remote`, or of the conventional default remote
    fn url(&self, remote: Option<&str>) -> VcsResult<String>;

    /// Full commit message of `revision`, or of the checked out revision
    fn commit_message(&self, revision: Option<&str>) -> VcsResult<String>;

    /// Determine if the working directory is free of modifications.
    ///
    /// Untracked and ignored files only count when `untracked` or `ignored`
    /// is set.
    fn working_directory_clean(&self, untracked: bool, ignored: bool) -> VcsResult<bool>;

    /// Update the working directory to `reference`.
    ///
    /// Mercurial refuses to clobber uncommitted changes; Git discards them.
    fn update(&self, reference: &str) -> VcsResult<()>;
}
