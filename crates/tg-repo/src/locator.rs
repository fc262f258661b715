use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{VcsError, VcsResult};
use crate::git::GitRepository;
use crate::hg::HgRepository;
use crate::repository::Repository;
use crate::vcs_types::VcsType;

/// Find the closest ancestor of `start_path` (inclusive) holding VCS metadata.
///
/// A `.hg` directory marks Mercurial; a `.git` file or directory marks Git.
/// Mercurial wins when both live at the same level.
pub fn find_repository_root<P: AsRef<Path>>(start_path: P) -> VcsResult<(PathBuf, VcsType)> {
    let start_path = start_path.as_ref();
    let not_found = || VcsError::RepositoryNotFound(start_path.display().to_string());

    let mut current_dir = start_path.canonicalize().map_err(|_| not_found())?;
    if current_dir.is_file() {
        current_dir = current_dir.parent().ok_or_else(not_found)?.to_path_buf();
    }

    for dir in current_dir.ancestors() {
        if dir.join(VcsType::Hg.marker()).is_dir() {
            return Ok((dir.to_path_buf(), VcsType::Hg));
        }
        if dir.join(VcsType::Git.marker()).exists() {
            return Ok((dir.to_path_buf(), VcsType::Git));
        }
    }

    Err(not_found())
}

/// Get a repository object for the working copy containing `start_path`.
pub fn get_repository<P: AsRef<Path>>(start_path: P) -> VcsResult<Box<dyn Repository>> {
    let (root, vcs_type) = find_repository_root(start_path)?;
    debug!(root = %root.display(), vcs = %vcs_type, "found repository");

    let repo: Box<dyn Repository> = match vcs_type {
        VcsType::Hg => Box::new(HgRepository::new(root)?),
        VcsType::Git => Box::new(GitRepository::new(root)?),
    };
    Ok(repo)
}
