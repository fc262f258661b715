//! VCS repository abstraction crate.
//!
//! This crate provides a single [`Repository`] interface over Mercurial and Git
//! working copies, so callers can query head/base revisions, branches, remotes
//! and cleanliness, or update the checkout, without caring which VCS is in use.

pub mod error;
pub mod git;
pub mod hg;
pub mod locator;
pub mod repository;
pub mod runner;
pub mod test_helpers;
pub mod vcs_types;

pub use error::{VcsError, VcsResult};
pub use git::GitRepository;
pub use hg::HgRepository;
pub use locator::{find_repository_root, get_repository};
pub use repository::Repository;
pub use runner::ToolRunner;
pub use vcs_types::VcsType;
