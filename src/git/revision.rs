//! git::revision
//!
//! Revision info for an arbitrary path.
//!
//! A path either sits inside a repository, in which case we record the HEAD
//! commit, the number of commits reachable from it, and the checked-out
//! branch, or it does not, in which case the info is empty. Neither case is
//! an error.

use std::path::Path;

use crate::core::types::{MetaMap, Oid};

use super::{Git, GitError};

/// Branch value recorded when HEAD is detached.
pub const NO_BRANCH: &str = "(nobranch)";

/// Revision state of a path's enclosing repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionInfo {
    /// The path is not under version control.
    Untracked,
    /// The path is inside a repository with a HEAD commit.
    Tracked {
        /// Full hash of the HEAD commit
        commit: Oid,
        /// Commits reachable from HEAD, HEAD included
        commit_count: usize,
        /// Checked-out branch, or [`NO_BRANCH`] when detached
        branch: String,
    },
}

impl RevisionInfo {
    /// Inspect the repository enclosing `path`.
    ///
    /// Parent directories are searched. A missing path, a path outside any
    /// repository, and a repository without commits all yield
    /// [`RevisionInfo::Untracked`].
    ///
    /// # Errors
    ///
    /// Only unexpected libgit2 failures (corrupt objects, unreadable refs)
    /// are returned.
    pub fn inspect(path: &Path) -> Result<Self, GitError> {
        let git = match Git::open(path) {
            Ok(git) => git,
            Err(GitError::NotARepo { .. }) => {
                tracing::debug!(path = %path.display(), "not a git repository");
                return Ok(RevisionInfo::Untracked);
            }
            Err(e) => return Err(e),
        };

        let commit = match git.head_oid() {
            Ok(oid) => oid,
            Err(GitError::RefNotFound { .. }) => {
                tracing::warn!(repo = %git.work_dir().display(), "repository has no commits");
                return Ok(RevisionInfo::Untracked);
            }
            Err(e) => return Err(e),
        };
        let commit_count = git.head_commit_count()?;

        let branch = match git.current_branch()? {
            Some(name) => name,
            None => {
                tracing::debug!(repo = %git.work_dir().display(), "HEAD is detached");
                NO_BRANCH.to_string()
            }
        };

        Ok(RevisionInfo::Tracked {
            commit,
            commit_count,
            branch,
        })
    }

    /// Check whether the path was under version control.
    pub fn is_tracked(&self) -> bool {
        matches!(self, RevisionInfo::Tracked { .. })
    }

    /// Convert to a metadata mapping: empty, or `commit`, `commit_count`,
    /// `branch` in that order.
    pub fn to_map(&self) -> MetaMap {
        let mut map = MetaMap::new();
        if let RevisionInfo::Tracked {
            commit,
            commit_count,
            branch,
        } = self
        {
            map.insert("commit", commit.as_str());
            map.insert("commit_count", *commit_count);
            map.insert("branch", branch.as_str());
        }
        map
    }
}

/// Revision info for `path` as a metadata mapping.
pub fn git_rev_info(path: &Path) -> Result<MetaMap, GitError> {
    RevisionInfo::inspect(path).map(|info| info.to_map())
}
