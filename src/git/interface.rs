//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to Git in testmeta. It only
//! reads: repository discovery, the commit HEAD points at, how many commits
//! are reachable from it, and which branch (if any) is checked out.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: No repository at or above the path
//! - [`GitError::RefNotFound`]: HEAD is unborn or a ref is missing
//! - [`GitError::Internal`]: Anything else reported by libgit2
//!
//! # Example
//!
//! ```ignore
//! use testmeta::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("./meta-oe/recipes-core"))?;
//! let oid = git.head_oid()?;
//! println!("{} at {} ({} commits)", git.work_dir().display(), oid, git.head_commit_count()?);
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{Oid, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::UnbornBranch => GitError::RefNotFound {
                refname: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
        }
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// should import `git2` directly.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open the repository enclosing the given path.
    ///
    /// Uses `git2::Repository::discover`, which walks up through parent
    /// directories, so `path` can be any directory within the repository.
    /// Bare repositories are accepted.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if the path does not exist or no repository
    ///   is found above it
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self { repo })
    }

    /// Get the working directory, falling back to the git dir for bare
    /// repositories.
    pub fn work_dir(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Get HEAD commit OID.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if HEAD is unborn (no commits yet)
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let commit = self.head_commit()?;
        Oid::new(commit.id().to_string()).map_err(|e| e.into())
    }

    /// Count the commits reachable from HEAD, HEAD included.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if HEAD is unborn
    pub fn head_commit_count(&self) -> Result<usize, GitError> {
        let commit = self.head_commit()?;

        let mut revwalk = self.repo.revwalk().map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;

        revwalk.push(commit.id()).map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;

        let mut count = 0;
        for oid in revwalk {
            oid.map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;
            count += 1;
        }
        Ok(count)
    }

    /// Get the current branch name, if on a branch.
    ///
    /// Returns `None` if HEAD is detached. An unborn branch (fresh
    /// repository) still reports its name.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        if self.repo.head_detached().map_err(|e| GitError::from_git2(e, "HEAD"))? {
            return Ok(None);
        }

        let head = match self.repo.find_reference("HEAD") {
            Ok(h) => h,
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        let target = head
            .symbolic_target()
            .and_then(|t| t.strip_prefix("refs/heads/"))
            .map(str::to_string);

        Ok(target)
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>, GitError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        head.peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))
    }
}
