//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module should
//! import `git2`, and we never shell out to the git CLI.
//!
//! # Responsibilities
//!
//! - Repository discovery from any path (upward search)
//! - HEAD commit and reachable commit count
//! - Current branch or detached-HEAD detection
//! - [`RevisionInfo`] for arbitrary paths, tolerant of non-repositories
//!
//! # Example
//!
//! ```ignore
//! use testmeta::git::RevisionInfo;
//! use std::path::Path;
//!
//! let info = RevisionInfo::inspect(Path::new("/srv/poky/meta"))?;
//! if info.is_tracked() {
//!     println!("{:?}", info.to_map());
//! }
//! ```

mod interface;
mod revision;

pub use interface::{Git, GitError};
pub use revision::{git_rev_info, RevisionInfo, NO_BRANCH};
