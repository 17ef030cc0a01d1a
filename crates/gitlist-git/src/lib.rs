//! gitlist-git - Git data-context driver
//!
//! Exposes a local git repository as queryable collections (commits,
//! branches, tags, remotes, stashes and working-tree status) and offers
//! stage/unstage/commit/discard/diff commands on status entries plus
//! apply/pop/drop on stashes.
//!
//! # Example
//!
//! ```no_run
//! use gitlist_core::{ConnectionInfo, DataContextDriver};
//! use gitlist_git::{GitContext, GitDriver};
//!
//! let driver = GitDriver::new();
//! let mut info = driver.new_connection();
//! info.set("RepositoryPath", "/src/project");
//!
//! let mut context = GitContext::default();
//! driver.initialize_context(&info, &mut context)?;
//! for commit in context.session()?.commits()? {
//!     println!("{commit}");
//! }
//! # Ok::<(), gitlist_git::GitError>(())
//! ```

pub mod commands;
pub mod diff;
pub mod driver;
pub mod error;
pub mod model;
pub mod preview;
pub mod properties;
pub mod schema;
pub mod session;
pub mod status;

#[cfg(test)]
mod test_support;

pub use commands::{StashCommand, StatusCommand, UnknownCommand};
pub use driver::{GitDriver, DRIVER_NAME};
pub use error::{GitError, GitResult};
pub use model::{Branch, Commit, Identity, Remote, Stash, StatusEntry, Tag, TargetKind, TreeEntry};
pub use preview::DiffPreview;
pub use properties::{ConnectionProperties, ValidationError};
pub use session::{GitContext, Session};
pub use status::{Bucket, Classification, FileState};
