//! # gitlist-core
//!
//! Host contracts shared by gitlist data-context drivers and the hosts
//! that load them.
//!
//! A host owns a named connection, asks the driver for a schema tree to
//! drive browsing and auto-complete, and initializes a per-query context
//! before running queries or commands against it. Commands report every
//! outcome through an [`OutputSink`] instead of returning errors.
//!
//! ## Core Abstractions
//!
//! - [`DataContextDriver`] - Trait implemented by drivers
//! - [`ExplorerItem`] - Static schema tree consumed by the host
//! - [`ConnectionInfo`] / [`ConnectionStore`] - Persisted key/value connection data
//! - [`CommandContext`] - Output sink, prompt and process launcher handed to commands
//! - [`CoreError`] - Error types for host operations
//!
//! ## Example
//!
//! ```ignore
//! use gitlist_core::{ConnectionInfo, DataContextDriver};
//!
//! let mut info = ConnectionInfo::for_driver(driver.metadata().name.clone());
//! info.set("RepositoryPath", "/src/project");
//!
//! for item in driver.schema(&info) {
//!     println!("{}", item.text);
//! }
//!
//! let mut context = Default::default();
//! driver.initialize_context(&info, &mut context)?;
//! ```

pub mod connection;
pub mod driver;
pub mod error;
pub mod output;
pub mod schema;

pub use connection::{ConnectionInfo, ConnectionStore};
pub use driver::{DataContextDriver, DriverMetadata};
pub use error::{CoreError, CoreResult};
pub use output::{
    CommandContext, DetachedLauncher, DiffHunk, DiffLine, DiffView, Launcher, MemorySink, Output,
    OutputSink, Prompt, RecordingLauncher, ScriptedPrompt,
};
pub use schema::{render_tree, ExplorerIcon, ExplorerItem, ExplorerItemKind};
