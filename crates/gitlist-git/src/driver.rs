//! The git data-context driver.

use crate::error::GitError;
use crate::properties::{ConnectionProperties, ValidationError};
use crate::schema;
use crate::session::{GitContext, Session};
use gitlist_core::{ConnectionInfo, DataContextDriver, DriverMetadata, ExplorerItem};
use std::path::Path;

/// Driver name stored in saved connections.
pub const DRIVER_NAME: &str = "GitList";

#[derive(Debug, Clone)]
pub struct GitDriver {
    metadata: DriverMetadata,
}

impl Default for GitDriver {
    fn default() -> Self {
        GitDriver {
            metadata: DriverMetadata {
                name: DRIVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                author: env!("CARGO_PKG_AUTHORS").to_string(),
                description: "Query commits, branches, tags, stashes and status of a git repository"
                    .to_string(),
            },
        }
    }
}

impl GitDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A blank connection for this driver.
    pub fn new_connection(&self) -> ConnectionInfo {
        ConnectionInfo::for_driver(DRIVER_NAME)
    }
}

impl DataContextDriver for GitDriver {
    type Context = GitContext;
    type Error = GitError;

    fn metadata(&self) -> &DriverMetadata {
        &self.metadata
    }

    fn connection_description(&self, cx: &ConnectionInfo) -> String {
        ConnectionProperties::from_info(cx).description()
    }

    fn schema(&self, cx: &ConnectionInfo) -> Vec<ExplorerItem> {
        let props = ConnectionProperties::from_info(cx);
        let path = props.repository_path.trim();
        if path.is_empty() {
            return Vec::new();
        }

        match Session::open(path) {
            Ok(_) => schema::collections(),
            Err(err) => {
                tracing::debug!(path, error = %err, "schema unavailable");
                vec![ExplorerItem::error(err)]
            }
        }
    }

    fn initialize_context(
        &self,
        cx: &ConnectionInfo,
        context: &mut Self::Context,
    ) -> Result<(), Self::Error> {
        let props = ConnectionProperties::from_info(cx);
        let path = props.repository_path.trim();
        if path.is_empty() {
            return Err(ValidationError::MissingPath.into());
        }

        context.initialize(path, props.diff_tool().map(Path::to_path_buf))
    }
}
