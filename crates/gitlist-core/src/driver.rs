//! Driver trait and metadata.
//!
//! A driver turns a [`ConnectionInfo`] into a schema tree for the host
//! and a live context for queries. The host owns the context value and
//! hands it back on every query, so no driver needs process-wide state.

use crate::connection::ConnectionInfo;
use crate::schema::ExplorerItem;

/// Metadata describing a driver for connection lists and about boxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
}

/// Trait implemented by data-context drivers.
pub trait DataContextDriver {
    /// Per-session state the host keeps between queries.
    type Context: Default;

    /// Error surfaced when a context cannot be initialized.
    type Error: std::error::Error + Send + Sync + 'static;

    fn metadata(&self) -> &DriverMetadata;

    /// Short, human friendly label for a saved connection.
    fn connection_description(&self, cx: &ConnectionInfo) -> String;

    /// Static schema tree for browsing and auto-complete.
    ///
    /// Must not fail: problems are reported as explorer items so the
    /// browsing UI keeps working.
    fn schema(&self, cx: &ConnectionInfo) -> Vec<ExplorerItem>;

    /// Prepare `context` for a query against `cx`.
    ///
    /// Called before every query. Implementations should keep expensive
    /// resources open when the connection has not changed.
    fn initialize_context(
        &self,
        cx: &ConnectionInfo,
        context: &mut Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called after a query completes.
    fn on_query_finishing(&self, _cx: &ConnectionInfo, _context: &mut Self::Context) {}
}
