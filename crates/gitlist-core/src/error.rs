//! Core error types for gitlist-core

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by host-side operations.
///
/// Driver errors are defined by each driver; these cover the pieces the
/// host owns, chiefly the persisted connection store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying IO error bubbled up from filesystem operations.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Connection store could not be parsed.
    #[error("invalid connection store at {path:?}: {source}")]
    ConnectionParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Connection store could not be serialized.
    #[error("failed to serialize connection store: {0}")]
    ConnectionSerialize(#[from] toml::ser::Error),

    /// No platform configuration directory is available.
    #[error("no configuration directory available on this platform")]
    ConfigDirUnavailable,

    /// Attempted to use a connection that does not exist.
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_not_found_display() {
        let err = CoreError::ConnectionNotFound("work".into());
        assert_eq!(err.to_string(), "connection not found: work");
    }

    #[test]
    fn test_config_dir_display() {
        let err = CoreError::ConfigDirUnavailable;
        assert_eq!(
            err.to_string(),
            "no configuration directory available on this platform"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: CoreError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CoreError::Io(_)));
        assert_eq!(err.to_string(), "io error: gone");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoreError>();
    }
}
