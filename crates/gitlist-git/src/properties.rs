//! Connection settings for a git data context.
//!
//! Two free-form strings stored in the connection's driver data: the
//! repository path and an optional external diff tool.

use gitlist_core::ConnectionInfo;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const REPOSITORY_PATH: &str = "RepositoryPath";
pub const EXTERNAL_DIFF_TOOL_PATH: &str = "ExternalDiffToolPath";

/// Where a diff tool is looked for when none has been saved.
#[cfg(windows)]
pub const DEFAULT_DIFF_TOOLS: &[&str] = &[
    r"C:\Program Files\Beyond Compare 4\BComp.exe",
    r"C:\Program Files\Beyond Compare 5\BComp.exe",
];
#[cfg(target_os = "macos")]
pub const DEFAULT_DIFF_TOOLS: &[&str] = &[
    "/Applications/Beyond Compare.app/Contents/MacOS/bcomp",
    "/usr/local/bin/bcomp",
];
#[cfg(not(any(windows, target_os = "macos")))]
pub const DEFAULT_DIFF_TOOLS: &[&str] = &["/usr/bin/bcompare", "/usr/local/bin/bcompare"];

/// Rejected connection settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please specify a git repository path.")]
    MissingPath,

    #[error("The specified path does not exist.")]
    PathNotFound(PathBuf),

    #[error("The specified path is not a git repository (no .git folder found).")]
    NotARepository(PathBuf),
}

/// Editable view of one connection's settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionProperties {
    pub repository_path: String,
    pub external_diff_tool_path: String,
}

impl ConnectionProperties {
    /// Read settings, filling an unsaved diff tool from [`DEFAULT_DIFF_TOOLS`].
    pub fn from_info(info: &ConnectionInfo) -> Self {
        Self::from_info_with_defaults(info, DEFAULT_DIFF_TOOLS)
    }

    /// Like [`from_info`](Self::from_info) with an explicit candidate list.
    ///
    /// A saved diff tool wins even when it is empty, so a user can clear
    /// the setting without a default reappearing.
    pub fn from_info_with_defaults(info: &ConnectionInfo, candidates: &[&str]) -> Self {
        let external_diff_tool_path = match info.get(EXTERNAL_DIFF_TOOL_PATH) {
            Some(saved) => saved.to_string(),
            None => candidates
                .iter()
                .find(|candidate| Path::new(candidate).is_file())
                .map(|candidate| candidate.to_string())
                .unwrap_or_default(),
        };

        ConnectionProperties {
            repository_path: info.get(REPOSITORY_PATH).unwrap_or_default().to_string(),
            external_diff_tool_path,
        }
    }

    /// Write both settings back.
    pub fn apply_to(&self, info: &mut ConnectionInfo) {
        info.set(REPOSITORY_PATH, self.repository_path.clone());
        info.set(EXTERNAL_DIFF_TOOL_PATH, self.external_diff_tool_path.clone());
    }

    /// The configured diff tool, if one is set.
    pub fn diff_tool(&self) -> Option<&Path> {
        let tool = self.external_diff_tool_path.trim();
        (!tool.is_empty()).then(|| Path::new(tool))
    }

    /// Check the repository path before accepting the settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let path = self.repository_path.trim();
        if path.is_empty() {
            return Err(ValidationError::MissingPath);
        }

        let path = Path::new(path);
        if !path.is_dir() {
            return Err(ValidationError::PathNotFound(path.to_path_buf()));
        }

        // Worktrees and submodules use a .git file instead of a directory.
        if !path.join(".git").exists() {
            return Err(ValidationError::NotARepository(path.to_path_buf()));
        }

        Ok(())
    }

    /// "Git: <folder>" or "Git Repository" when no path is set.
    pub fn description(&self) -> String {
        let path = self.repository_path.trim();
        if path.is_empty() {
            return "Git Repository".to_string();
        }

        let name = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        format!("Git: {name}")
    }
}
