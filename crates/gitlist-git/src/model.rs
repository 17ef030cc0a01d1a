//! Display-ready projections of repository records.
//!
//! Every value here is an owned snapshot taken while the query ran. A
//! fresh query re-reads the repository; nothing is cached.

use crate::preview::DiffPreview;
use crate::status::{Classification, FileState};
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

/// Length of the abbreviated commit hash.
pub const SHORT_SHA_LEN: usize = 7;

/// Abbreviate a full hash.
pub fn short_sha(sha: &str) -> String {
    sha.chars().take(SHORT_SHA_LEN).collect()
}

/// Who did something, and when (in their own time zone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub when: DateTime<FixedOffset>,
}

impl Identity {
    pub(crate) fn from_signature(sig: &git2::Signature<'_>) -> Self {
        Identity {
            name: sig.name().unwrap_or("Unknown").to_string(),
            email: sig.email().unwrap_or("").to_string(),
            when: to_datetime(sig.when()),
        }
    }
}

pub(crate) fn to_datetime(time: git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    offset
        .timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(|| Utc::now().with_timezone(&offset))
}

/// A commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub sha: String,
    pub short_sha: String,
    pub message: String,
    pub message_short: String,
    pub author: Identity,
    pub committer: Identity,
    /// Parent hashes in order; empty for a root commit.
    pub parent_shas: Vec<String>,
    pub tree_sha: String,
}

impl Commit {
    pub(crate) fn from_git(commit: &git2::Commit<'_>) -> Self {
        let sha = commit.id().to_string();
        let message = commit.message().unwrap_or("").to_string();
        let message_short = message.lines().next().unwrap_or("").trim_end().to_string();
        Commit {
            short_sha: short_sha(&sha),
            sha,
            message,
            message_short,
            author: Identity::from_signature(&commit.author()),
            committer: Identity::from_signature(&commit.committer()),
            parent_shas: commit.parent_ids().map(|id| id.to_string()).collect(),
            tree_sha: commit.tree_id().to_string(),
        }
    }

    pub fn parent_count(&self) -> usize {
        self.parent_shas.len()
    }

    pub fn is_merge(&self) -> bool {
        self.parent_shas.len() > 1
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.short_sha, self.message_short)
    }
}

/// Kind of object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetKind {
    Blob,
    Tree,
    /// A gitlink: a commit in a submodule
    Submodule,
    Other,
}

impl From<Option<git2::ObjectType>> for TargetKind {
    fn from(kind: Option<git2::ObjectType>) -> Self {
        match kind {
            Some(git2::ObjectType::Blob) => TargetKind::Blob,
            Some(git2::ObjectType::Tree) => TargetKind::Tree,
            Some(git2::ObjectType::Commit) => TargetKind::Submodule,
            _ => TargetKind::Other,
        }
    }
}

/// One entry of a commit's tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    /// Path from the tree root
    pub path: String,
    pub name: String,
    pub sha: String,
    pub target_kind: TargetKind,
    pub mode: i32,
}

impl TreeEntry {
    pub(crate) fn from_git(parent: &str, entry: &git2::TreeEntry<'_>) -> Self {
        let name = String::from_utf8_lossy(entry.name_bytes()).into_owned();
        TreeEntry {
            path: format!("{parent}{name}"),
            name,
            sha: entry.id().to_string(),
            target_kind: entry.kind().into(),
            mode: entry.filemode(),
        }
    }
}

impl fmt::Display for TreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A local or remote-tracking branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub name: String,
    pub canonical_name: String,
    pub is_remote: bool,
    pub is_current_repository_head: bool,
    pub is_tracking: bool,
    pub remote_name: Option<String>,
    pub upstream_canonical_name: Option<String>,
    pub tip: Option<Commit>,
    /// Commits on this branch missing from its upstream.
    pub ahead_by: Option<usize>,
    /// Commits on the upstream missing from this branch.
    pub behind_by: Option<usize>,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.is_current_repository_head {
            f.write_str(" (HEAD)")?;
        }
        Ok(())
    }
}

/// A lightweight or annotated tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub canonical_name: String,
    pub is_annotated: bool,
    /// The tagged commit, if the tag points at one.
    pub target: Option<Commit>,
    pub message: Option<String>,
    pub tagger: Option<String>,
    pub tagger_email: Option<String>,
    pub tagger_date: Option<DateTime<FixedOffset>>,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    pub name: String,
    pub url: String,
    /// Falls back to `url` when no push URL is set.
    pub push_url: String,
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

/// A stash entry. Index 0 is the most recent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stash {
    pub index: usize,
    pub reference: String,
    pub message: String,
    pub work_tree: Commit,
    pub when: DateTime<FixedOffset>,
}

impl Stash {
    pub fn reference_for(index: usize) -> String {
        format!("stash@{{{index}}}")
    }
}

impl fmt::Display for Stash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reference, self.message)
    }
}

/// A path with a non-current status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusEntry {
    pub file_path: String,
    /// Path in HEAD when the index renamed the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_from: Option<String>,
    pub status: String,
    pub index_status: FileState,
    pub work_dir_status: FileState,
    pub is_staged: bool,
    pub has_unstaged_changes: bool,
    pub is_untracked: bool,
    pub is_ignored: bool,
    pub is_conflicted: bool,
    /// Line counts against HEAD; `None` for ignored paths.
    pub preview: Option<DiffPreview>,
    #[serde(skip)]
    pub(crate) raw: git2::Status,
}

impl StatusEntry {
    pub(crate) fn new(path: String, raw: git2::Status) -> Self {
        let class = Classification::of(raw);
        StatusEntry {
            file_path: path,
            renamed_from: None,
            status: class.combined_label(),
            index_status: class.index,
            work_dir_status: class.workdir,
            is_staged: class.is_staged(),
            has_unstaged_changes: class.has_unstaged_changes(),
            is_untracked: class.is_untracked(),
            is_ignored: class.ignored,
            is_conflicted: class.conflicted,
            preview: None,
            raw,
        }
    }

    /// Path of this file in the HEAD tree.
    pub fn head_path(&self) -> &str {
        self.renamed_from.as_deref().unwrap_or(&self.file_path)
    }

    /// Any staged, unstaged or untracked change.
    pub fn has_changes(&self) -> bool {
        self.is_staged || self.has_unstaged_changes || self.is_untracked
    }

    /// Removed from the working tree or from the index.
    pub fn is_deleted(&self) -> bool {
        self.work_dir_status == FileState::Deleted || self.index_status == FileState::Deleted
    }
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.file_path, self.status)
    }
}
