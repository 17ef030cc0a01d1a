//! Working-tree status classification.
//!
//! libgit2 reports one bitmask per path covering both the index and the
//! working tree. Each dimension is classified independently through an
//! ordered decision table where the first matching flag wins.

use git2::Status;
use serde::Serialize;
use std::fmt;

/// Classified state of one dimension (index or working tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileState {
    Added,
    Modified,
    Deleted,
    Renamed,
    TypeChange,
    Unmodified,
    Untracked,
}

impl FileState {
    pub fn label(&self) -> &'static str {
        match self {
            FileState::Added => "Added",
            FileState::Modified => "Modified",
            FileState::Deleted => "Deleted",
            FileState::Renamed => "Renamed",
            FileState::TypeChange => "TypeChange",
            FileState::Unmodified => "Unmodified",
            FileState::Untracked => "Untracked",
        }
    }

    /// Get a single character indicator for the state
    pub fn indicator(&self) -> char {
        match self {
            FileState::Added => 'A',
            FileState::Modified => 'M',
            FileState::Deleted => 'D',
            FileState::Renamed => 'R',
            FileState::TypeChange => 'T',
            FileState::Unmodified => ' ',
            FileState::Untracked => '?',
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const INDEX_TABLE: [(Status, FileState); 5] = [
    (Status::INDEX_NEW, FileState::Added),
    (Status::INDEX_MODIFIED, FileState::Modified),
    (Status::INDEX_DELETED, FileState::Deleted),
    (Status::INDEX_RENAMED, FileState::Renamed),
    (Status::INDEX_TYPECHANGE, FileState::TypeChange),
];

const WORKDIR_TABLE: [(Status, FileState); 5] = [
    (Status::WT_NEW, FileState::Untracked),
    (Status::WT_MODIFIED, FileState::Modified),
    (Status::WT_DELETED, FileState::Deleted),
    (Status::WT_RENAMED, FileState::Renamed),
    (Status::WT_TYPECHANGE, FileState::TypeChange),
];

fn first_match(table: &[(Status, FileState)], status: Status) -> FileState {
    table
        .iter()
        .find(|(flag, _)| status.contains(*flag))
        .map(|(_, state)| *state)
        .unwrap_or(FileState::Unmodified)
}

/// Index-side state of a status bitmask.
pub fn classify_index(status: Status) -> FileState {
    first_match(&INDEX_TABLE, status)
}

/// Working-tree-side state of a status bitmask.
pub fn classify_workdir(status: Status) -> FileState {
    first_match(&WORKDIR_TABLE, status)
}

/// Both dimensions of a status bitmask plus the ignored/conflicted flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub index: FileState,
    pub workdir: FileState,
    pub ignored: bool,
    pub conflicted: bool,
}

impl Classification {
    pub fn of(status: Status) -> Self {
        Classification {
            index: classify_index(status),
            workdir: classify_workdir(status),
            ignored: status.contains(Status::IGNORED),
            conflicted: status.contains(Status::CONFLICTED),
        }
    }

    /// "Index: X, WorkDir: Y", omitting unmodified sides.
    pub fn combined_label(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if self.index != FileState::Unmodified {
            parts.push(format!("Index: {}", self.index));
        }
        if self.workdir != FileState::Unmodified {
            parts.push(format!("WorkDir: {}", self.workdir));
        }
        if parts.is_empty() {
            FileState::Unmodified.label().to_string()
        } else {
            parts.join(", ")
        }
    }

    pub fn is_staged(&self) -> bool {
        self.index != FileState::Unmodified
    }

    /// Untracked files do not count as unstaged changes.
    pub fn has_unstaged_changes(&self) -> bool {
        !matches!(self.workdir, FileState::Unmodified | FileState::Untracked)
    }

    pub fn is_untracked(&self) -> bool {
        self.workdir == FileState::Untracked
    }
}

/// The standard status groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Bucket {
    /// Changes recorded in the index
    Staged,
    /// Tracked files changed in the working tree
    Unstaged,
    /// Files new to the working tree
    Untracked,
    /// Files matched by ignore rules
    Ignored,
    /// Files with merge conflicts
    Conflicted,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Staged,
        Bucket::Unstaged,
        Bucket::Untracked,
        Bucket::Ignored,
        Bucket::Conflicted,
    ];

    pub fn contains(&self, status: Status) -> bool {
        match self {
            Bucket::Staged => status.intersects(
                Status::INDEX_NEW
                    | Status::INDEX_MODIFIED
                    | Status::INDEX_DELETED
                    | Status::INDEX_RENAMED
                    | Status::INDEX_TYPECHANGE,
            ),
            Bucket::Unstaged => {
                status.intersects(
                    Status::WT_MODIFIED
                        | Status::WT_DELETED
                        | Status::WT_RENAMED
                        | Status::WT_TYPECHANGE,
                ) && !status.contains(Status::WT_NEW)
            }
            Bucket::Untracked => status.contains(Status::WT_NEW),
            Bucket::Ignored => status.contains(Status::IGNORED),
            Bucket::Conflicted => status.contains(Status::CONFLICTED),
        }
    }

    /// Get the display title for this bucket
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Staged => "Staged",
            Bucket::Unstaged => "Unstaged",
            Bucket::Untracked => "Untracked",
            Bucket::Ignored => "Ignored",
            Bucket::Conflicted => "Conflicted",
        }
    }
}
