//! Cosmetic "+added -deleted" summaries for status entries.
//!
//! A preview is computed against the HEAD version of a path. It is never
//! authoritative: anything that goes wrong degrades to
//! [`DiffPreview::Unavailable`].

use crate::diff;
use crate::error::GitResult;
use crate::status::{Classification, FileState};
use git2::Repository;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Line counts of a working-tree change relative to HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiffPreview {
    Lines { added: usize, deleted: usize },
    Unavailable,
}

impl DiffPreview {
    pub fn added(&self) -> Option<usize> {
        match self {
            DiffPreview::Lines { added, .. } => Some(*added),
            DiffPreview::Unavailable => None,
        }
    }

    pub fn deleted(&self) -> Option<usize> {
        match self {
            DiffPreview::Lines { deleted, .. } => Some(*deleted),
            DiffPreview::Unavailable => None,
        }
    }
}

impl fmt::Display for DiffPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffPreview::Lines { added, deleted } => write!(f, "+{added} -{deleted}"),
            DiffPreview::Unavailable => f.write_str("no preview"),
        }
    }
}

/// Number of lines in a buffer; a missing final newline still ends a line.
pub fn count_lines(content: &[u8]) -> usize {
    let newlines = content.iter().filter(|b| **b == b'\n').count();
    match content.last() {
        Some(b'\n') | None => newlines,
        Some(_) => newlines + 1,
    }
}

/// Line-count difference between two buffers.
pub fn naive_delta(old: &[u8], new: &[u8]) -> DiffPreview {
    let (old, new) = (count_lines(old), count_lines(new));
    DiffPreview::Lines {
        added: new.saturating_sub(old),
        deleted: old.saturating_sub(new),
    }
}

/// Line-level summary of two buffers, falling back to [`naive_delta`].
pub fn between(path: &str, old: &[u8], new: &[u8]) -> DiffPreview {
    match diff::buffer_patch(old, new, Path::new(path)).and_then(|p| Ok(p.line_stats()?)) {
        Ok((_, added, deleted)) => DiffPreview::Lines { added, deleted },
        Err(err) => {
            tracing::debug!(path, error = %err, "line diff failed, using line counts");
            naive_delta(old, new)
        }
    }
}

/// Preview one path. Never fails.
pub(crate) fn compute(
    repo: &Repository,
    workdir: &Path,
    path: &str,
    head_path: &str,
    class: &Classification,
) -> DiffPreview {
    try_compute(repo, workdir, path, head_path, class).unwrap_or_else(|err| {
        tracing::debug!(path, error = %err, "no preview");
        DiffPreview::Unavailable
    })
}

fn try_compute(
    repo: &Repository,
    workdir: &Path,
    path: &str,
    head_path: &str,
    class: &Classification,
) -> GitResult<DiffPreview> {
    let full = workdir.join(path);

    if class.is_untracked() || class.index == FileState::Added {
        let working = fs::read(&full)?;
        return Ok(DiffPreview::Lines {
            added: count_lines(&working),
            deleted: 0,
        });
    }

    let head = head_blob(repo, head_path)?;
    let deleted = class.workdir == FileState::Deleted || class.index == FileState::Deleted;

    match head {
        Some(head) if deleted => Ok(DiffPreview::Lines {
            added: 0,
            deleted: count_lines(&head),
        }),
        Some(head) => {
            let working = fs::read(&full)?;
            Ok(between(path, &head, &working))
        }
        None => Ok(DiffPreview::Unavailable),
    }
}

/// Content of `path` in the HEAD commit, or `None` when HEAD is unborn
/// or does not contain the path.
pub(crate) fn head_blob(repo: &Repository, path: &str) -> GitResult<Option<Vec<u8>>> {
    let tree = match repo.head().and_then(|head| head.peel_to_tree()) {
        Ok(tree) => tree,
        Err(err) if is_missing(&err) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let entry = match tree.get_path(Path::new(path)) {
        Ok(entry) => entry,
        Err(err) if is_missing(&err) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let blob = entry.to_object(repo)?.peel_to_blob()?;
    Ok(Some(blob.content().to_vec()))
}

fn is_missing(err: &git2::Error) -> bool {
    matches!(
        err.code(),
        git2::ErrorCode::NotFound | git2::ErrorCode::UnbornBranch
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_file, init_repo, write};
    use git2::Status;

    #[test]
    fn display_forms() {
        assert_eq!(
            DiffPreview::Lines {
                added: 3,
                deleted: 1
            }
            .to_string(),
            "+3 -1"
        );
        assert_eq!(DiffPreview::Unavailable.to_string(), "no preview");
        assert_eq!(DiffPreview::Unavailable.added(), None);
        let lines = DiffPreview::Lines {
            added: 2,
            deleted: 5,
        };
        assert_eq!((lines.added(), lines.deleted()), (Some(2), Some(5)));
    }

    #[test]
    fn line_counting() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"a"), 1);
        assert_eq!(count_lines(b"a\n"), 1);
        assert_eq!(count_lines(b"a\nb"), 2);
        assert_eq!(count_lines(b"\n\n"), 2);
    }

    #[test]
    fn naive_delta_is_one_sided() {
        assert_eq!(
            naive_delta(b"a\nb\n", b"a\nb\nc\nd\n"),
            DiffPreview::Lines {
                added: 2,
                deleted: 0
            }
        );
        assert_eq!(
            naive_delta(b"a\nb\nc\n", b"x\n"),
            DiffPreview::Lines {
                added: 0,
                deleted: 2
            }
        );
    }

    #[test]
    fn between_counts_replaced_lines() {
        assert_eq!(
            between("f.txt", b"one\ntwo\n", b"one\nTWO\nthree\n"),
            DiffPreview::Lines {
                added: 2,
                deleted: 1
            }
        );
    }

    #[test]
    fn modified_file_against_head() {
        let (temp, repo) = init_repo();
        commit_file(&repo, "a.txt", "1\n2\n3\n", "initial");
        write(temp.path(), "a.txt", "1\n3\n4\n5\n");

        let class = Classification::of(Status::WT_MODIFIED);
        assert_eq!(
            compute(&repo, temp.path(), "a.txt", "a.txt", &class),
            DiffPreview::Lines {
                added: 2,
                deleted: 1
            }
        );
    }

    #[test]
    fn new_and_deleted_files() {
        let (temp, repo) = init_repo();
        commit_file(&repo, "old.txt", "x\ny\n", "initial");
        write(temp.path(), "new.txt", "a\nb\nc");
        fs::remove_file(temp.path().join("old.txt")).unwrap();

        let new = Classification::of(Status::WT_NEW);
        assert_eq!(
            compute(&repo, temp.path(), "new.txt", "new.txt", &new),
            DiffPreview::Lines {
                added: 3,
                deleted: 0
            }
        );

        let gone = Classification::of(Status::WT_DELETED);
        assert_eq!(
            compute(&repo, temp.path(), "old.txt", "old.txt", &gone),
            DiffPreview::Lines {
                added: 0,
                deleted: 2
            }
        );
    }

    #[test]
    fn failures_are_silent() {
        let (temp, repo) = init_repo();
        let class = Classification::of(Status::WT_NEW);
        assert_eq!(
            compute(&repo, temp.path(), "missing.txt", "missing.txt", &class),
            DiffPreview::Unavailable
        );
    }

    #[test]
    fn head_blob_on_unborn_head() {
        let (_temp, repo) = init_repo();
        assert_eq!(head_blob(&repo, "a.txt").unwrap(), None);
    }
}
