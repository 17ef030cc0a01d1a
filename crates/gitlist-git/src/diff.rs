//! Line-level diffs between two in-memory buffers.

use crate::error::GitResult;
use gitlist_core::{DiffHunk, DiffLine, DiffView};
use std::path::Path;

/// Diff `old` against `new` with three lines of context.
pub fn buffer_patch<'a>(
    old: &'a [u8],
    new: &'a [u8],
    path: &Path,
) -> GitResult<git2::Patch<'a>> {
    let mut opts = git2::DiffOptions::new();
    opts.context_lines(3);
    let patch = git2::Patch::from_buffers(old, Some(path), new, Some(path), Some(&mut opts))?;
    Ok(patch)
}

/// Collect the hunks of a patch.
pub fn hunks(patch: &git2::Patch<'_>) -> GitResult<Vec<DiffHunk>> {
    let mut result = Vec::with_capacity(patch.num_hunks());

    for hunk_idx in 0..patch.num_hunks() {
        let (hunk, line_count) = patch.hunk(hunk_idx)?;
        let mut lines = Vec::with_capacity(line_count);

        for line_idx in 0..line_count {
            let line = patch.line_in_hunk(hunk_idx, line_idx)?;
            let origin = line.origin();
            if origin == '+' || origin == '-' || origin == ' ' {
                lines.push(DiffLine {
                    origin,
                    content: String::from_utf8_lossy(line.content()).into_owned(),
                    old_lineno: line.old_lineno(),
                    new_lineno: line.new_lineno(),
                });
            }
        }

        result.push(DiffHunk {
            header: format!(
                "@@ -{},{} +{},{} @@",
                hunk.old_start(),
                hunk.old_lines(),
                hunk.new_start(),
                hunk.new_lines()
            ),
            lines,
        });
    }

    Ok(result)
}

/// Inline HEAD-versus-working view of one file.
pub fn head_vs_working(path: &str, head: &[u8], working: &[u8]) -> GitResult<DiffView> {
    let patch = buffer_patch(head, working, Path::new(path))?;
    Ok(DiffView {
        title: format!("Diff: {path} (HEAD vs Working)"),
        left_title: format!("HEAD: {path}"),
        right_title: format!("Working: {path}"),
        hunks: hunks(&patch)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_change() {
        let view = head_vs_working("a.txt", b"one\ntwo\nthree\n", b"one\n2\nthree\n").unwrap();
        assert_eq!(view.title, "Diff: a.txt (HEAD vs Working)");
        assert_eq!(view.hunks.len(), 1);
        assert_eq!(view.hunks[0].header, "@@ -1,3 +1,3 @@");
        assert_eq!(view.line_counts(), (1, 1));

        let removed = view.hunks[0]
            .lines
            .iter()
            .find(|l| l.origin == '-')
            .unwrap();
        assert_eq!(removed.content, "two\n");
        assert_eq!(removed.old_lineno, Some(2));
        assert_eq!(removed.new_lineno, None);
    }

    #[test]
    fn identical_buffers_have_no_hunks() {
        let view = head_vs_working("a.txt", b"same\n", b"same\n").unwrap();
        assert!(view.hunks.is_empty());
    }

    #[test]
    fn distant_changes_split_hunks() {
        let old: String = (1..=30).map(|n| format!("{n}\n")).collect();
        let new: String = (1..=30)
            .map(|n| match n {
                2 => "two\n".to_string(),
                29 => "twenty-nine\n".to_string(),
                n => format!("{n}\n"),
            })
            .collect();
        let patch = buffer_patch(old.as_bytes(), new.as_bytes(), Path::new("n.txt")).unwrap();
        assert_eq!(hunks(&patch).unwrap().len(), 2);
    }
}
