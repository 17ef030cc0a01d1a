//! Repository handle and the read side of the data context.
//!
//! A [`Session`] owns one open repository. Every read goes back to the
//! repository and returns owned projections, so two reads never share
//! state and a query always sees the current on-disk truth.

use crate::error::{GitError, GitResult};
use crate::model::{Branch, Commit, Remote, Stash, StatusEntry, Tag, TreeEntry};
use crate::preview::{self, DiffPreview};
use crate::status::{Bucket, Classification};
use git2::{
    BranchType, ErrorCode, Oid, Repository, Sort, StatusOptions, TreeWalkMode, TreeWalkResult,
};
use std::path::{Path, PathBuf};

const STASH_REF: &str = "refs/stash";

/// An open repository plus the settings commands need.
pub struct Session {
    pub(crate) repo: Repository,
    path: PathBuf,
    workdir: Option<PathBuf>,
    pub(crate) diff_tool: Option<PathBuf>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path)
            .field("diff_tool", &self.diff_tool)
            .finish()
    }
}

impl Session {
    /// Open the repository at `path` (no upward discovery).
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|source| GitError::RepositoryNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let workdir = repo.workdir().map(Path::to_path_buf);
        tracing::debug!(path = %path.display(), bare = workdir.is_none(), "opened repository");

        Ok(Session {
            repo,
            path: path.to_path_buf(),
            workdir,
            diff_tool: None,
        })
    }

    /// The path the session was opened with.
    pub fn repository_path(&self) -> &Path {
        &self.path
    }

    pub fn workdir(&self) -> GitResult<&Path> {
        self.workdir.as_deref().ok_or(GitError::BareRepository)
    }

    pub fn diff_tool(&self) -> Option<&Path> {
        self.diff_tool.as_deref()
    }

    pub fn set_diff_tool(&mut self, tool: Option<PathBuf>) {
        self.diff_tool = tool;
    }

    /// Every commit reachable from any reference, newest first.
    pub fn commits(&self) -> GitResult<Vec<Commit>> {
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TIME)?;

        for reference in self.repo.references()? {
            let reference = reference?;
            if let Ok(commit) = reference.peel_to_commit() {
                walk.push(commit.id())?;
            }
        }

        self.collect_walk(walk)
    }

    /// Every commit reachable from a branch tip.
    pub fn branch_commits(&self, branch: &Branch) -> GitResult<Vec<Commit>> {
        let Some(tip) = &branch.tip else {
            return Ok(Vec::new());
        };

        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TIME)?;
        walk.push(Oid::from_str(&tip.sha)?)?;
        self.collect_walk(walk)
    }

    fn collect_walk(&self, walk: git2::Revwalk<'_>) -> GitResult<Vec<Commit>> {
        walk.map(|oid| -> GitResult<Commit> {
            let commit = self.repo.find_commit(oid?)?;
            Ok(Commit::from_git(&commit))
        })
        .collect()
    }

    pub fn parents(&self, commit: &Commit) -> GitResult<Vec<Commit>> {
        commit
            .parent_shas
            .iter()
            .map(|sha| -> GitResult<Commit> {
                let parent = self.repo.find_commit(Oid::from_str(sha)?)?;
                Ok(Commit::from_git(&parent))
            })
            .collect()
    }

    /// Top-level entries of a commit's tree.
    pub fn tree_entries(&self, commit: &Commit) -> GitResult<Vec<TreeEntry>> {
        let tree = self.repo.find_commit(Oid::from_str(&commit.sha)?)?.tree()?;
        Ok(tree.iter().map(|entry| TreeEntry::from_git("", &entry)).collect())
    }

    /// Every entry of a commit's tree, parents before children.
    pub fn tree_entries_recursive(&self, commit: &Commit) -> GitResult<Vec<TreeEntry>> {
        let tree = self.repo.find_commit(Oid::from_str(&commit.sha)?)?.tree()?;
        let mut entries = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            entries.push(TreeEntry::from_git(root, entry));
            TreeWalkResult::Ok
        })?;
        Ok(entries)
    }

    pub fn branches(&self) -> GitResult<Vec<Branch>> {
        self.branches_of(None)
    }

    pub fn local_branches(&self) -> GitResult<Vec<Branch>> {
        self.branches_of(Some(BranchType::Local))
    }

    pub fn remote_branches(&self) -> GitResult<Vec<Branch>> {
        self.branches_of(Some(BranchType::Remote))
    }

    fn branches_of(&self, filter: Option<BranchType>) -> GitResult<Vec<Branch>> {
        let mut branches = Vec::new();
        for item in self.repo.branches(filter)? {
            let (branch, kind) = item?;
            branches.push(self.project_branch(&branch, kind)?);
        }
        Ok(branches)
    }

    fn project_branch(&self, branch: &git2::Branch<'_>, kind: BranchType) -> GitResult<Branch> {
        let name = String::from_utf8_lossy(branch.name_bytes()?).into_owned();
        let canonical_name = String::from_utf8_lossy(branch.get().name_bytes()).into_owned();
        let is_remote = kind == BranchType::Remote;
        let tip = branch.get().peel_to_commit().ok();

        let upstream = if is_remote { None } else { branch.upstream().ok() };
        let upstream_canonical_name = upstream
            .as_ref()
            .map(|up| String::from_utf8_lossy(up.get().name_bytes()).into_owned());

        let remote_buf = if is_remote {
            self.repo.branch_remote_name(&canonical_name).ok()
        } else if upstream.is_some() {
            self.repo.branch_upstream_remote(&canonical_name).ok()
        } else {
            None
        };
        let remote_name = remote_buf.and_then(|buf| buf.as_str().map(str::to_string));

        let upstream_tip = upstream.as_ref().and_then(|up| up.get().target());
        let (ahead_by, behind_by) = match (&tip, upstream_tip) {
            (Some(tip), Some(upstream)) => {
                let (ahead, behind) = self.repo.graph_ahead_behind(tip.id(), upstream)?;
                (Some(ahead), Some(behind))
            }
            _ => (None, None),
        };

        Ok(Branch {
            name,
            canonical_name,
            is_remote,
            is_current_repository_head: branch.is_head(),
            is_tracking: upstream.is_some(),
            remote_name,
            upstream_canonical_name,
            tip: tip.as_ref().map(Commit::from_git),
            ahead_by,
            behind_by,
        })
    }

    /// The checked-out branch. Detached HEAD yields `(no branch)`; an
    /// unborn HEAD yields `None`.
    pub fn head(&self) -> GitResult<Option<Branch>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(err) if matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None)
            }
            Err(err) => return Err(err.into()),
        };

        if head.is_branch() {
            let branch = git2::Branch::wrap(head);
            return self.project_branch(&branch, BranchType::Local).map(Some);
        }

        let tip = head.peel_to_commit().ok();
        Ok(Some(Branch {
            name: "(no branch)".to_string(),
            canonical_name: "HEAD".to_string(),
            is_remote: false,
            is_current_repository_head: true,
            is_tracking: false,
            remote_name: None,
            upstream_canonical_name: None,
            tip: tip.as_ref().map(Commit::from_git),
            ahead_by: None,
            behind_by: None,
        }))
    }

    pub fn tags(&self) -> GitResult<Vec<Tag>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::with_capacity(names.len());

        for name in names.iter().flatten() {
            let canonical_name = format!("refs/tags/{name}");
            let reference = self.repo.find_reference(&canonical_name)?;
            let annotation = reference
                .target()
                .and_then(|oid| self.repo.find_tag(oid).ok());
            let target = reference.peel_to_commit().ok();
            let tagger = annotation.as_ref().and_then(|tag| tag.tagger());

            tags.push(Tag {
                name: name.to_string(),
                canonical_name,
                is_annotated: annotation.is_some(),
                target: target.as_ref().map(Commit::from_git),
                message: annotation
                    .as_ref()
                    .map(|tag| tag.message().unwrap_or("").to_string()),
                tagger: tagger
                    .as_ref()
                    .map(|sig| sig.name().unwrap_or("Unknown").to_string()),
                tagger_email: tagger
                    .as_ref()
                    .map(|sig| sig.email().unwrap_or("").to_string()),
                tagger_date: tagger.as_ref().map(|sig| crate::model::to_datetime(sig.when())),
            });
        }

        Ok(tags)
    }

    pub fn remotes(&self) -> GitResult<Vec<Remote>> {
        let names = self.repo.remotes()?;
        let mut remotes = Vec::with_capacity(names.len());

        for name in names.iter().flatten() {
            let remote = self.repo.find_remote(name)?;
            let url = remote.url().unwrap_or("").to_string();
            remotes.push(Remote {
                name: name.to_string(),
                push_url: remote.pushurl().map(str::to_string).unwrap_or_else(|| url.clone()),
                url,
            });
        }

        Ok(remotes)
    }

    /// Stashes from the stash reflog; index 0 is the newest.
    pub fn stashes(&self) -> GitResult<Vec<Stash>> {
        match self.repo.find_reference(STASH_REF) {
            Ok(_) => {}
            Err(err) if err.code() == ErrorCode::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        }

        let reflog = self.repo.reflog(STASH_REF)?;
        let mut stashes = Vec::with_capacity(reflog.len());

        for (index, entry) in reflog.iter().enumerate() {
            let commit = self.repo.find_commit(entry.id_new())?;
            let work_tree = Commit::from_git(&commit);
            let message = entry
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| work_tree.message_short.clone());

            stashes.push(Stash {
                index,
                reference: Stash::reference_for(index),
                message,
                when: work_tree.committer.when,
                work_tree,
            });
        }

        Ok(stashes)
    }

    /// Every changed path except ignored ones.
    pub fn status(&self) -> GitResult<Vec<StatusEntry>> {
        self.statuses(false)
    }

    pub fn staged(&self) -> GitResult<Vec<StatusEntry>> {
        self.bucket(Bucket::Staged)
    }

    pub fn unstaged(&self) -> GitResult<Vec<StatusEntry>> {
        self.bucket(Bucket::Unstaged)
    }

    pub fn untracked(&self) -> GitResult<Vec<StatusEntry>> {
        self.bucket(Bucket::Untracked)
    }

    pub fn ignored(&self) -> GitResult<Vec<StatusEntry>> {
        self.bucket(Bucket::Ignored)
    }

    pub fn conflicted(&self) -> GitResult<Vec<StatusEntry>> {
        self.bucket(Bucket::Conflicted)
    }

    /// Status entries falling into one bucket.
    pub fn bucket(&self, bucket: Bucket) -> GitResult<Vec<StatusEntry>> {
        let entries = self.statuses(bucket == Bucket::Ignored)?;
        Ok(entries
            .into_iter()
            .filter(|entry| bucket.contains(entry.raw))
            .collect())
    }

    pub fn changed_files_count(&self) -> GitResult<usize> {
        Ok(self.status()?.len())
    }

    pub fn is_clean(&self) -> GitResult<bool> {
        Ok(self.changed_files_count()? == 0)
    }

    /// Recompute the preview of one entry.
    pub fn diff_preview(&self, entry: &StatusEntry) -> DiffPreview {
        match self.workdir() {
            Ok(workdir) => preview::compute(
                &self.repo,
                workdir,
                &entry.file_path,
                entry.head_path(),
                &Classification::of(entry.raw),
            ),
            Err(_) => DiffPreview::Unavailable,
        }
    }

    fn statuses(&self, include_ignored: bool) -> GitResult<Vec<StatusEntry>> {
        let workdir = self.workdir()?;

        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(include_ignored)
            .recurse_ignored_dirs(false)
            .renames_head_to_index(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut entries = Vec::with_capacity(statuses.len());

        for item in statuses.iter() {
            let raw = item.status();
            let rename = item.head_to_index().and_then(|delta| {
                let old = delta.old_file().path()?.to_string_lossy().into_owned();
                let new = delta.new_file().path()?.to_string_lossy().into_owned();
                Some((old, new))
            });
            let path = match &rename {
                Some((_, new)) => new.clone(),
                None => String::from_utf8_lossy(item.path_bytes()).into_owned(),
            };

            let mut entry = StatusEntry::new(path, raw);
            entry.renamed_from = rename
                .map(|(old, _)| old)
                .filter(|old| *old != entry.file_path);
            if !entry.is_ignored {
                entry.preview = Some(preview::compute(
                    &self.repo,
                    workdir,
                    &entry.file_path,
                    entry.head_path(),
                    &Classification::of(raw),
                ));
            }
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Look up a status entry by its path.
    pub fn status_entry(&self, path: &str) -> GitResult<StatusEntry> {
        let trimmed = path.trim_end_matches('/');
        self.statuses(true)?
            .into_iter()
            .find(|entry| entry.file_path.trim_end_matches('/') == trimmed)
            .ok_or_else(|| GitError::PathNotInRepo(path.to_string()))
    }

    /// Look up a stash by its index.
    pub fn stash(&self, index: usize) -> GitResult<Stash> {
        self.stashes()?
            .into_iter()
            .nth(index)
            .ok_or(GitError::StashNotFound(index))
    }
}

/// Host-owned context: the open session for one connection.
#[derive(Debug, Default)]
pub struct GitContext {
    session: Option<Session>,
}

impl GitContext {
    /// Point the context at `path`. The repository is only re-opened when
    /// the path changes; the diff tool is updated every time.
    pub fn initialize(&mut self, path: impl AsRef<Path>, diff_tool: Option<PathBuf>) -> GitResult<()> {
        let path = path.as_ref();
        let reopen = self
            .session
            .as_ref()
            .map_or(true, |session| session.repository_path() != path);

        if reopen {
            self.session = None;
            self.session = Some(Session::open(path)?);
        } else {
            tracing::debug!(path = %path.display(), "repository already open");
        }

        if let Some(session) = self.session.as_mut() {
            session.set_diff_tool(diff_tool);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn repository_path(&self) -> Option<&Path> {
        self.session.as_ref().map(Session::repository_path)
    }

    pub fn session(&self) -> GitResult<&Session> {
        self.session.as_ref().ok_or(GitError::NotInitialized)
    }

    pub fn session_mut(&mut self) -> GitResult<&mut Session> {
        self.session.as_mut().ok_or(GitError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::FileState;
    use crate::test_support::*;
    use std::fs;

    fn open(temp: &tempfile::TempDir) -> Session {
        Session::open(temp.path()).expect("open session")
    }

    #[test]
    fn open_missing_path_is_not_found() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = Session::open(temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, GitError::RepositoryNotFound { .. }));
    }

    #[test]
    fn empty_repository_reads() {
        let (temp, _repo) = init_repo();
        let session = open(&temp);

        assert!(session.commits().unwrap().is_empty());
        assert!(session.branches().unwrap().is_empty());
        assert!(session.tags().unwrap().is_empty());
        assert!(session.stashes().unwrap().is_empty());
        assert_eq!(session.head().unwrap(), None);
        assert!(session.is_clean().unwrap());
        assert_eq!(session.changed_files_count().unwrap(), 0);
    }

    #[test]
    fn commit_hashes_and_parents() {
        let (temp, repo) = init_repo();
        commit_file(&repo, "a.txt", "a\n", "first");
        commit_file(&repo, "a.txt", "b\n", "second\n\nbody");
        let session = open(&temp);

        let commits = session.commits().unwrap();
        assert_eq!(commits.len(), 2);
        for commit in &commits {
            assert_eq!(commit.sha.len(), 40);
            assert!(commit.sha.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
            assert_eq!(commit.short_sha.len(), 7);
            assert!(commit.sha.starts_with(&commit.short_sha));
        }

        let root = commits.iter().find(|c| c.message_short == "first").unwrap();
        let child = commits.iter().find(|c| c.message_short == "second").unwrap();
        assert_eq!(root.parent_count(), 0);
        assert_eq!(child.parent_count(), 1);
        assert_eq!(session.parents(child).unwrap(), vec![root.clone()]);
        assert_eq!(child.author.name, "Test");
    }

    #[test]
    fn merge_commit_has_two_parents() {
        let (temp, repo) = init_repo();
        let base = commit_file(&repo, "a.txt", "a\n", "base");
        let main_tip = commit_file(&repo, "a.txt", "main\n", "on main");

        let base_commit = repo.find_commit(base).unwrap();
        repo.branch("side", &base_commit, false).unwrap();
        repo.set_head("refs/heads/side").unwrap();
        repo.checkout_head(Some(git2::build::CheckoutBuilder::new().force()))
            .unwrap();
        let side_tip = commit_file(&repo, "b.txt", "side\n", "on side");

        let sig = signature();
        let tree = repo.find_commit(side_tip).unwrap().tree().unwrap();
        let parents = [
            &repo.find_commit(side_tip).unwrap(),
            &repo.find_commit(main_tip).unwrap(),
        ];
        repo.commit(Some("HEAD"), &sig, &sig, "merge", &tree, &parents)
            .unwrap();

        let session = open(&temp);
        let merge = session
            .commits()
            .unwrap()
            .into_iter()
            .find(|c| c.message_short == "merge")
            .unwrap();
        assert!(merge.is_merge());
        assert_eq!(merge.parent_count(), 2);
    }

    #[test]
    fn single_branch_is_head() {
        let (temp, repo) = init_repo();
        commit_file(&repo, "a.txt", "a\n", "initial");
        let session = open(&temp);

        let branches = session.branches().unwrap();
        assert_eq!(branches.len(), 1);
        assert!(branches[0].is_current_repository_head);
        assert!(!branches[0].is_remote);
        assert!(!branches[0].is_tracking);
        assert_eq!(branches[0].ahead_by, None);
        assert!(branches[0].tip.is_some());
        assert_eq!(session.head().unwrap(), Some(branches[0].clone()));
        assert!(session.remote_branches().unwrap().is_empty());

        let commits = session.branch_commits(&branches[0]).unwrap();
        assert_eq!(commits.len(), 1);
    }

    #[test]
    fn checkout_moves_head_between_queries() {
        let (temp, repo) = init_repo();
        let tip = commit_file(&repo, "a.txt", "a\n", "initial");
        repo.branch("feature", &repo.find_commit(tip).unwrap(), false)
            .unwrap();
        let session = open(&temp);

        let current = |session: &Session| -> Vec<String> {
            session
                .branches()
                .unwrap()
                .into_iter()
                .filter(|b| b.is_current_repository_head)
                .map(|b| b.name)
                .collect()
        };

        let before = current(&session);
        assert_eq!(before.len(), 1);
        assert_ne!(before[0], "feature");
        assert_eq!(session.branches().unwrap().len(), 2);

        repo.set_head("refs/heads/feature").unwrap();

        assert_eq!(current(&session), vec!["feature".to_string()]);
        assert_eq!(session.head().unwrap().map(|b| b.name).as_deref(), Some("feature"));
    }

    #[test]
    fn staged_rename_previews_against_old_path() {
        let (temp, repo) = init_repo();
        commit_file(&repo, "old.txt", "one\ntwo\nthree\n", "initial");
        fs::rename(temp.path().join("old.txt"), temp.path().join("new.txt")).unwrap();
        let mut index = repo.index().unwrap();
        index.remove_path(Path::new("old.txt")).unwrap();
        index.add_path(Path::new("new.txt")).unwrap();
        index.write().unwrap();

        let session = open(&temp);
        let status = session.status().unwrap();
        assert_eq!(status.len(), 1);

        let entry = &status[0];
        assert_eq!(entry.file_path, "new.txt");
        assert_eq!(entry.index_status, FileState::Renamed);
        assert_eq!(entry.renamed_from.as_deref(), Some("old.txt"));
        assert_eq!(entry.head_path(), "old.txt");
        assert_eq!(
            entry.preview,
            Some(DiffPreview::Lines {
                added: 0,
                deleted: 0
            })
        );
        assert_eq!(session.diff_preview(entry), entry.preview.unwrap());
    }

    #[test]
    fn detached_head() {
        let (temp, repo) = init_repo();
        let first = commit_file(&repo, "a.txt", "a\n", "initial");
        repo.set_head_detached(first).unwrap();
        let session = open(&temp);

        let head = session.head().unwrap().unwrap();
        assert_eq!(head.name, "(no branch)");
        assert_eq!(head.canonical_name, "HEAD");
        assert_eq!(head.tip.map(|c| c.sha), Some(first.to_string()));
    }

    #[test]
    fn tracking_branch_ahead_behind() {
        let (temp, repo) = init_repo();
        let first = commit_file(&repo, "a.txt", "1\n", "one");
        repo.remote("origin", "https://example.com/repo.git").unwrap();
        repo.reference("refs/remotes/origin/main", first, true, "fake fetch")
            .unwrap();

        let mut local = repo
            .find_branch(
                repo.head().unwrap().shorthand().unwrap(),
                BranchType::Local,
            )
            .unwrap();
        local.set_upstream(Some("origin/main")).unwrap();
        commit_file(&repo, "a.txt", "2\n", "two");
        commit_file(&repo, "a.txt", "3\n", "three");

        let session = open(&temp);
        let local = session.local_branches().unwrap().remove(0);
        assert!(local.is_tracking);
        assert_eq!(local.ahead_by, Some(2));
        assert_eq!(local.behind_by, Some(0));
        assert_eq!(local.remote_name.as_deref(), Some("origin"));
        assert_eq!(
            local.upstream_canonical_name.as_deref(),
            Some("refs/remotes/origin/main")
        );

        let remote = session.remote_branches().unwrap().remove(0);
        assert!(remote.is_remote);
        assert_eq!(remote.name, "origin/main");
        assert_eq!(remote.remote_name.as_deref(), Some("origin"));
    }

    #[test]
    fn lightweight_and_annotated_tags() {
        let (temp, repo) = init_repo();
        let oid = commit_file(&repo, "a.txt", "a\n", "initial");
        lightweight_tag(&repo, "light", oid);
        annotated_tag(&repo, "v1.0", oid, "Release 1.0");
        let session = open(&temp);

        let tags = session.tags().unwrap();
        assert_eq!(tags.len(), 2);

        let light = tags.iter().find(|t| t.name == "light").unwrap();
        assert!(!light.is_annotated);
        assert_eq!(light.message, None);
        assert_eq!(light.tagger, None);
        assert_eq!(light.tagger_date, None);
        assert_eq!(light.target.as_ref().map(|c| c.sha.clone()), Some(oid.to_string()));

        let annotated = tags.iter().find(|t| t.name == "v1.0").unwrap();
        assert!(annotated.is_annotated);
        assert_eq!(annotated.canonical_name, "refs/tags/v1.0");
        assert!(annotated.message.as_deref().unwrap().starts_with("Release 1.0"));
        assert_eq!(annotated.tagger.as_deref(), Some("Test"));
        assert!(annotated.tagger_date.is_some());
        assert_eq!(annotated.target.as_ref().map(|c| c.sha.clone()), Some(oid.to_string()));
    }

    #[test]
    fn remotes_fall_back_to_fetch_url() {
        let (temp, repo) = init_repo();
        repo.remote("origin", "https://example.com/a.git").unwrap();
        repo.remote("mirror", "https://example.com/b.git").unwrap();
        repo.remote_set_pushurl("mirror", Some("ssh://example.com/b.git"))
            .unwrap();
        let session = open(&temp);

        let remotes = session.remotes().unwrap();
        let origin = remotes.iter().find(|r| r.name == "origin").unwrap();
        assert_eq!(origin.push_url, "https://example.com/a.git");
        assert_eq!(origin.to_string(), "origin (https://example.com/a.git)");
        let mirror = remotes.iter().find(|r| r.name == "mirror").unwrap();
        assert_eq!(mirror.push_url, "ssh://example.com/b.git");
    }

    #[test]
    fn stashes_are_newest_first() {
        let (temp, mut repo) = init_repo();
        commit_file(&repo, "a.txt", "a\n", "initial");
        write(temp.path(), "new.txt", "new\n");
        stage(&repo, "new.txt");

        write(temp.path(), "a.txt", "first edit\n");
        stash(&mut repo, "first");
        write(temp.path(), "a.txt", "second edit\n");
        stash(&mut repo, "second");

        let session = open(&temp);
        let stashes = session.stashes().unwrap();
        assert_eq!(stashes.len(), 2);
        assert_eq!(
            stashes.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(stashes[0].reference, "stash@{0}");
        assert!(stashes[0].message.contains("second"));
        assert!(stashes[1].message.contains("first"));
        assert_eq!(session.stash(1).unwrap().reference, "stash@{1}");
        assert!(session.stash(2).is_err());
    }

    #[test]
    fn status_classification_and_buckets() {
        let (temp, repo) = init_repo();
        commit_file(&repo, "tracked.txt", "one\n", "initial");
        commit_file(&repo, "gone.txt", "x\n", "second");

        write(temp.path(), "untracked.txt", "u\n");
        write(temp.path(), "tracked.txt", "one\ntwo\n");
        stage(&repo, "tracked.txt");
        fs::remove_file(temp.path().join("gone.txt")).unwrap();

        let session = open(&temp);
        let status = session.status().unwrap();
        assert_eq!(status.len(), 3);
        assert_eq!(session.changed_files_count().unwrap(), 3);
        assert!(!session.is_clean().unwrap());

        let untracked = status.iter().find(|e| e.file_path == "untracked.txt").unwrap();
        assert_eq!(untracked.work_dir_status, FileState::Untracked);
        assert_eq!(untracked.index_status, FileState::Unmodified);
        assert!(!untracked.is_staged);
        assert!(untracked.is_untracked);

        let tracked = status.iter().find(|e| e.file_path == "tracked.txt").unwrap();
        assert_eq!(tracked.index_status, FileState::Modified);
        assert!(tracked.is_staged);
        assert_eq!(
            tracked.preview,
            Some(DiffPreview::Lines {
                added: 1,
                deleted: 0
            })
        );

        assert_eq!(session.staged().unwrap().len(), 1);
        assert_eq!(session.untracked().unwrap().len(), 1);
        let unstaged = session.unstaged().unwrap();
        assert_eq!(unstaged.len(), 1);
        assert_eq!(unstaged[0].file_path, "gone.txt");
        assert!(unstaged[0].is_deleted());
        assert!(session.conflicted().unwrap().is_empty());
    }

    #[test]
    fn untracked_directories_are_not_recursed() {
        let (temp, repo) = init_repo();
        commit_file(&repo, "a.txt", "a\n", "initial");
        write(temp.path(), "build/one.o", "1");
        write(temp.path(), "build/two.o", "2");

        let session = open(&temp);
        let status = session.status().unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].file_path, "build/");
    }

    #[test]
    fn ignored_files_only_when_requested() {
        let (temp, repo) = init_repo();
        commit_file(&repo, ".gitignore", "*.log\n", "ignore logs");
        write(temp.path(), "debug.log", "noise\n");

        let session = open(&temp);
        assert!(session.status().unwrap().is_empty());
        assert!(session.is_clean().unwrap());

        let ignored = session.ignored().unwrap();
        assert_eq!(ignored.len(), 1);
        assert_eq!(ignored[0].file_path, "debug.log");
        assert!(ignored[0].is_ignored);
        assert_eq!(ignored[0].preview, None);
    }

    #[test]
    fn tree_entries_top_level_and_recursive() {
        let (temp, repo) = init_repo();
        write(temp.path(), "src/lib.rs", "// lib\n");
        stage(&repo, "src/lib.rs");
        commit_file(&repo, "README.md", "# readme\n", "initial");
        let session = open(&temp);

        let head = session.commits().unwrap().remove(0);
        let top: Vec<String> = session
            .tree_entries(&head)
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(top, vec!["README.md", "src"]);

        let all: Vec<String> = session
            .tree_entries_recursive(&head)
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(all, vec!["README.md", "src", "src/lib.rs"]);
    }

    #[test]
    fn bare_repository_reads_history_but_not_status() {
        let temp = tempfile::TempDir::new().unwrap();
        Repository::init_bare(temp.path()).unwrap();
        let session = Session::open(temp.path()).unwrap();

        assert!(session.commits().unwrap().is_empty());
        assert!(session.head().unwrap().is_none());
        assert!(matches!(session.status(), Err(GitError::BareRepository)));
        assert!(matches!(session.is_clean(), Err(GitError::BareRepository)));
    }

    #[test]
    fn unknown_status_path_is_reported() {
        let (temp, repo) = init_repo();
        commit_file(&repo, "a.txt", "a\n", "initial");
        write(temp.path(), "a.txt", "b\n");
        let session = Session::open(temp.path()).unwrap();

        assert_eq!(session.status_entry("a.txt").unwrap().file_path, "a.txt");
        let err = session.status_entry("missing.txt").unwrap_err();
        assert_eq!(err.to_string(), "path not in repository: missing.txt");
        assert!(matches!(session.stash(0), Err(GitError::StashNotFound(0))));
    }

    #[test]
    fn context_reopens_only_on_path_change() {
        let (first, _a) = init_repo();
        let (second, _b) = init_repo();
        let mut ctx = GitContext::default();

        assert!(matches!(ctx.session(), Err(GitError::NotInitialized)));

        ctx.initialize(first.path(), None).unwrap();
        assert_eq!(ctx.repository_path(), Some(first.path()));

        ctx.initialize(first.path(), Some(PathBuf::from("/usr/bin/bcompare")))
            .unwrap();
        assert_eq!(
            ctx.session().unwrap().diff_tool(),
            Some(Path::new("/usr/bin/bcompare"))
        );

        ctx.initialize(second.path(), None).unwrap();
        assert_eq!(ctx.repository_path(), Some(second.path()));
        assert_eq!(ctx.session().unwrap().diff_tool(), None);

        let err = ctx.initialize(second.path().join("missing"), None).unwrap_err();
        assert!(matches!(err, GitError::RepositoryNotFound { .. }));
        assert!(!ctx.is_initialized());
    }
}
