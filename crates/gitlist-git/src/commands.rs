//! Commands offered on status entries and stashes.
//!
//! A command is a plain enum value: the host asks which commands are
//! available for a record, shows them, and hands the chosen one back to
//! [`Session::run_status_command`] or [`Session::run_stash_command`].
//! Running a command never fails from the host's point of view; every
//! outcome, including library errors, becomes output.

use crate::diff;
use crate::error::{GitError, GitResult};
use crate::model::{Commit, Identity, Stash, StatusEntry};
use crate::preview;
use crate::session::Session;
use gitlist_core::{CommandContext, Output};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Commands on a status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCommand {
    Stage,
    Unstage,
    Commit,
    Discard,
    ViewDiff,
}

impl StatusCommand {
    pub const ALL: [StatusCommand; 5] = [
        StatusCommand::Stage,
        StatusCommand::Unstage,
        StatusCommand::Commit,
        StatusCommand::Discard,
        StatusCommand::ViewDiff,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatusCommand::Stage => "stage",
            StatusCommand::Unstage => "unstage",
            StatusCommand::Commit => "commit",
            StatusCommand::Discard => "discard",
            StatusCommand::ViewDiff => "view-diff",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusCommand::Stage => "Stage",
            StatusCommand::Unstage => "Unstage",
            StatusCommand::Commit => "Commit",
            StatusCommand::Discard => "Discard",
            StatusCommand::ViewDiff => "View Diff",
        }
    }

    fn failure_verb(&self) -> &'static str {
        match self {
            StatusCommand::Stage => "staging",
            StatusCommand::Unstage => "unstaging",
            StatusCommand::Commit => "committing",
            StatusCommand::Discard => "discarding changes to",
            StatusCommand::ViewDiff => "opening diff for",
        }
    }

    pub fn is_available(&self, entry: &StatusEntry) -> bool {
        match self {
            StatusCommand::Stage => !entry.is_staged,
            StatusCommand::Unstage => entry.is_staged,
            StatusCommand::Commit => true,
            StatusCommand::Discard => entry.is_untracked || entry.has_unstaged_changes,
            StatusCommand::ViewDiff => entry.has_changes(),
        }
    }

    /// Commands that apply to `entry`, in display order.
    pub fn available_for(entry: &StatusEntry) -> Vec<StatusCommand> {
        Self::ALL
            .into_iter()
            .filter(|command| command.is_available(entry))
            .collect()
    }
}

impl fmt::Display for StatusCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Commands on a stash entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StashCommand {
    /// Apply and keep the stash
    Apply,
    /// Apply and remove the stash
    Pop,
    /// Remove without applying
    Drop,
}

impl StashCommand {
    pub const ALL: [StashCommand; 3] = [StashCommand::Apply, StashCommand::Pop, StashCommand::Drop];

    pub fn name(&self) -> &'static str {
        match self {
            StashCommand::Apply => "apply",
            StashCommand::Pop => "pop",
            StashCommand::Drop => "drop",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StashCommand::Apply => "Apply",
            StashCommand::Pop => "Pop",
            StashCommand::Drop => "Drop",
        }
    }

    fn failure_verb(&self) -> &'static str {
        match self {
            StashCommand::Apply => "applying",
            StashCommand::Pop => "popping",
            StashCommand::Drop => "dropping",
        }
    }

    /// Every stash command applies to every stash.
    pub fn is_available(&self, _stash: &Stash) -> bool {
        true
    }

    pub fn available_for(stash: &Stash) -> Vec<StashCommand> {
        Self::ALL
            .into_iter()
            .filter(|command| command.is_available(stash))
            .collect()
    }
}

impl fmt::Display for StashCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A command name that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for StatusCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| {
                command.name().eq_ignore_ascii_case(s) || command.label().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

impl FromStr for StashCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct CommitDetails {
    sha: String,
    short_sha: String,
    message: String,
    author: Identity,
}

impl From<&Commit> for CommitDetails {
    fn from(commit: &Commit) -> Self {
        CommitDetails {
            sha: commit.sha.clone(),
            short_sha: commit.short_sha.clone(),
            message: commit.message.clone(),
            author: commit.author.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct NewFile<'a> {
    file: &'a str,
    status: &'a str,
    content: String,
}

/// Mutations
impl Session {
    /// Stage a path; a path missing from the working tree is staged as a
    /// deletion.
    pub fn stage(&self, path: &str) -> GitResult<()> {
        let mut index = self.repo.index()?;
        index.read(false)?;
        let full_path = self.workdir()?.join(path);

        if full_path.is_dir() {
            index.add_all([path], git2::IndexAddOption::DEFAULT, None)?;
        } else if full_path.exists() {
            index.add_path(Path::new(path))?;
        } else {
            index.remove_path(Path::new(path))?;
        }

        index.write()?;
        tracing::info!(path, "staged");
        Ok(())
    }

    /// Reset a path in the index to its HEAD state.
    pub fn unstage(&self, path: &str) -> GitResult<()> {
        match self.repo.head().and_then(|head| head.peel_to_commit()) {
            Ok(head) => {
                let in_head = head.tree()?.get_path(Path::new(path)).is_ok();
                if in_head {
                    self.repo.reset_default(Some(head.as_object()), [path])?;
                } else {
                    self.remove_from_index(path)?;
                }
            }
            // No HEAD commit yet
            Err(_) => self.remove_from_index(path)?,
        }

        tracing::info!(path, "unstaged");
        Ok(())
    }

    fn remove_from_index(&self, path: &str) -> GitResult<()> {
        let mut index = self.repo.index()?;
        index.read(false)?;
        index.remove_path(Path::new(path))?;
        index.write()?;
        Ok(())
    }

    /// Commit the whole index on HEAD using the configured signature.
    pub fn commit(&self, message: &str) -> GitResult<Commit> {
        let signature = self.repo.signature()?;
        let mut index = self.repo.index()?;
        index.read(false)?;
        let tree = self.repo.find_tree(index.write_tree()?)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(err)
                if matches!(
                    err.code(),
                    git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound
                ) =>
            {
                None
            }
            Err(err) => return Err(err.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        let commit = Commit::from_git(&self.repo.find_commit(oid)?);
        tracing::info!(sha = %commit.short_sha, "committed");
        Ok(commit)
    }

    /// Throw away working-tree changes. Untracked files and directories are
    /// deleted; tracked paths are force-checked-out from HEAD.
    pub fn discard(&self, entry: &StatusEntry) -> GitResult<()> {
        if entry.is_untracked {
            let full_path = self.workdir()?.join(&entry.file_path);
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else {
                fs::remove_file(&full_path)?;
            }
        } else {
            let mut opts = git2::build::CheckoutBuilder::new();
            opts.path(&entry.file_path);
            opts.force();
            self.repo.checkout_head(Some(&mut opts))?;
        }

        tracing::info!(path = %entry.file_path, untracked = entry.is_untracked, "discarded");
        Ok(())
    }

    pub fn stash_apply(&mut self, index: usize) -> GitResult<()> {
        self.repo.stash_apply(index, None)?;
        tracing::info!(index, "applied stash");
        Ok(())
    }

    pub fn stash_pop(&mut self, index: usize) -> GitResult<()> {
        self.repo.stash_pop(index, None)?;
        tracing::info!(index, "popped stash");
        Ok(())
    }

    pub fn stash_drop(&mut self, index: usize) -> GitResult<()> {
        self.repo.stash_drop(index)?;
        tracing::info!(index, "dropped stash");
        Ok(())
    }
}

/// Command dispatch
impl Session {
    pub fn run_status_command(
        &self,
        command: StatusCommand,
        entry: &StatusEntry,
        ctx: &mut CommandContext<'_>,
    ) {
        if !command.is_available(entry) {
            ctx.say(format!(
                "{} is not available for {}",
                command.label(),
                entry.file_path
            ));
            return;
        }

        let result = match command {
            StatusCommand::Stage => self
                .stage(&entry.file_path)
                .map(|()| ctx.say(format!("✓ Staged: {}", entry.file_path))),
            StatusCommand::Unstage => self
                .unstage(&entry.file_path)
                .map(|()| ctx.say(format!("✓ Unstaged: {}", entry.file_path))),
            StatusCommand::Commit => self.commit_entry(entry, ctx),
            StatusCommand::Discard => self.discard_entry(entry, ctx),
            StatusCommand::ViewDiff => self.view_diff(entry, ctx),
        };

        if let Err(err) = result {
            tracing::warn!(command = command.name(), path = %entry.file_path, error = %err, "command failed");
            ctx.say(format!(
                "Error {} {}: {}",
                command.failure_verb(),
                entry.file_path,
                err
            ));
        }
    }

    /// Run a stash command. Indices shift after pop and drop, so callers
    /// must re-read the stash list afterwards.
    pub fn run_stash_command(
        &mut self,
        command: StashCommand,
        stash: &Stash,
        ctx: &mut CommandContext<'_>,
    ) {
        let reference = &stash.reference;
        let result = match command {
            StashCommand::Apply => self
                .stash_apply(stash.index)
                .map(|()| ctx.say(format!("✓ Applied stash: {reference}"))),
            StashCommand::Pop => self
                .stash_pop(stash.index)
                .map(|()| ctx.say(format!("✓ Popped stash: {reference}"))),
            StashCommand::Drop => {
                if ctx.confirm(&format!(
                    "Are you sure you want to drop {reference}? (yes/no)"
                )) {
                    self.stash_drop(stash.index)
                        .map(|()| ctx.say(format!("✓ Dropped stash: {reference}")))
                } else {
                    ctx.say("Drop cancelled");
                    Ok(())
                }
            }
        };

        if let Err(err) = result {
            tracing::warn!(command = command.name(), stash = %reference, error = %err, "command failed");
            ctx.say(format!(
                "Error {} stash {}: {}",
                command.failure_verb(),
                reference,
                err
            ));
        }
    }

    fn commit_entry(&self, entry: &StatusEntry, ctx: &mut CommandContext<'_>) -> GitResult<()> {
        let message = ctx.ask("Commit message:", "").unwrap_or_default();
        if message.trim().is_empty() {
            ctx.say("Commit cancelled - no message provided");
            return Ok(());
        }

        if !entry.is_staged {
            self.stage(&entry.file_path)?;
            ctx.say(format!("Staged: {}", entry.file_path));
        }

        let commit = self.commit(&message)?;
        ctx.say(format!("✓ Committed {}", entry.file_path));
        ctx.output
            .object(Some("Commit Details"), &CommitDetails::from(&commit));
        Ok(())
    }

    fn discard_entry(&self, entry: &StatusEntry, ctx: &mut CommandContext<'_>) -> GitResult<()> {
        let question = format!(
            "Are you sure you want to discard changes to {}? (yes/no)",
            entry.file_path
        );
        if !ctx.confirm(&question) {
            ctx.say("Discard cancelled");
            return Ok(());
        }

        self.discard(entry)?;
        if entry.is_untracked {
            ctx.say(format!("✓ Deleted untracked: {}", entry.file_path));
        } else {
            ctx.say(format!("✓ Discarded changes to: {}", entry.file_path));
        }
        Ok(())
    }

    fn view_diff(&self, entry: &StatusEntry, ctx: &mut CommandContext<'_>) -> GitResult<()> {
        let path = entry.file_path.as_str();
        let full_path = self.workdir()?.join(path);
        let tool = self.diff_tool().filter(|tool| tool.is_file());

        let head = if entry.is_untracked {
            None
        } else {
            preview::head_blob(&self.repo, entry.head_path())?
        };

        let Some(head) = head else {
            let status = if entry.is_untracked {
                "Untracked (new file)"
            } else {
                "New file"
            };
            return match tool {
                Some(tool) => {
                    let args = vec![full_path.to_string_lossy().into_owned()];
                    ctx.launcher.launch(tool, &args)?;
                    ctx.say(format!("✓ Opened {path} in external tool"));
                    Ok(())
                }
                None => {
                    let content = String::from_utf8_lossy(&fs::read(&full_path)?).into_owned();
                    ctx.output.object(
                        Some("New File"),
                        &NewFile {
                            file: path,
                            status,
                            content,
                        },
                    );
                    Ok(())
                }
            };
        };

        let working_missing = entry.is_deleted() && !full_path.exists();
        match tool {
            Some(tool) if !working_missing => {
                let head_copy = extract_to_temp(path, &head)?;
                let args = vec![
                    head_copy.to_string_lossy().into_owned(),
                    full_path.to_string_lossy().into_owned(),
                    format!("/title1=HEAD: {path}"),
                    format!("/title2=Working: {path}"),
                ];
                ctx.launcher.launch(tool, &args)?;
                ctx.say("✓ Opened diff in external tool");
            }
            _ => {
                let working = if working_missing {
                    Vec::new()
                } else {
                    fs::read(&full_path)?
                };
                let view = diff::head_vs_working(path, &head, &working)?;
                ctx.output.emit(Output::Diff(view));
            }
        }
        Ok(())
    }
}

/// Write HEAD content to a temp file that is not removed on drop; the
/// external tool reads it after we return.
fn extract_to_temp(path: &str, content: &[u8]) -> GitResult<std::path::PathBuf> {
    let suffix = Path::new(path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix("gitlist-head-")
        .suffix(&suffix)
        .tempfile()?;
    file.write_all(content)?;
    file.flush()?;

    let kept = file
        .into_temp_path()
        .keep()
        .map_err(|err| GitError::Io(err.error))?;
    Ok(kept)
}
