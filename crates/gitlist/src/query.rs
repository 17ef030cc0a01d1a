//! Render top-level collections as text or JSON lines.

use clap::ValueEnum;
use gitlist_git::{Bucket, Session, StatusCommand, StatusEntry};
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};

/// Output format for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Top-level collections and scalars a query can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Commits,
    Branches,
    LocalBranches,
    RemoteBranches,
    Tags,
    Remotes,
    Stashes,
    Status,
    Staged,
    Unstaged,
    Untracked,
    Ignored,
    Conflicted,
    Head,
    RepositoryPath,
    IsClean,
    ChangedFilesCount,
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Git(#[from] gitlist_git::GitError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to encode row: {0}")]
    Json(#[from] serde_json::Error),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Status rows carry the preview and the commands that apply to them.
#[derive(Serialize)]
struct StatusRow<'a> {
    #[serde(flatten)]
    entry: &'a StatusEntry,
    commands: Vec<&'static str>,
}

fn status_line(entry: &StatusEntry) -> String {
    let commands: Vec<&str> = StatusCommand::available_for(entry)
        .iter()
        .map(|command| command.label())
        .collect();
    match entry.preview {
        Some(preview) => format!("{entry}  {preview}  [{}]", commands.join(", ")),
        None => format!("{entry}  [{}]", commands.join(", ")),
    }
}

fn write_rows<W, T>(out: &mut W, format: OutputFormat, rows: &[T]) -> QueryResult<()>
where
    W: Write,
    T: Display + Serialize,
{
    for row in rows {
        match format {
            OutputFormat::Text => writeln!(out, "{row}")?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(row)?)?,
        }
    }
    Ok(())
}

fn write_status<W: Write>(
    out: &mut W,
    format: OutputFormat,
    rows: &[StatusEntry],
) -> QueryResult<()> {
    for entry in rows {
        match format {
            OutputFormat::Text => writeln!(out, "{}", status_line(entry))?,
            OutputFormat::Json => {
                let row = StatusRow {
                    entry,
                    commands: StatusCommand::available_for(entry)
                        .iter()
                        .map(|command| command.name())
                        .collect(),
                };
                writeln!(out, "{}", serde_json::to_string(&row)?)?;
            }
        }
    }
    Ok(())
}

fn write_scalar<W, T>(out: &mut W, format: OutputFormat, value: T) -> QueryResult<()>
where
    W: Write,
    T: Display + Serialize,
{
    match format {
        OutputFormat::Text => writeln!(out, "{value}")?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&value)?)?,
    }
    Ok(())
}

fn bucket_of(collection: Collection) -> Option<Bucket> {
    match collection {
        Collection::Staged => Some(Bucket::Staged),
        Collection::Unstaged => Some(Bucket::Unstaged),
        Collection::Untracked => Some(Bucket::Untracked),
        Collection::Ignored => Some(Bucket::Ignored),
        Collection::Conflicted => Some(Bucket::Conflicted),
        _ => None,
    }
}

/// Read `collection` from `session` and write it to `out`.
pub fn run<W: Write>(
    session: &Session,
    collection: Collection,
    format: OutputFormat,
    out: &mut W,
) -> QueryResult<()> {
    tracing::debug!(?collection, ?format, "running query");

    if let Some(bucket) = bucket_of(collection) {
        return write_status(out, format, &session.bucket(bucket)?);
    }

    match collection {
        Collection::Commits => write_rows(out, format, &session.commits()?),
        Collection::Branches => write_rows(out, format, &session.branches()?),
        Collection::LocalBranches => write_rows(out, format, &session.local_branches()?),
        Collection::RemoteBranches => write_rows(out, format, &session.remote_branches()?),
        Collection::Tags => write_rows(out, format, &session.tags()?),
        Collection::Remotes => write_rows(out, format, &session.remotes()?),
        Collection::Stashes => write_rows(out, format, &session.stashes()?),
        Collection::Status => write_status(out, format, &session.status()?),
        Collection::Head => match (session.head()?, format) {
            (Some(head), _) => write_rows(out, format, &[head]),
            (None, OutputFormat::Text) => write_scalar(out, format, "(unborn)"),
            (None, OutputFormat::Json) => {
                writeln!(out, "null")?;
                Ok(())
            }
        },
        Collection::RepositoryPath => write_scalar(
            out,
            format,
            session.repository_path().to_string_lossy().into_owned(),
        ),
        Collection::IsClean => write_scalar(out, format, session.is_clean()?),
        Collection::ChangedFilesCount => write_scalar(out, format, session.changed_files_count()?),
        Collection::Staged
        | Collection::Unstaged
        | Collection::Untracked
        | Collection::Ignored
        | Collection::Conflicted => Ok(()),
    }
}
