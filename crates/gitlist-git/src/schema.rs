//! Static schema tree for a git connection.

use crate::commands::{StashCommand, StatusCommand};
use crate::status::Bucket;
use gitlist_core::ExplorerItem;

fn columns(names: &[&str]) -> Vec<ExplorerItem> {
    names.iter().map(|name| ExplorerItem::column(*name)).collect()
}

fn commit_children() -> Vec<ExplorerItem> {
    let mut children = columns(&[
        "Sha",
        "ShortSha",
        "Message",
        "MessageShort",
        "Author",
        "AuthorEmail",
        "AuthorDate",
        "Committer",
        "CommitterEmail",
        "CommitDate",
        "ParentCount",
        "TreeSha",
    ]);
    children.push(ExplorerItem::collection_link("Parents"));
    children.push(ExplorerItem::collection_link("TreeEntries"));
    children
}

fn status_children() -> Vec<ExplorerItem> {
    let mut children = columns(&[
        "FilePath",
        "Status",
        "IndexStatus",
        "WorkDirStatus",
        "IsStaged",
        "HasUnstagedChanges",
        "IsUntracked",
        "IsIgnored",
        "IsConflicted",
        "Preview",
    ]);
    children.extend(
        StatusCommand::ALL
            .iter()
            .map(|command| ExplorerItem::command(command.label())),
    );
    children
}

fn bucket_tooltip(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Staged => "Files with changes in the index",
        Bucket::Unstaged => "Tracked files changed in the working directory",
        Bucket::Untracked => "Files not yet tracked",
        Bucket::Ignored => "Files matched by ignore rules",
        Bucket::Conflicted => "Files with merge conflicts",
    }
}

/// The full collection tree. Pure data; nothing here touches a repository.
pub fn collections() -> Vec<ExplorerItem> {
    let mut items = vec![
        ExplorerItem::collection("Commits")
            .with_tooltip("All commits in the repository")
            .with_children(commit_children()),
        ExplorerItem::collection("Branches")
            .with_tooltip("All branches (local and remote)")
            .with_children({
                let mut children = columns(&[
                    "Name",
                    "CanonicalName",
                    "IsRemote",
                    "IsCurrentRepositoryHead",
                    "IsTracking",
                    "RemoteName",
                    "UpstreamBranchCanonicalName",
                    "AheadBy",
                    "BehindBy",
                ]);
                children.push(ExplorerItem::reference("Tip"));
                children.push(ExplorerItem::collection_link("Commits"));
                children
            }),
        ExplorerItem::collection("LocalBranches").with_tooltip("Local branches only"),
        ExplorerItem::collection("RemoteBranches").with_tooltip("Remote-tracking branches only"),
        ExplorerItem::collection("Tags")
            .with_tooltip("All tags in the repository")
            .with_children({
                let mut children = columns(&[
                    "Name",
                    "CanonicalName",
                    "IsAnnotated",
                    "Message",
                    "Tagger",
                    "TaggerEmail",
                    "TaggerDate",
                ]);
                children.push(ExplorerItem::reference("Target"));
                children
            }),
        ExplorerItem::collection("Remotes")
            .with_tooltip("Configured remotes")
            .with_children(columns(&["Name", "Url", "PushUrl"])),
        ExplorerItem::collection("Stashes")
            .with_tooltip("All stashes in the repository")
            .with_children({
                let mut children = columns(&["Index", "Reference", "Message", "When"]);
                children.push(ExplorerItem::reference("WorkTree"));
                children.extend(
                    StashCommand::ALL
                        .iter()
                        .map(|command| ExplorerItem::command(command.label())),
                );
                children
            }),
        ExplorerItem::property("Head").with_tooltip("Current HEAD reference"),
        ExplorerItem::property("RepositoryPath").with_tooltip("Path to the repository"),
        ExplorerItem::collection("Status")
            .with_tooltip("All files with status changes")
            .with_children(status_children()),
    ];

    for bucket in Bucket::ALL {
        items.push(
            ExplorerItem::collection(bucket.title())
                .with_tooltip(bucket_tooltip(bucket))
                .with_children(status_children()),
        );
    }

    items.push(ExplorerItem::property("IsClean").with_tooltip("Is the working directory clean?"));
    items.push(
        ExplorerItem::property("ChangedFilesCount").with_tooltip("Number of files with changes"),
    );
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitlist_core::ExplorerItemKind;

    fn top(name: &str) -> ExplorerItem {
        collections()
            .into_iter()
            .find(|item| item.text == name)
            .unwrap_or_else(|| panic!("missing {name}"))
    }

    #[test]
    fn every_collection_is_present() {
        let names: Vec<String> = collections().into_iter().map(|item| item.text).collect();
        for expected in [
            "Commits",
            "Branches",
            "Tags",
            "Remotes",
            "Stashes",
            "Status",
            "Staged",
            "Unstaged",
            "Untracked",
            "Ignored",
            "Conflicted",
            "Head",
            "RepositoryPath",
            "IsClean",
            "ChangedFilesCount",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn navigations_and_commands_are_tagged() {
        let commits = top("Commits");
        assert_eq!(
            commits.child("Parents").map(|c| c.kind),
            Some(ExplorerItemKind::CollectionLink)
        );

        let stashes = top("Stashes");
        assert_eq!(
            stashes.child("WorkTree").map(|c| c.kind),
            Some(ExplorerItemKind::ReferenceLink)
        );
        assert_eq!(
            stashes.child("Drop").map(|c| c.kind),
            Some(ExplorerItemKind::Command)
        );

        let status = top("Status");
        assert_eq!(
            status.child("View Diff").map(|c| c.kind),
            Some(ExplorerItemKind::Command)
        );
        assert!(top("Unstaged").child("HasUnstagedChanges").is_some());
    }

    #[test]
    fn scalars_are_properties() {
        let clean = top("IsClean");
        assert_eq!(clean.kind, ExplorerItemKind::Property);
        assert!(!clean.is_enumerable);
        assert!(top("Commits").is_enumerable);
    }
}
