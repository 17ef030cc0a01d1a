//! Fixture repositories for unit tests.

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn init_repo() -> (TempDir, Repository) {
    let temp = TempDir::new().expect("create temp dir");
    let repo = Repository::init(temp.path()).expect("init repo");

    let mut config = repo.config().expect("get config");
    config.set_str("user.name", "Test").expect("set name");
    config
        .set_str("user.email", "test@test.com")
        .expect("set email");

    (temp, repo)
}

/// Write a file below `root`, creating parent directories.
pub fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write file");
}

pub fn signature() -> Signature<'static> {
    Signature::now("Test", "test@test.com").expect("signature")
}

pub fn stage(repo: &Repository, rel: &str) {
    let mut index = repo.index().expect("index");
    index.add_path(Path::new(rel)).expect("add path");
    index.write().expect("write index");
}

/// Commit the current index on HEAD.
pub fn commit_index(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().expect("index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let sig = signature();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit")
}

/// Write, stage and commit a single file.
pub fn commit_file(repo: &Repository, rel: &str, contents: &str, message: &str) -> Oid {
    let workdir = repo.workdir().expect("workdir").to_path_buf();
    write(&workdir, rel, contents);
    stage(repo, rel);
    commit_index(repo, message)
}

pub fn lightweight_tag(repo: &Repository, name: &str, target: Oid) {
    let object = repo.find_object(target, None).expect("find object");
    repo.tag_lightweight(name, &object, false)
        .expect("lightweight tag");
}

pub fn annotated_tag(repo: &Repository, name: &str, target: Oid, message: &str) {
    let object = repo.find_object(target, None).expect("find object");
    repo.tag(name, &object, &signature(), message, false)
        .expect("annotated tag");
}

pub fn stash(repo: &mut Repository, message: &str) -> Oid {
    repo.stash_save(&signature(), message, None)
        .expect("stash save")
}
