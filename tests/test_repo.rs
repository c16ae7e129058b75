mod common;

use gitvault::*;

// ---------------------------------------------------------------------------
// Open / initialize
// ---------------------------------------------------------------------------

#[test]
fn open_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::open(dir.path().join("deep/store"), RepositoryOptions::default())
        .unwrap();
    assert!(repo.base_path().join(".git").exists());
}

#[test]
fn open_empty_directory_initializes() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::open(dir.path(), RepositoryOptions::default()).unwrap();
    assert_eq!(repo.base_path(), dir.path());
    assert!(dir.path().join(".git").exists());
}

#[test]
fn open_non_empty_non_repo_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("stray.txt"), b"x").unwrap();

    let err = Repository::open(dir.path(), RepositoryOptions::default()).unwrap_err();
    assert!(matches!(err, Error::PathNotEmpty(_)));
}

#[test]
fn reopen_opens_instead_of_reinitializing() {
    let dir = tempfile::tempdir().unwrap();
    {
        let repo = common::open_repo(dir.path());
        repo.put("doc.txt", b"persisted", "add doc").unwrap();
    }

    let repo = common::open_repo(dir.path());
    assert_eq!(repo.fetch("doc.txt").unwrap(), b"persisted");
    assert_eq!(repo.revisions("doc.txt").unwrap().len(), 1);
}

#[test]
fn default_signature() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());
    assert_eq!(repo.signature().name, "gitvault");
    assert_eq!(repo.signature().email, "gitvault@localhost");
}

#[test]
fn custom_signature() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::open(
        dir.path(),
        RepositoryOptions {
            author: Some("Alice".into()),
            email: Some("alice@example.com".into()),
        },
    )
    .unwrap();
    assert_eq!(repo.signature().name, "Alice");
    assert_eq!(repo.signature().email, "alice@example.com");
}

// ---------------------------------------------------------------------------
// Put / fetch
// ---------------------------------------------------------------------------

#[test]
fn put_fetch_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    repo.put("doc.txt", b"hello world", "add doc").unwrap();
    assert_eq!(repo.fetch("doc.txt").unwrap(), b"hello world");
}

#[test]
fn put_fetch_binary_content() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    let content = [0u8, 1, 2, 255, 0, 128];
    repo.put("blob.bin", &content, "add blob").unwrap();
    assert_eq!(repo.fetch("blob.bin").unwrap(), content);
}

#[test]
fn put_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    repo.put("doc.txt", b"one", "first").unwrap();
    repo.put("doc.txt", b"two", "second").unwrap();
    assert_eq!(repo.fetch("doc.txt").unwrap(), b"two");
}

#[test]
fn put_commits_once_per_call() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    repo.put("a.txt", b"a", "one").unwrap();
    repo.put("b.txt", b"b", "two").unwrap();
    assert_eq!(common::commit_count(repo.base_path()), 2);
}

#[test]
fn put_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    // Parent directories are not created implicitly.
    assert!(repo.put("nodir/doc.txt", b"x", "add").is_err());
    assert_eq!(common::commit_count_or_zero(repo.base_path()), 0);
}

#[test]
fn fetch_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    let err = repo.fetch("ghost.txt").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn keys_may_not_escape_the_base_path() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    assert!(matches!(
        repo.put("../escape.txt", b"x", "add").unwrap_err(),
        Error::InvalidPath(_)
    ));
    assert!(matches!(
        repo.fetch("").unwrap_err(),
        Error::InvalidPath(_)
    ));
}

#[test]
fn keys_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    repo.put("/doc.txt/", b"x", "add").unwrap();
    assert_eq!(repo.fetch("doc.txt").unwrap(), b"x");
    assert_eq!(repo.fetch("./doc.txt").unwrap(), b"x");
}

// ---------------------------------------------------------------------------
// Remove
// ---------------------------------------------------------------------------

#[test]
fn remove_deletes_and_commits() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    repo.put("doc.txt", b"x", "add").unwrap();
    repo.remove("doc.txt", "delete").unwrap();

    assert!(matches!(
        repo.fetch("doc.txt").unwrap_err(),
        Error::NotFound(_)
    ));
    assert_eq!(common::commit_count(repo.base_path()), 2);
}

#[test]
fn remove_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    let err = repo.remove("ghost.txt", "delete").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

// ---------------------------------------------------------------------------
// commit_all
// ---------------------------------------------------------------------------

#[test]
fn commit_all_stages_external_changes() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    // A file written outside the put protocol is picked up by stage-all.
    std::fs::write(repo.base_path().join("side.txt"), b"side").unwrap();
    repo.commit_all("manual commit").unwrap();

    let history = repo.history("side.txt").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].message, "manual commit");
}

// ---------------------------------------------------------------------------
// Write serialization
// ---------------------------------------------------------------------------

#[test]
fn concurrent_puts_each_commit_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let repo = common::open_repo(dir.path());

    const WRITERS: usize = 8;
    std::thread::scope(|s| {
        for i in 0..WRITERS {
            let repo = &repo;
            s.spawn(move || {
                let key = format!("doc-{}.txt", i);
                let content = format!("content {}", i);
                repo.put(&key, content.as_bytes(), &format!("write {}", i))
                    .unwrap();
            });
        }
    });

    // None lost, none merged.
    assert_eq!(common::commit_count(repo.base_path()), WRITERS);
    for i in 0..WRITERS {
        let key = format!("doc-{}.txt", i);
        assert_eq!(repo.revisions(&key).unwrap().len(), 1);
        assert_eq!(
            repo.fetch(&key).unwrap(),
            format!("content {}", i).into_bytes()
        );
    }
}
