use std::path::PathBuf;

use crate::error::Result;
use crate::repo::Repository;
use crate::types::CommitRecord;

/// A named sub-store: documents grouped under one subdirectory of the
/// repository base path.
///
/// Obtained from [`Repository::open_collection`],
/// [`Repository::create_collection`], or [`Repository::use_collection`].
/// A collection borrows its repository and delegates every operation to it
/// with the collection name prefixed onto the key, so collection writes
/// share the repository's locking and commit discipline.
pub struct Collection<'r> {
    repo: &'r Repository,
    name: String,
}

impl std::fmt::Debug for Collection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("base", &self.repo.base_path())
            .finish()
    }
}

impl<'r> Collection<'r> {
    pub(crate) fn new(repo: &'r Repository, name: String) -> Self {
        Self { repo, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the collection directory.
    pub fn path(&self) -> PathBuf {
        self.repo.base_path().join(&self.name)
    }

    fn key(&self, key: &str) -> String {
        format!("{}/{}", self.name, key)
    }

    /// Store `content` under `key` within this collection.
    pub fn put(&self, key: &str, content: &[u8], reason: &str) -> Result<()> {
        self.repo.put(&self.key(key), content, reason)
    }

    /// Current content of `key` within this collection.
    pub fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        self.repo.fetch(&self.key(key))
    }

    /// Content of `key` as of a specific historical `revision`.
    pub fn fetch_revision(&self, key: &str, revision: &str) -> Result<Vec<u8>> {
        self.repo.fetch_revision(&self.key(key), revision)
    }

    /// Delete the document at `key` within this collection.
    pub fn remove(&self, key: &str, reason: &str) -> Result<()> {
        self.repo.remove(&self.key(key), reason)
    }

    /// Ordered commit history for `key` within this collection.
    pub fn history(&self, key: &str) -> Result<Vec<CommitRecord>> {
        self.repo.history(&self.key(key))
    }

    /// The commit identifiers of [`Collection::history`], order preserved.
    pub fn revisions(&self, key: &str) -> Result<Vec<String>> {
        self.repo.revisions(&self.key(key))
    }
}
