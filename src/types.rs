// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Author/committer identity recorded on every commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            name: "gitvault".into(),
            email: "gitvault@localhost".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RepositoryOptions
// ---------------------------------------------------------------------------

/// Options for opening or initializing a repository.
#[derive(Debug, Clone, Default)]
pub struct RepositoryOptions {
    /// Commit author name; falls back to the default signature.
    pub author: Option<String>,
    /// Commit author email; falls back to the default signature.
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// CommitRecord
// ---------------------------------------------------------------------------

/// One commit in a document's history, as reported by the history backend.
///
/// Records are immutable and ordered newest first. The `id` is the opaque
/// commit identifier produced by the engine; it is never reformatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    /// Commit time as seconds since the Unix epoch.
    pub time: i64,
    pub message: String,
}
