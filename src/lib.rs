//! A versioned document store backed by a git working tree.
//!
//! `gitvault` stores opaque byte documents as plain files inside a git
//! working directory and turns every mutation into a commit, giving each
//! document a durable audit history without a separate database.
//!
//! # Key types
//!
//! - [`Repository`] — opens (or initializes) the working directory and
//!   provides the put/fetch/remove/history operations. Writers are
//!   serialized by an exclusive lock held for the whole
//!   write + stage + commit sequence; reads take the shared side.
//! - [`Collection`] — a named sub-store mapped onto a subdirectory,
//!   opened on demand with [`Repository::use_collection`].
//! - [`HistoryBackend`] / [`GitCli`] — the per-key history queries
//!   (`log --follow`, `show <rev>:<path>`) that libgit2 cannot answer,
//!   delegated to the `git` command-line tool by default.
//!
//! # Quick example
//!
//! ```rust,no_run
//! use gitvault::{Repository, RepositoryOptions};
//!
//! let repo = Repository::open("/tmp/docs", RepositoryOptions::default()).unwrap();
//!
//! // Every write is one commit; the reason becomes the commit message.
//! repo.put("notes/today.md", b"hello", "add today's notes").unwrap();
//!
//! // Read back current and historical content.
//! let data = repo.fetch("notes/today.md").unwrap();
//! let revisions = repo.revisions("notes/today.md").unwrap();
//! let first = repo.fetch_revision("notes/today.md", &revisions[revisions.len() - 1]).unwrap();
//! ```

pub mod collection;
pub mod error;
pub mod history;
pub mod paths;
pub mod repo;
pub mod types;

// Re-export primary public types at crate root.
pub use collection::Collection;
pub use error::{Error, Result};
pub use history::{GitCli, HistoryBackend};
pub use repo::Repository;
pub use types::{CommitRecord, RepositoryOptions, Signature};
