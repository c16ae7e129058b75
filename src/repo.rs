use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::history::{GitCli, HistoryBackend};
use crate::paths;
use crate::types::{CommitRecord, RepositoryOptions, Signature};

/// Commit message recorded when `use_collection` has to create the store.
const AUTO_CREATE_REASON: &str = "automatically created collection on use";

/// Marker file committed on collection creation, since git cannot track an
/// empty directory.
const COLLECTION_MARKER: &str = ".collection";

/// A versioned document store backed by a git working tree.
///
/// Documents are opaque byte blobs addressed by a relative path key; every
/// `put`/`remove` becomes exactly one commit, so each key carries its full
/// audit history. One live `Repository` per base path per process is
/// expected; concurrent mutation of the same directory by another process
/// is undefined.
pub struct Repository {
    base: PathBuf,
    // git2::Repository is not Sync; the handle is only locked inside the
    // stage/commit step, while the write lock is already held.
    engine: Mutex<git2::Repository>,
    // Write transactions hold the exclusive side for the whole
    // mutate + stage + commit sequence; reads hold the shared side.
    lock: RwLock<()>,
    signature: Signature,
    history: Box<dyn HistoryBackend>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("base", &self.base)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open the working directory at `path`, initializing a fresh
    /// repository if the directory is missing or empty.
    ///
    /// # Errors
    /// Returns [`Error::PathNotEmpty`] if `path` exists, is not a valid
    /// repository, and is not empty. Filesystem and engine errors
    /// propagate unchanged.
    pub fn open(path: impl AsRef<Path>, options: RepositoryOptions) -> Result<Self> {
        Self::open_with_backend(path, options, GitCli)
    }

    /// Like [`Repository::open`], with a caller-supplied history backend
    /// in place of the `git` command-line fallback.
    pub fn open_with_backend(
        path: impl AsRef<Path>,
        options: RepositoryOptions,
        backend: impl HistoryBackend + 'static,
    ) -> Result<Self> {
        let base = path.as_ref().to_path_buf();
        fs::create_dir_all(&base).map_err(|e| Error::io(&base, e))?;

        let engine = match git2::Repository::open(&base) {
            Ok(engine) => engine,
            Err(_) => {
                // Not a repository yet. Only an empty directory may be
                // adopted; racing two initializations against the same
                // empty directory is undefined (no lock exists yet).
                ensure_can_initialize(&base)?;
                info!("initializing repository at {}", base.display());
                git2::Repository::init(&base).map_err(Error::git)?
            }
        };

        let signature = Signature {
            name: options.author.unwrap_or_else(|| "gitvault".into()),
            email: options.email.unwrap_or_else(|| "gitvault@localhost".into()),
        };

        Ok(Repository {
            base,
            engine: Mutex::new(engine),
            lock: RwLock::new(()),
            signature,
            history: Box::new(backend),
        })
    }

    /// Absolute base path of the working directory.
    pub fn base_path(&self) -> &Path {
        &self.base
    }

    /// The identity recorded on every commit.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    // -----------------------------------------------------------------------
    // Write protocol
    // -----------------------------------------------------------------------

    /// Store `content` under `key` and commit the change with `reason` as
    /// the commit message.
    ///
    /// The exclusive lock is held for the whole write + stage + commit
    /// sequence. If the filesystem write fails, no commit is created. The
    /// sequence is not atomic against a process crash between the write
    /// and the commit; a returned error always means it did not complete.
    pub fn put(&self, key: &str, content: &[u8], reason: &str) -> Result<()> {
        let path = paths::key_path(&self.base, key)?;

        let _guard = self.write_guard()?;
        fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        debug!("put {} ({} bytes)", key, content.len());

        self.commit_all_locked(reason)
    }

    /// Delete the document at `key` and commit the removal.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no document exists at `key`.
    pub fn remove(&self, key: &str, reason: &str) -> Result<()> {
        let path = paths::key_path(&self.base, key)?;

        let _guard = self.write_guard()?;
        fs::remove_file(&path).map_err(|e| missing_as_not_found(key, &path, e))?;
        debug!("remove {}", key);

        self.commit_all_locked(reason)
    }

    /// Stage every pending working-tree change and commit it with `reason`
    /// as the commit message.
    pub fn commit_all(&self, reason: &str) -> Result<()> {
        let _guard = self.write_guard()?;
        self.commit_all_locked(reason)
    }

    /// The shared stage + commit tail of every write transaction. Caller
    /// must hold the exclusive lock.
    fn commit_all_locked(&self, reason: &str) -> Result<()> {
        self.stage_changes()?;
        self.commit(reason)
    }

    /// Stage all working-tree changes, including deletions of tracked
    /// files.
    fn stage_changes(&self) -> Result<()> {
        let engine = self.engine()?;
        let mut index = engine.index().map_err(Error::git)?;
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .map_err(Error::git)?;
        index.update_all(["*"].iter(), None).map_err(Error::git)?;
        index.write().map_err(Error::git)?;
        Ok(())
    }

    /// Commit the staged index onto HEAD, timestamped at call time.
    fn commit(&self, reason: &str) -> Result<()> {
        let engine = self.engine()?;

        let sig = git2::Signature::now(&self.signature.name, &self.signature.email)
            .map_err(Error::git)?;

        let mut index = engine.index().map_err(Error::git)?;
        let tree_id = index.write_tree().map_err(Error::git)?;
        let tree = engine.find_tree(tree_id).map_err(Error::git)?;

        // The first commit on an unborn branch has no parent.
        let parent = match engine.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(Error::git)?),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                None
            }
            Err(e) => return Err(Error::git(e)),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        engine
            .commit(Some("HEAD"), &sig, &sig, reason, &tree, &parents)
            .map_err(Error::git)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read protocol
    // -----------------------------------------------------------------------

    /// Current content of the document at `key`.
    ///
    /// Holds the shared lock, so a fetch never observes the middle of an
    /// in-flight write transaction.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no document exists at `key`.
    pub fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let path = paths::key_path(&self.base, key)?;

        let _guard = self.read_guard()?;
        fs::read(&path).map_err(|e| missing_as_not_found(key, &path, e))
    }

    /// Content of the document at `key` as of a specific historical
    /// `revision`, resolved entirely by the history backend.
    pub fn fetch_revision(&self, key: &str, revision: &str) -> Result<Vec<u8>> {
        let key = paths::normalize_key(key)?;

        let _guard = self.read_guard()?;
        self.history.show(&self.base, &key, revision)
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Ordered commit history for `key`, newest first, following renames.
    /// The backend's order is preserved without re-sorting.
    pub fn history(&self, key: &str) -> Result<Vec<CommitRecord>> {
        let key = paths::normalize_key(key)?;

        let _guard = self.read_guard()?;
        self.history.resolve(&self.base, &key)
    }

    /// The commit identifiers of [`Repository::history`], order preserved.
    pub fn revisions(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.history(key)?.into_iter().map(|c| c.id).collect())
    }

    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    /// List the names of all existing collections, sorted.
    pub fn collections(&self) -> Result<Vec<String>> {
        let _guard = self.read_guard()?;

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base).map_err(|e| Error::io(&self.base, e))? {
            let entry = entry.map_err(|e| Error::io(&self.base, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == ".git" {
                continue;
            }
            let file_type = entry.file_type().map_err(|e| Error::io(&self.base, e))?;
            if file_type.is_dir() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Open an existing collection.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no collection named `name` exists,
    /// or [`Error::InvalidPath`] if the name is taken by a plain file.
    pub fn open_collection(&self, name: &str) -> Result<Collection<'_>> {
        let name = paths::collection_name(name)?;
        let path = self.base.join(&name);

        let _guard = self.read_guard()?;
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Ok(Collection::new(self, name)),
            Ok(_) => Err(Error::invalid_path(format!(
                "collection '{}' is not a directory",
                name,
            ))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::not_found(format!("collection '{}'", name)))
            }
            Err(e) => Err(Error::io(&path, e)),
        }
    }

    /// Create a new collection, recording `reason` as the creation
    /// rationale. A marker file is committed so the otherwise empty
    /// directory is tracked.
    pub fn create_collection(&self, name: &str, reason: &str) -> Result<Collection<'_>> {
        let name = paths::collection_name(name)?;
        let path = self.base.join(&name);

        fs::create_dir_all(&path).map_err(|e| Error::io(&path, e))?;
        self.put(&format!("{}/{}", name, COLLECTION_MARKER), b"", reason)?;

        Ok(Collection::new(self, name))
    }

    /// Open `name`, creating it first if and only if it does not exist.
    ///
    /// Any open failure other than [`Error::NotFound`], and any create
    /// failure, propagates unchanged.
    pub fn use_collection(&self, name: &str) -> Result<Collection<'_>> {
        match self.open_collection(name) {
            Ok(collection) => Ok(collection),
            Err(Error::NotFound(_)) => self.create_collection(name, AUTO_CREATE_REASON),
            Err(err) => Err(err),
        }
    }

    // -----------------------------------------------------------------------
    // Lock helpers
    // -----------------------------------------------------------------------

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, ()>> {
        self.lock
            .write()
            .map_err(|_| Error::git_msg("repository lock poisoned"))
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, ()>> {
        self.lock
            .read()
            .map_err(|_| Error::git_msg("repository lock poisoned"))
    }

    fn engine(&self) -> Result<MutexGuard<'_, git2::Repository>> {
        self.engine
            .lock()
            .map_err(|_| Error::git_msg("engine handle poisoned"))
    }
}

/// The directory must be empty before it can be adopted as a fresh
/// repository.
fn ensure_can_initialize(base: &Path) -> Result<()> {
    let mut entries = fs::read_dir(base).map_err(|e| Error::io(base, e))?;
    if entries.next().is_some() {
        return Err(Error::path_not_empty(base));
    }
    Ok(())
}

/// Map a missing-file io error to [`Error::NotFound`] for `key`; everything
/// else stays an io error with the path attached.
fn missing_as_not_found(key: &str, path: &Path, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::not_found(key)
    } else {
        Error::io(path, err)
    }
}
