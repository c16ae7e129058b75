use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};
use crate::types::CommitRecord;

/// `git log` format producing one record per line with unit-separated
/// fields: commit id, author name, author email, commit time, subject.
const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%ae%x1f%at%x1f%s";

/// ASCII unit separator, matching the `%x1f` placeholders in [`LOG_FORMAT`].
const FIELD_SEP: char = '\u{1f}';

// ---------------------------------------------------------------------------
// HistoryBackend
// ---------------------------------------------------------------------------

/// Answers the per-key history questions the embedded engine cannot:
/// path-filtered, rename-following log traversal and "content as of a
/// revision". Stateless from the repository's point of view.
pub trait HistoryBackend: Send + Sync {
    /// Ordered commit history for `key`, newest first, following renames.
    ///
    /// A key that never appeared in any commit yields an empty sequence,
    /// not an error.
    fn resolve(&self, base: &Path, key: &str) -> Result<Vec<CommitRecord>>;

    /// Byte content of `key` as of `revision`.
    fn show(&self, base: &Path, key: &str, revision: &str) -> Result<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// GitCli
// ---------------------------------------------------------------------------

/// History backend shelling out to the `git` command-line tool.
///
/// libgit2 exposes no `log --follow` equivalent, so both queries run the
/// real tool against the repository's working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    fn run(&self, base: &Path, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new("git")
            .arg("-C")
            .arg(base)
            .args(args)
            .output()
            .map_err(|e| Error::git_msg(format!("failed to run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::git_msg(stderr.trim().to_string()));
        }

        Ok(output.stdout)
    }
}

impl HistoryBackend for GitCli {
    fn resolve(&self, base: &Path, key: &str) -> Result<Vec<CommitRecord>> {
        let stdout = self.run(base, &["log", "--follow", LOG_FORMAT, "--", key])?;
        parse_log(&String::from_utf8_lossy(&stdout))
    }

    fn show(&self, base: &Path, key: &str, revision: &str) -> Result<Vec<u8>> {
        let target = format!("{}:{}", revision, key);
        self.run(base, &["show", &target])
    }
}

/// Parse `git log` output in [`LOG_FORMAT`] into commit records,
/// preserving the order git reports (newest first).
fn parse_log(out: &str) -> Result<Vec<CommitRecord>> {
    let mut records = Vec::new();

    for line in out.lines() {
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.splitn(5, FIELD_SEP).collect();
        if fields.len() != 5 {
            return Err(Error::git_msg(format!("malformed log line: {}", line)));
        }

        let time = fields[3]
            .parse::<i64>()
            .map_err(|_| Error::git_msg(format!("malformed commit time: {}", fields[3])))?;

        records.push(CommitRecord {
            id: fields[0].to_string(),
            author_name: fields[1].to_string(),
            author_email: fields[2].to_string(),
            time,
            message: fields[4].to_string(),
        });
    }

    Ok(records)
}
