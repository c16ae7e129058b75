use std::path::Path;

use gitvault::{Repository, RepositoryOptions};

pub fn open_repo(dir: &Path) -> Repository {
    Repository::open(dir.join("store"), RepositoryOptions::default()).unwrap()
}

/// Total number of commits on HEAD, straight from the git CLI.
#[allow(dead_code)]
pub fn commit_count(base: &Path) -> usize {
    let output = std::process::Command::new("git")
        .arg("-C")
        .arg(base)
        .args(["rev-list", "--count", "HEAD"])
        .output()
        .unwrap();
    assert!(output.status.success(), "rev-list failed");
    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse()
        .unwrap()
}

/// Like [`commit_count`], but an unborn HEAD counts as zero commits.
#[allow(dead_code)]
pub fn commit_count_or_zero(base: &Path) -> usize {
    let output = std::process::Command::new("git")
        .arg("-C")
        .arg(base)
        .args(["rev-list", "--count", "HEAD"])
        .output()
        .unwrap();
    if !output.status.success() {
        return 0;
    }
    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse()
        .unwrap()
}
