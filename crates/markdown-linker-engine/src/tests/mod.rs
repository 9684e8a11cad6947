//! Shared fixtures for unit tests

use std::path::PathBuf;
use tempfile::TempDir;

pub fn create_test_workspace() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Write `content` to `relative` under the workspace, creating parent directories
pub fn create_test_file(workspace: &TempDir, relative: &str, content: &str) -> PathBuf {
    let path = workspace.path().join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
