use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into while scanning a workspace
const SKIPPED_DIRS: &[&str] = &["target", "build", "out", "dist"];

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid workspace: {0}")]
    InvalidWorkspace(String),
}

/// Read a workspace file and return its content
pub fn read_file(relative_path: &RelativePath, workspace_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(workspace_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Scan for every file in the workspace, skipping hidden and build output directories.
/// Symlinked directories are not descended into.
pub fn scan_workspace_files(workspace_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_workspace_root(workspace_root)?;

    let walker = WalkDir::new(workspace_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| IoError::Io(e.into()))?;
        let file_type = entry.file_type();
        if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
}

pub fn validate_workspace_root(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidWorkspace(format!(
            "directory does not exist: {}",
            path.display()
        )));
    }

    Ok(())
}
