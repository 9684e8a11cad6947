//! The navigation service the router resolves links against.
//!
//! The router never touches indices, editors or dialogs directly. Everything
//! it needs from the host goes through [`NavigationService`]; [`FsWorkspace`]
//! is the filesystem-backed implementation used by the desktop host and the
//! tests.

pub mod actions;
pub mod fs;
pub mod index;

pub use actions::{ActionFn, ActionRegistry, RegisteredAction};
pub use fs::{CandidateTarget, FsWorkspace, NavigationRequest, RequestSink, SearchCandidate};
pub use index::{IndexEntry, IndexedFile, WorkspaceIndex};

use relative_path::RelativePathBuf;
use std::path::{Path, PathBuf};

/// The project a link is resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub base_path: PathBuf,
}

/// Zero-based editor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A file known to the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub path: PathBuf,
    pub relative_path: Option<RelativePathBuf>,
}

impl FileRef {
    /// Label shown to the user: the file name
    pub fn presentable_text(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A registered action as seen by the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRef {
    pub id: String,
    pub text: String,
}

/// Context an action is invoked with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// Where the invocation came from; empty for link-driven invocations
    pub place: String,
    pub project: Option<Project>,
}

/// Request to open the generic search dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub contributor_id: String,
    pub action_id: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Action not registered: {0}")]
    UnknownAction(String),
    #[error("Navigation surface is closed")]
    SurfaceClosed,
}

/// Host operations consumed by the link router.
///
/// Called on the UI thread only. Lookups are synchronous and expected to be
/// served from in-memory indices.
pub trait NavigationService: Send + Sync {
    /// The currently open project, if any
    fn active_project(&self) -> Option<Project>;

    /// Classes whose simple or (partially) qualified name matches `name`
    fn find_classes(&self, project: &Project, name: &str, include_libraries: bool)
    -> Vec<IndexEntry>;

    /// A file at exactly `path`, if it exists
    fn find_file(&self, path: &Path) -> Option<FileRef>;

    /// Files named `file_name` anywhere in project scope
    fn files_by_name(&self, project: &Project, file_name: &str) -> Vec<FileRef>;

    /// Symbols (functions, methods) named `name`
    fn find_symbols(&self, project: &Project, name: &str, include_libraries: bool)
    -> Vec<IndexEntry>;

    fn find_action(&self, id: &str) -> Option<ActionRef>;

    fn perform_action(&self, action: &ActionRef, context: &InvocationContext);

    /// Open `file`, at `position` when given, otherwise at its default location
    fn open_file(&self, project: &Project, file: &Path, position: Option<Position>);

    fn show_search(&self, project: &Project, request: &SearchRequest)
    -> Result<(), NavigationError>;

    /// Blocking error dialog
    fn show_error(&self, title: &str, message: &str);
}
