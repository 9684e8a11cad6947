//! What the window shows, driven by navigation requests from the router.

use markdown_linker_engine::workspace::Position;
use markdown_linker_engine::{NavigationRequest, TargetKind};
use std::path::{Path, PathBuf};

/// A file opened by a link or a search result
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedFile {
    pub path: PathBuf,
    /// Path shown in the header; workspace-relative when possible
    pub display_path: String,
    pub position: Option<Position>,
    pub content: Result<String, String>,
}

impl OpenedFile {
    pub fn load(root: &Path, path: PathBuf, position: Option<Position>) -> Self {
        let display_path = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .display()
            .to_string();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            log::error!("Error reading file {}: {e}", path.display());
            e.to_string()
        });
        Self {
            path,
            display_path,
            position,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Preview,
    File(OpenedFile),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub kind: TargetKind,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorState {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostState {
    root: PathBuf,
    pub view: View,
    pub search: Option<SearchState>,
    pub error: Option<ErrorState>,
}

impl HostState {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            view: View::Preview,
            search: None,
            error: None,
        }
    }

    pub fn apply(&mut self, request: NavigationRequest) {
        match request {
            NavigationRequest::OpenFile { path, position } => {
                log::info!("Opening {}", path.display());
                self.search = None;
                self.view = View::File(OpenedFile::load(&self.root, path, position));
            }
            NavigationRequest::ShowSearch(request) => {
                let kind = TargetKind::from_search_contributor_id(&request.contributor_id)
                    .unwrap_or(TargetKind::All);
                self.search = Some(SearchState {
                    kind,
                    query: request.text,
                });
            }
            NavigationRequest::ShowError { title, message } => {
                self.error = Some(ErrorState { title, message });
            }
        }
    }

    pub fn apply_all(&mut self, requests: impl IntoIterator<Item = NavigationRequest>) {
        for request in requests {
            self.apply(request);
        }
    }

    pub fn show_preview(&mut self) {
        self.view = View::Preview;
    }

    pub fn close_search(&mut self) {
        self.search = None;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
