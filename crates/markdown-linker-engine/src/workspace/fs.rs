//! A [`NavigationService`] over a directory on disk.
//!
//! Lookups are served from a [`WorkspaceIndex`]. Navigation is not performed
//! here: it is emitted as [`NavigationRequest`]s for whichever UI owns the
//! receiving end.

use super::{
    ActionRef, ActionRegistry, FileRef, IndexEntry, InvocationContext, NavigationError,
    NavigationService, Position, Project, SearchRequest, WorkspaceIndex,
};
use crate::io::IoError;
use crate::targets::TargetKind;
use relative_path::RelativePathBuf;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};

/// Upper bound on entries returned by [`FsWorkspace::candidates`]
const MAX_CANDIDATES: usize = 50;

/// Something the UI should do on behalf of the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationRequest {
    OpenFile {
        path: PathBuf,
        position: Option<Position>,
    },
    ShowSearch(SearchRequest),
    ShowError {
        title: String,
        message: String,
    },
}

/// Sending half of the navigation request channel
#[derive(Debug, Clone)]
pub struct RequestSink {
    sender: Sender<NavigationRequest>,
}

impl RequestSink {
    pub fn channel() -> (Self, Receiver<NavigationRequest>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }

    pub fn emit(&self, request: NavigationRequest) -> Result<(), NavigationError> {
        self.sender
            .send(request)
            .map_err(|_| NavigationError::SurfaceClosed)
    }
}

/// One row in a search dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub kind: TargetKind,
    pub label: String,
    pub detail: String,
    pub target: CandidateTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateTarget {
    Location {
        path: PathBuf,
        position: Option<Position>,
    },
    Action(String),
}

pub struct FsWorkspace {
    root: PathBuf,
    project: RwLock<Option<Project>>,
    index: RwLock<WorkspaceIndex>,
    actions: ActionRegistry,
    sink: RequestSink,
}

impl FsWorkspace {
    /// Open `root` with only the built-in search actions registered
    pub fn open(root: &Path, sink: RequestSink) -> Result<Self, IoError> {
        Self::with_actions(root, sink, ActionRegistry::new())
    }

    /// Open `root` with extra actions; built-in search actions are added unless already present
    pub fn with_actions(
        root: &Path,
        sink: RequestSink,
        mut actions: ActionRegistry,
    ) -> Result<Self, IoError> {
        let index = WorkspaceIndex::build(root)?;
        register_search_actions(&mut actions);

        let name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        Ok(Self {
            root: root.to_path_buf(),
            project: RwLock::new(Some(Project {
                name,
                base_path: root.to_path_buf(),
            })),
            index: RwLock::new(index),
            actions,
            sink,
        })
    }

    /// Close the project; every later lookup behaves as if nothing is open
    pub fn close(&self) {
        log::info!("Closing workspace {}", self.root.display());
        *self.project.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Rebuild the indices from disk
    pub fn reindex(&self) -> Result<(), IoError> {
        let index = WorkspaceIndex::build(&self.root)?;
        *self.index.write().unwrap_or_else(|e| e.into_inner()) = index;
        Ok(())
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Entries of `kind` whose label contains `query`, ignoring case.
    ///
    /// A trailing `:<line>` on the query is dropped.
    pub fn candidates(&self, kind: TargetKind, query: &str) -> Vec<SearchCandidate> {
        let query = strip_line_suffix(query).to_lowercase();
        let index = self.index.read().unwrap_or_else(|e| e.into_inner());
        let matches = |text: &str| text.to_lowercase().contains(&query);

        let kinds: &[TargetKind] = match kind {
            TargetKind::All => &[
                TargetKind::Class,
                TargetKind::File,
                TargetKind::Symbol,
                TargetKind::Action,
            ],
            _ => std::slice::from_ref(&kind),
        };

        let mut found = Vec::new();
        for &kind in kinds {
            match kind {
                TargetKind::Class | TargetKind::Symbol => {
                    let entries: Box<dyn Iterator<Item = &IndexEntry> + '_> =
                        if kind == TargetKind::Class {
                            Box::new(index.classes())
                        } else {
                            Box::new(index.symbols())
                        };
                    found.extend(
                        entries
                            .filter(|entry| !entry.library && matches(&entry.qualified_name))
                            .map(|entry| SearchCandidate {
                                kind,
                                label: entry.qualified_name.clone(),
                                detail: entry.relative_path.to_string(),
                                target: CandidateTarget::Location {
                                    path: entry.file.clone(),
                                    position: Some(entry.position),
                                },
                            }),
                    );
                }
                TargetKind::File => found.extend(
                    index
                        .files()
                        .filter(|indexed| !indexed.library)
                        .filter_map(|indexed| {
                            let relative = indexed.file.relative_path.as_ref()?;
                            matches(relative.as_str()).then(|| SearchCandidate {
                                kind,
                                label: indexed.file.presentable_text(),
                                detail: relative.to_string(),
                                target: CandidateTarget::Location {
                                    path: indexed.file.path.clone(),
                                    position: None,
                                },
                            })
                        }),
                ),
                TargetKind::Action => found.extend(
                    self.actions
                        .actions()
                        .filter(|action| matches(&action.text) || matches(&action.id))
                        .map(|action| SearchCandidate {
                            kind,
                            label: action.text.clone(),
                            detail: action.id.clone(),
                            target: CandidateTarget::Action(action.id.clone()),
                        }),
                ),
                TargetKind::All => {}
            }
        }
        found.truncate(MAX_CANDIDATES);
        found
    }

    /// Open or run what a search row points at
    pub fn activate(&self, candidate: &SearchCandidate) {
        match &candidate.target {
            CandidateTarget::Location { path, position } => {
                if let Some(project) = self.active_project() {
                    self.open_file(&project, path, *position);
                }
            }
            CandidateTarget::Action(id) => {
                if let Some(action) = self.find_action(id) {
                    let context = InvocationContext {
                        place: "SearchDialog".to_string(),
                        project: self.active_project(),
                    };
                    self.perform_action(&action, &context);
                }
            }
        }
    }

    fn file_ref(&self, path: &Path) -> FileRef {
        let relative_path = path
            .strip_prefix(&self.root)
            .ok()
            .and_then(|relative| RelativePathBuf::from_path(relative).ok());
        FileRef {
            path: path.to_path_buf(),
            relative_path,
        }
    }

    fn emit(&self, request: NavigationRequest) {
        if let Err(e) = self.sink.emit(request) {
            log::error!("Dropping navigation request: {e}");
        }
    }
}

impl NavigationService for FsWorkspace {
    fn active_project(&self) -> Option<Project> {
        self.project
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn find_classes(
        &self,
        _project: &Project,
        name: &str,
        include_libraries: bool,
    ) -> Vec<IndexEntry> {
        self.index
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .classes_named(name, include_libraries)
    }

    fn find_file(&self, path: &Path) -> Option<FileRef> {
        path.is_file().then(|| self.file_ref(path))
    }

    fn files_by_name(&self, _project: &Project, file_name: &str) -> Vec<FileRef> {
        self.index
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .files_named(file_name)
    }

    fn find_symbols(
        &self,
        _project: &Project,
        name: &str,
        include_libraries: bool,
    ) -> Vec<IndexEntry> {
        self.index
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .symbols_named(name, include_libraries)
    }

    fn find_action(&self, id: &str) -> Option<ActionRef> {
        self.actions.get(id).map(|action| action.to_action_ref())
    }

    fn perform_action(&self, action: &ActionRef, context: &InvocationContext) {
        match self.actions.get(&action.id) {
            Some(registered) => {
                log::info!("Performing action {}", action.id);
                registered.perform(context, &self.sink);
            }
            None => log::warn!("Action {} is no longer registered", action.id),
        }
    }

    fn open_file(&self, _project: &Project, file: &Path, position: Option<Position>) {
        self.emit(NavigationRequest::OpenFile {
            path: file.to_path_buf(),
            position,
        });
    }

    fn show_search(
        &self,
        _project: &Project,
        request: &SearchRequest,
    ) -> Result<(), NavigationError> {
        if !self.actions.contains(&request.action_id) {
            return Err(NavigationError::UnknownAction(request.action_id.clone()));
        }
        self.sink
            .emit(NavigationRequest::ShowSearch(request.clone()))
    }

    fn show_error(&self, title: &str, message: &str) {
        self.emit(NavigationRequest::ShowError {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

/// Register an action per target kind that opens its search dialog empty
fn register_search_actions(actions: &mut ActionRegistry) {
    for kind in TargetKind::ALL {
        if actions.contains(kind.action_id()) {
            continue;
        }
        actions.register(kind.action_id(), kind.action_text(), move |_, sink| {
            let request = SearchRequest {
                contributor_id: kind.search_contributor_id().to_string(),
                action_id: kind.action_id().to_string(),
                text: String::new(),
            };
            if let Err(e) = sink.emit(NavigationRequest::ShowSearch(request)) {
                log::error!("Failed to open {kind} search: {e}");
            }
        });
    }
}

fn strip_line_suffix(query: &str) -> &str {
    match query.rsplit_once(':') {
        Some((head, line)) if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) => head,
        _ => query,
    }
}
