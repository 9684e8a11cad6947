//! Direct ("lucky") resolution of a link path to a single target.
//!
//! Every resolver returns `None` when nothing matched or when no project is
//! open; none of them fail loudly.

use crate::workspace::{FileRef, InvocationContext, NavigationService, Position, Project};
use std::path::Path;

/// What a resolver needs from the router
pub struct ResolveContext<'a> {
    pub service: &'a dyn NavigationService,
    /// Widen class and symbol lookups beyond project scope
    pub include_libraries: bool,
}

impl<'a> ResolveContext<'a> {
    pub fn new(service: &'a dyn NavigationService) -> Self {
        Self {
            service,
            include_libraries: false,
        }
    }
}

/// Resolve `path` as a class name and open its file
pub fn resolve_class(
    context: &ResolveContext<'_>,
    path: &str,
    line_number: Option<u32>,
) -> Option<String> {
    let service = context.service;
    let project = service.active_project()?;

    let class = service
        .find_classes(&project, path, context.include_libraries)
        .into_iter()
        .next()?;

    navigate_to_file_with_line(service, &project, &class.file, line_number);
    Some(class.qualified_name)
}

/// Resolve `path` as a file: workspace-relative, then absolute, then by file name
pub fn resolve_file(
    context: &ResolveContext<'_>,
    path: &str,
    line_number: Option<u32>,
) -> Option<String> {
    let service = context.service;
    let project = service.active_project()?;

    let file = find_file(service, &project, path)?;
    navigate_to_file_with_line(service, &project, &file.path, line_number);
    Some(file.presentable_text())
}

fn find_file(service: &dyn NavigationService, project: &Project, path: &str) -> Option<FileRef> {
    if !path.is_empty() {
        if let Some(file) = service.find_file(&project.base_path.join(path)) {
            return Some(file);
        }
        let absolute = Path::new(path);
        if absolute.is_absolute()
            && let Some(file) = service.find_file(absolute)
        {
            return Some(file);
        }
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    if file_name.is_empty() {
        return None;
    }
    service
        .files_by_name(project, file_name)
        .into_iter()
        .next()
}

/// Resolve `path` as a symbol name and navigate to its declaration
pub fn resolve_symbol(
    context: &ResolveContext<'_>,
    path: &str,
    _line_number: Option<u32>,
) -> Option<String> {
    let service = context.service;
    let project = service.active_project()?;

    let symbol = service
        .find_symbols(&project, path, context.include_libraries)
        .into_iter()
        .next()?;

    log::debug!(
        "Navigating to symbol '{}' in {}",
        symbol.qualified_name,
        symbol.file.display()
    );
    service.open_file(&project, &symbol.file, Some(symbol.position));
    Some(symbol.name)
}

/// Resolve `path` as an action id and run it
pub fn resolve_action(
    context: &ResolveContext<'_>,
    path: &str,
    _line_number: Option<u32>,
) -> Option<String> {
    let service = context.service;
    let project = service.active_project()?;
    let action = service.find_action(path)?;

    let invocation = InvocationContext {
        place: String::new(),
        project: Some(project),
    };
    service.perform_action(&action, &invocation);
    Some(action.text)
}

/// Try class, file, symbol, then action; first hit wins
pub fn resolve_all(
    context: &ResolveContext<'_>,
    path: &str,
    line_number: Option<u32>,
) -> Option<String> {
    const ORDER: [crate::targets::LuckyResolver; 4] =
        [resolve_class, resolve_file, resolve_symbol, resolve_action];

    ORDER
        .iter()
        .find_map(|resolver| resolver(context, path, line_number))
}

/// Open `file` at a 1-based `line_number`, or at its default location.
///
/// This is the one place a link's 1-based line becomes a 0-based position.
pub fn navigate_to_file_with_line(
    service: &dyn NavigationService,
    project: &Project,
    file: &Path,
    line_number: Option<u32>,
) {
    match line_number {
        Some(line) if line > 0 => {
            log::debug!(
                "Navigating to '{}' at line {line} (0-based {})",
                file.display(),
                line - 1
            );
            service.open_file(project, file, Some(Position::new(line - 1, 0)));
            log::info!("Navigated to {} at line {line}", file.display());
        }
        _ => {
            log::debug!("Navigating to '{}' without a line number", file.display());
            service.open_file(project, file, None);
            log::info!("Navigated to {} (default location)", file.display());
        }
    }
}
