use crate::link::NavigationLink;
use crate::resolve::ResolveContext;
use crate::targets::{TargetDescriptor, TargetTable};
use crate::workspace::{NavigationService, SearchRequest};
use std::sync::Arc;

pub const UNRECOGNIZED_TARGET_TITLE: &str = "Unrecognized Link Target";

#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Widen class and symbol lookups beyond project scope
    pub include_libraries: bool,
}

/// What routing one link ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Lucky link resolved; carries the label of what was opened or run
    Jumped(String),
    /// Lucky link found nothing
    NoMatch,
    /// Search dialog requested with this seed text
    SearchOpened(String),
    /// Search dialog could not be opened, or no project is open
    SearchUnavailable,
    /// Action was not a known target; the diagnostic dialog was shown
    Unrecognized(String),
}

/// Turns clicked links into navigation. One per preview panel.
pub struct LinkRouter {
    service: Arc<dyn NavigationService>,
    targets: TargetTable,
    options: RouterOptions,
}

impl LinkRouter {
    pub fn new(service: Arc<dyn NavigationService>) -> Self {
        Self::with_options(service, RouterOptions::default())
    }

    pub fn with_options(service: Arc<dyn NavigationService>, options: RouterOptions) -> Self {
        Self {
            service,
            targets: TargetTable::new(),
            options,
        }
    }

    pub fn targets(&self) -> &TargetTable {
        &self.targets
    }

    /// Route one raw link string. Must run on the UI thread.
    pub fn route(&self, raw_link: &str) -> RouteOutcome {
        let link = match NavigationLink::parse(raw_link) {
            Ok(link) => link,
            Err(e) => {
                log::warn!("{e}");
                self.show_unrecognized_action(raw_link);
                return RouteOutcome::Unrecognized(raw_link.to_string());
            }
        };
        log::info!(
            "Parsed link: action={}, lucky={}, path={}, line_number={:?}",
            link.action,
            link.is_lucky,
            link.path,
            link.line_number
        );

        let Some(target) = self.targets.get(&link.action) else {
            log::warn!("Unrecognized action: {}", link.action);
            self.show_unrecognized_action(&link.action);
            return RouteOutcome::Unrecognized(link.action);
        };

        if link.is_lucky {
            self.jump(target, &link)
        } else {
            self.show_search_dialog(target, link.search_text())
        }
    }

    fn jump(&self, target: &TargetDescriptor, link: &NavigationLink) -> RouteOutcome {
        let context = ResolveContext {
            service: self.service.as_ref(),
            include_libraries: self.options.include_libraries,
        };
        match (target.lucky)(&context, &link.path, link.line_number) {
            Some(label) => {
                log::info!("Lucky result: {label}");
                RouteOutcome::Jumped(label)
            }
            None => {
                log::warn!(
                    "No result found for lucky action: {} with path: {}",
                    link.action,
                    link.path
                );
                RouteOutcome::NoMatch
            }
        }
    }

    fn show_search_dialog(&self, target: &TargetDescriptor, text: String) -> RouteOutcome {
        let Some(project) = self.service.active_project() else {
            return RouteOutcome::SearchUnavailable;
        };
        let request = SearchRequest {
            contributor_id: target.search_contributor_id.to_string(),
            action_id: target.action_id.to_string(),
            text,
        };
        match self.service.show_search(&project, &request) {
            Ok(()) => RouteOutcome::SearchOpened(request.text),
            Err(e) => {
                log::error!("Error showing search dialog: {e}");
                RouteOutcome::SearchUnavailable
            }
        }
    }

    fn show_unrecognized_action(&self, action: &str) {
        let available = self.targets.keys().collect::<Vec<_>>().join("\n");
        let message = format!(
            "'{action}' is not a recognized link target.\nAvailable targets are:\n{available}"
        );
        log::warn!("Unrecognized link target: {action}");
        self.service.show_error(UNRECOGNIZED_TARGET_TITLE, &message);
    }
}
