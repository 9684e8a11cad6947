use super::components::{ErrorDialog, ErrorScreen, FileView, Preview, SearchDialog};
use super::markdown::render_markdown;
use super::state::{HostState, SearchState, View};
use crate::session::{LinkSession, SharedSession};
use dioxus::prelude::*;
use markdown_linker_config::LinkConfig;
use markdown_linker_engine::workspace::SearchCandidate;
use markdown_linker_engine::{TargetKind, io};
use relative_path::RelativePathBuf;
use std::path::PathBuf;
use std::rc::Rc;

const PREVIEW_CSS: &str = include_str!("../assets/preview.css");

#[component]
pub fn App(workspace_path: PathBuf, markdown_file: RelativePathBuf, links: LinkConfig) -> Element {
    let session = use_hook(|| {
        LinkSession::open(&workspace_path, &links)
            .map(|session| SharedSession(Rc::new(session)))
            .map_err(|e| {
                log::error!("Failed to open workspace {}: {e:#}", workspace_path.display());
                format!("{e:#}")
            })
    });

    let content = match session {
        Ok(session) => rsx! {
            Workspace { session, workspace_path, markdown_file }
        },
        Err(message) => {
            let details = workspace_path.display().to_string();
            rsx! {
                ErrorScreen {
                    title: "Could not open workspace",
                    message,
                    details: Some(details),
                }
            }
        }
    };

    rsx! {
        style { {PREVIEW_CSS} }
        {content}
    }
}

#[component]
fn Workspace(
    session: SharedSession,
    workspace_path: PathBuf,
    markdown_file: RelativePathBuf,
) -> Element {
    let mut state = use_signal(|| HostState::new(workspace_path.clone()));
    let preview_html = use_hook(|| match io::read_file(&markdown_file, &workspace_path) {
        Ok(source) => render_markdown(&source),
        Err(e) => {
            log::error!("Error reading {markdown_file}: {e}");
            format!(
                r#"<p class="load-error">{}</p>"#,
                html_escape::encode_text(&e.to_string())
            )
        }
    });

    // Install the interceptor and route whatever it posts back
    use_future({
        let session = session.clone();
        move || {
            let session = session.clone();
            async move {
                let mut bridge = document::eval(&session.bridge_script());
                loop {
                    match bridge.recv::<(String, String)>().await {
                        Ok((channel, href)) => {
                            log::debug!("Preview posted '{href}' on channel '{channel}'");
                            session.deliver(&channel, &href);
                            state.write().apply_all(session.pump());
                        }
                        Err(e) => {
                            log::warn!("Link bridge closed: {e:?}");
                            break;
                        }
                    }
                }
            }
        }
    });

    use_drop({
        let session = session.clone();
        move || session.close()
    });

    let current = state.read().clone();
    let candidates = current
        .search
        .as_ref()
        .map(|search| session.candidates(search.kind, &search.query))
        .unwrap_or_default();

    let main = match current.view {
        View::File(file) => rsx! {
            FileView {
                file,
                on_back: move |_| state.write().show_preview(),
            }
        },
        View::Preview => rsx! {
            Preview { html: preview_html }
        },
    };

    rsx! {
        div {
            class: "app-container",
            div {
                class: "toolbar",
                span { class: "document-name", "{markdown_file}" }
                button {
                    class: "search-button",
                    onclick: move |_| {
                        state.write().search = Some(SearchState {
                            kind: TargetKind::All,
                            query: String::new(),
                        });
                    },
                    "Search Everywhere"
                }
            }
            div { class: "main-content", {main} }
            if let Some(search) = current.search {
                SearchDialog {
                    kind: search.kind,
                    query: search.query,
                    candidates,
                    on_query: move |query: String| {
                        if let Some(search) = state.write().search.as_mut() {
                            search.query = query;
                        }
                    },
                    on_select: {
                        let session = session.clone();
                        move |candidate: SearchCandidate| {
                            let requests = session.activate(&candidate);
                            let mut host = state.write();
                            host.close_search();
                            host.apply_all(requests);
                        }
                    },
                    on_close: move |_| state.write().close_search(),
                }
            }
            if let Some(error) = current.error {
                ErrorDialog {
                    title: error.title,
                    message: error.message,
                    on_close: move |_| state.write().dismiss_error(),
                }
            }
        }
    }
}
