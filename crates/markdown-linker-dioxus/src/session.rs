//! Wiring between the rendered preview and the link engine.
//!
//! The webview posts `(channel, href)` pairs through the Dioxus eval bridge.
//! They go into the [`MessagePipe`], the preview extension schedules routing
//! on the [`TaskQueue`], and [`LinkSession::pump`] runs that queue from the UI
//! task and hands back whatever navigation the router asked for.

use markdown_linker_config::LinkConfig;
use markdown_linker_engine::workspace::SearchCandidate;
use markdown_linker_engine::{
    FsWorkspace, InterceptorScript, LinkExtensionProvider, LinkPreviewExtension, MessagePipe,
    NavigationRequest, PreviewPanel, RequestSink, RouterOptions, TargetKind, TaskQueue,
};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// JS bridge handing intercepted links back to `Eval::recv`
pub const DIOXUS_BRIDGE: &str = "(channel, href) => dioxus.send([channel, href])";

const PANEL_ID: &str = "markdown-preview";

pub struct LinkSession {
    workspace: Arc<FsWorkspace>,
    requests: Receiver<NavigationRequest>,
    queue: Arc<TaskQueue>,
    pipe: MessagePipe,
    script: InterceptorScript,
    extension: LinkPreviewExtension,
}

impl LinkSession {
    pub fn open(workspace_path: &Path, links: &LinkConfig) -> anyhow::Result<Self> {
        let script = InterceptorScript::new(&links.scheme, &links.channel)?;
        let (sink, requests) = RequestSink::channel();
        let workspace = Arc::new(FsWorkspace::open(workspace_path, sink)?);
        let queue = Arc::new(TaskQueue::new());

        let provider = LinkExtensionProvider::new(
            workspace.clone(),
            queue.clone(),
            RouterOptions {
                include_libraries: links.include_libraries,
            },
            script.clone(),
        );
        let pipe = MessagePipe::new();
        let extension = provider.create(&PreviewPanel {
            id: PANEL_ID.to_string(),
            pipe: Some(pipe.clone()),
        });

        Ok(Self {
            workspace,
            requests,
            queue,
            pipe,
            script,
            extension,
        })
    }

    /// Interceptor script to evaluate in the webview
    pub fn bridge_script(&self) -> String {
        self.script.render_with_bridge(DIOXUS_BRIDGE)
    }

    /// Hand one message from the webview to the pipe
    pub fn deliver(&self, channel: &str, href: &str) -> bool {
        let delivered = self.pipe.post(channel, href);
        if !delivered {
            log::debug!("No subscriber on channel '{channel}' for {href}");
        }
        delivered
    }

    /// Run queued routing tasks and collect the navigation they produced
    pub fn pump(&self) -> Vec<NavigationRequest> {
        let ran = self.queue.run_pending();
        if ran > 0 {
            log::debug!("Ran {ran} queued link tasks");
        }
        self.requests.try_iter().collect()
    }

    pub fn candidates(&self, kind: TargetKind, query: &str) -> Vec<SearchCandidate> {
        self.workspace.candidates(kind, query)
    }

    /// Open or run a search row, returning the navigation it produced
    pub fn activate(&self, candidate: &SearchCandidate) -> Vec<NavigationRequest> {
        self.workspace.activate(candidate);
        self.pump()
    }

    pub fn close(&self) {
        self.extension.dispose();
    }
}

/// Shared handle usable as a component prop; equal only to itself
#[derive(Clone)]
pub struct SharedSession(pub Rc<LinkSession>);

impl PartialEq for SharedSession {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SharedSession {
    type Target = LinkSession;

    fn deref(&self) -> &LinkSession {
        &self.0
    }
}
