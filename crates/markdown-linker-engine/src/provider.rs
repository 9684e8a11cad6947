//! Lifecycle glue between a preview panel and the link router.
//!
//! One [`LinkPreviewExtension`] is created per preview panel. It subscribes to
//! the panel's message pipe, forwards each message to the UI executor, and
//! publishes the interceptor script as a resource. Disposal unsubscribes and
//! turns any message still queued for the UI thread into a no-op.

use crate::executor::UiExecutor;
use crate::interceptor::{InterceptorScript, SCRIPT_MIME_TYPE, SCRIPT_RESOURCE};
use crate::pipe::{MessagePipe, Subscription};
use crate::router::{LinkRouter, RouterOptions};
use crate::workspace::NavigationService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Where the extension's scripts load relative to other preview extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionPriority {
    BeforeAll,
    AfterAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub content: Vec<u8>,
    pub mime_type: &'static str,
}

/// The parts of a preview panel the extension attaches to
#[derive(Clone, Default)]
pub struct PreviewPanel {
    pub id: String,
    /// Absent when the preview cannot talk back to the host
    pub pipe: Option<MessagePipe>,
}

pub struct LinkPreviewExtension {
    panel_id: String,
    script: InterceptorScript,
    subscription: Mutex<Option<Subscription>>,
    disposed: Arc<AtomicBool>,
}

impl LinkPreviewExtension {
    pub fn attach(
        panel: &PreviewPanel,
        router: Arc<LinkRouter>,
        executor: Arc<dyn UiExecutor>,
        script: InterceptorScript,
    ) -> Self {
        log::info!("Initializing link extension for panel: {}", panel.id);
        let disposed = Arc::new(AtomicBool::new(false));

        let subscription = panel.pipe.as_ref().map(|pipe| {
            let disposed = disposed.clone();
            pipe.subscribe(script.channel(), move |data: &str| {
                if disposed.load(Ordering::Acquire) {
                    return false;
                }
                let router = router.clone();
                let disposed = disposed.clone();
                let link = data.to_string();
                executor.invoke_later(Box::new(move || {
                    if disposed.load(Ordering::Acquire) {
                        log::debug!("Dropping link delivered after dispose: {link}");
                        return;
                    }
                    router.route(&link);
                }));
                true
            })
        });
        if subscription.is_none() {
            log::warn!("Panel {} has no message pipe; links will not be routed", panel.id);
        }

        Self {
            panel_id: panel.id.clone(),
            script,
            subscription: Mutex::new(subscription),
            disposed,
        }
    }

    /// Unsubscribe from the panel. Safe to call more than once.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        log::info!("Disposing link extension for panel: {}", self.panel_id);
        if let Some(subscription) = self
            .subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            subscription.unsubscribe();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub fn scripts(&self) -> &'static [&'static str] {
        &[SCRIPT_RESOURCE]
    }

    pub fn priority(&self) -> ExtensionPriority {
        ExtensionPriority::AfterAll
    }

    pub fn can_provide(&self, resource_name: &str) -> bool {
        self.scripts().contains(&resource_name)
    }

    pub fn load_resource(&self, resource_name: &str) -> Option<Resource> {
        (resource_name == SCRIPT_RESOURCE).then(|| Resource {
            content: self.script.render().into_bytes(),
            mime_type: SCRIPT_MIME_TYPE,
        })
    }
}

impl Drop for LinkPreviewExtension {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Creates one [`LinkPreviewExtension`], with its own router, per preview panel
pub struct LinkExtensionProvider {
    service: Arc<dyn NavigationService>,
    executor: Arc<dyn UiExecutor>,
    options: RouterOptions,
    script: InterceptorScript,
}

impl LinkExtensionProvider {
    pub fn new(
        service: Arc<dyn NavigationService>,
        executor: Arc<dyn UiExecutor>,
        options: RouterOptions,
        script: InterceptorScript,
    ) -> Self {
        Self {
            service,
            executor,
            options,
            script,
        }
    }

    pub fn create(&self, panel: &PreviewPanel) -> LinkPreviewExtension {
        log::info!("Creating link extension for panel: {}", panel.id);
        let router = Arc::new(LinkRouter::with_options(
            self.service.clone(),
            self.options.clone(),
        ));
        LinkPreviewExtension::attach(panel, router, self.executor.clone(), self.script.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::TaskQueue;
    use crate::tests::{create_test_file, create_test_workspace};
    use crate::workspace::{FsWorkspace, NavigationRequest, RequestSink};
    use std::sync::mpsc::Receiver;
    use tempfile::TempDir;

    struct Fixture {
        _workspace: TempDir,
        pipe: MessagePipe,
        queue: Arc<TaskQueue>,
        requests: Receiver<NavigationRequest>,
        extension: LinkPreviewExtension,
    }

    fn fixture() -> Fixture {
        let workspace = create_test_workspace();
        create_test_file(&workspace, "docs/readme.md", "# Readme");
        let (sink, requests) = RequestSink::channel();
        let fs = Arc::new(FsWorkspace::open(workspace.path(), sink).unwrap());
        let queue = Arc::new(TaskQueue::new());
        let provider = LinkExtensionProvider::new(
            fs,
            queue.clone(),
            RouterOptions::default(),
            InterceptorScript::default(),
        );
        let pipe = MessagePipe::new();
        let extension = provider.create(&PreviewPanel {
            id: "preview-1".to_string(),
            pipe: Some(pipe.clone()),
        });
        Fixture {
            _workspace: workspace,
            pipe,
            queue,
            requests,
            extension,
        }
    }

    #[test]
    fn test_message_routed_on_ui_thread_only() {
        let f = fixture();

        assert!(f.pipe.post("mdlink", "mdlink://jump-file/docs/readme.md"));
        assert!(f.requests.try_recv().is_err());

        assert_eq!(f.queue.run_pending(), 1);
        assert!(matches!(
            f.requests.try_recv().unwrap(),
            NavigationRequest::OpenFile { .. }
        ));
    }

    #[test]
    fn test_one_task_per_message() {
        let f = fixture();
        f.pipe.post("mdlink", "mdlink://jump-file/docs/readme.md");
        f.pipe.post("mdlink", "mdlink://jump-file/docs/readme.md#L2");

        assert_eq!(f.queue.run_pending(), 2);
        assert_eq!(f.requests.try_iter().count(), 2);
    }

    #[test]
    fn test_dispose_unsubscribes() {
        let f = fixture();
        assert_eq!(f.pipe.subscriber_count("mdlink"), 1);

        f.extension.dispose();

        assert_eq!(f.pipe.subscriber_count("mdlink"), 0);
        assert!(!f.pipe.post("mdlink", "mdlink://jump-file/docs/readme.md"));
        assert_eq!(f.queue.run_pending(), 0);
    }

    #[test]
    fn test_dispose_twice() {
        let f = fixture();
        f.extension.dispose();
        f.extension.dispose();
        assert!(f.extension.is_disposed());
    }

    #[test]
    fn test_queued_message_after_dispose_does_not_navigate() {
        let f = fixture();
        f.pipe.post("mdlink", "mdlink://jump-file/docs/readme.md");

        f.extension.dispose();

        assert_eq!(f.queue.run_pending(), 1);
        assert!(f.requests.try_recv().is_err());
    }

    #[test]
    fn test_drop_disposes() {
        let f = fixture();
        let Fixture {
            pipe, extension, ..
        } = f;
        drop(extension);
        assert_eq!(pipe.subscriber_count("mdlink"), 0);
    }

    #[test]
    fn test_panel_without_pipe() {
        let queue = Arc::new(TaskQueue::new());
        let workspace = create_test_workspace();
        let (sink, _requests) = RequestSink::channel();
        let fs = Arc::new(FsWorkspace::open(workspace.path(), sink).unwrap());
        let extension = LinkPreviewExtension::attach(
            &PreviewPanel {
                id: "no-pipe".to_string(),
                pipe: None,
            },
            Arc::new(LinkRouter::new(fs)),
            queue,
            InterceptorScript::default(),
        );
        extension.dispose();
    }

    #[test]
    fn test_script_resource() {
        let f = fixture();
        assert_eq!(f.extension.scripts(), &["mdlink/mdlink.js"]);
        assert_eq!(f.extension.priority(), ExtensionPriority::AfterAll);
        assert!(f.extension.can_provide("mdlink/mdlink.js"));
        assert!(!f.extension.can_provide("other.js"));

        let resource = f.extension.load_resource("mdlink/mdlink.js").unwrap();
        assert_eq!(resource.mime_type, "application/javascript");
        let script = String::from_utf8(resource.content).unwrap();
        assert!(script.contains("window.document.onclick"));
        assert!(f.extension.load_resource("other.js").is_none());
    }
}
