//! Named message channels between the preview surface and the host.
//!
//! The preview posts string payloads on a channel name; the host subscribes
//! handlers per name. A subscription is an RAII handle: dropping it (or
//! calling [`Subscription::unsubscribe`]) removes the handler.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Receives one payload; returns whether it was handled
pub type Handler = Arc<dyn Fn(&str) -> bool + Send + Sync>;

type Channels = HashMap<String, Vec<(u64, Handler)>>;

#[derive(Default)]
struct PipeInner {
    channels: Mutex<Channels>,
    next_id: AtomicU64,
}

#[derive(Clone, Default)]
pub struct MessagePipe {
    inner: Arc<PipeInner>,
}

impl MessagePipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        channel: &str,
        handler: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .channels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(channel.to_string())
            .or_default()
            .push((id, Arc::new(handler)));

        Subscription {
            pipe: Arc::downgrade(&self.inner),
            channel: channel.to_string(),
            id,
        }
    }

    /// Deliver `data` to every handler on `channel`; true if any handled it
    pub fn post(&self, channel: &str, data: &str) -> bool {
        // Handlers run without the lock held so they can subscribe or unsubscribe
        let handlers: Vec<Handler> = self
            .inner
            .channels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(channel)
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        if handlers.is_empty() {
            log::debug!("No subscribers on channel '{channel}'");
        }

        let mut handled = false;
        for handler in handlers {
            handled |= handler(data);
        }
        handled
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.inner
            .channels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(channel)
            .map_or(0, Vec::len)
    }
}

/// Handle for one subscribed handler; unsubscribes when dropped
#[must_use = "dropping a subscription unsubscribes it"]
pub struct Subscription {
    pipe: Weak<PipeInner>,
    channel: String,
    id: u64,
}

impl Subscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn unsubscribe(self) {}

    fn remove(&self) {
        let Some(pipe) = self.pipe.upgrade() else {
            return;
        };
        let mut channels = pipe.channels.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handlers) = channels.get_mut(&self.channel) {
            handlers.retain(|(id, _)| *id != self.id);
            if handlers.is_empty() {
                channels.remove(&self.channel);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
