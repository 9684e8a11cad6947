//! Moving work onto the UI thread.
//!
//! Messages from the preview arrive on whatever thread the host delivers
//! them on. Navigation and dialogs are UI-thread only, so the router never
//! runs inline: it is handed to a [`UiExecutor`] and run from there.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait UiExecutor: Send + Sync {
    /// Schedule `task` to run later on the UI thread
    fn invoke_later(&self, task: Task);
}

/// A queue of tasks drained by the UI thread with [`TaskQueue::run_pending`]
pub struct TaskQueue {
    sender: Mutex<Sender<Task>>,
    receiver: Mutex<Receiver<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender: Mutex::new(sender),
            receiver: Mutex::new(receiver),
        }
    }

    /// Run every queued task in submission order; call from the UI thread only.
    ///
    /// Returns how many tasks ran. Tasks queued while draining run in the same call.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            // Lock only long enough to take one task so tasks may enqueue more
            let next = self
                .receiver
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .try_recv();
            match next {
                Ok(task) => {
                    task();
                    ran += 1;
                }
                Err(_) => return ran,
            }
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UiExecutor for TaskQueue {
    fn invoke_later(&self, task: Task) {
        // The receiver lives as long as self, so sending cannot fail
        let _ = self
            .sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .send(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_tasks_wait_for_run_pending() {
        let queue = TaskQueue::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = counter.clone();
            queue.invoke_later(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(queue.run_pending(), 3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(queue.run_pending(), 0);
    }

    #[test]
    fn test_tasks_from_other_threads() {
        let queue = Arc::new(TaskQueue::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let handle = std::thread::spawn({
            let queue = queue.clone();
            let order = order.clone();
            move || {
                for i in 0..5 {
                    let order = order.clone();
                    queue.invoke_later(Box::new(move || order.lock().unwrap().push(i)));
                }
            }
        });
        handle.join().unwrap();

        queue.run_pending();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_task_may_schedule_more_work() {
        let queue = Arc::new(TaskQueue::new());
        let counter = Arc::new(AtomicUsize::new(0));

        queue.invoke_later(Box::new({
            let queue = queue.clone();
            let counter = counter.clone();
            move || {
                let counter = counter.clone();
                queue.invoke_later(Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }));
            }
        }));

        assert_eq!(queue.run_pending(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
