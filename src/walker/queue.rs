//! Work queue of target mailboxes
//!
//! The queue is filled once, before any worker starts, and then drained
//! with non-blocking receives. A worker that finds it empty is done: nothing
//! is ever pushed back while the run is in progress.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A top-level mailbox waiting to be walked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxTask {
    /// Root directory of the mailbox
    pub path: PathBuf,
}

impl MailboxTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Statistics for the work queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total tasks enqueued
    pub enqueued: AtomicU64,

    /// Total tasks dequeued
    pub dequeued: AtomicU64,
}

impl QueueStats {
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }
}

/// Multi-consumer queue of mailbox tasks
pub struct WorkQueue {
    sender: Sender<MailboxTask>,
    receiver: Receiver<MailboxTask>,
    stats: Arc<QueueStats>,
}

impl WorkQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Add a task
    pub fn push(&self, task: MailboxTask) {
        // The queue owns a receiver, so the channel cannot be disconnected.
        if self.sender.send(task).is_ok() {
            self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> WorkQueueReceiver {
        WorkQueueReceiver {
            receiver: self.receiver.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for taking tasks from the queue
#[derive(Clone)]
pub struct WorkQueueReceiver {
    receiver: Receiver<MailboxTask>,
    stats: Arc<QueueStats>,
}

impl WorkQueueReceiver {
    /// Take a task without blocking
    ///
    /// `None` means the queue is drained.
    pub fn try_recv(&self) -> Option<MailboxTask> {
        match self.receiver.try_recv() {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(task)
            }
            Err(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}
