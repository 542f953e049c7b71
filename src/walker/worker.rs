//! Worker thread logic
//!
//! Each worker:
//! - Takes top-level mailboxes from the work queue without blocking
//! - Walks the mailbox and its sub-folders
//! - Extracts matching attachments from every message
//! - Exits as soon as the queue is drained

use crate::counter::Counter;
use crate::error::WorkerError;
use crate::extract::Extractor;
use crate::maildir::Maildir;
use crate::walker::mailbox::walk;
use crate::walker::queue::{MailboxTask, WorkQueueReceiver};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Top-level mailboxes taken from the queue
    pub tasks: AtomicU64,

    /// Tasks whose root could not be opened
    pub errors: AtomicU64,
}

impl WorkerStats {
    fn record_task(&self) {
        self.tasks.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tasks(&self) -> u64 {
        self.tasks.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

/// A worker thread that drains the mailbox queue
pub struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        queue_rx: WorkQueueReceiver,
        extractor: Extractor,
        counter: Arc<Counter>,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("extract-{}", id))
            .spawn(move || worker_loop(id, queue_rx, extractor, counter, stats_clone))
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Shared handle to this worker's statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|panic| WorkerError::Panicked {
                id: self.id,
                message: panic_message(panic.as_ref()),
            }),
            None => Ok(()),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Worker thread panicked".into()
    }
}

/// Main worker loop
fn worker_loop(
    id: usize,
    queue_rx: WorkQueueReceiver,
    extractor: Extractor,
    counter: Arc<Counter>,
    stats: Arc<WorkerStats>,
) {
    debug!(worker = id, pid = std::process::id(), "Worker started");

    while let Some(task) = queue_rx.try_recv() {
        stats.record_task();
        process_mailbox(id, &task, &extractor, &counter, &stats);
    }

    debug!(worker = id, tasks = stats.tasks(), "Worker finished");
}

/// Walk one top-level mailbox
fn process_mailbox(
    id: usize,
    task: &MailboxTask,
    extractor: &Extractor,
    counter: &Counter,
    stats: &WorkerStats,
) {
    let mailbox = match Maildir::open(&task.path) {
        Ok(mailbox) => mailbox,
        Err(e) => {
            stats.record_error();
            warn!(worker = id, error = %e, "Mailbox skipped");
            return;
        }
    };

    debug!(worker = id, path = %task.path.display(), "Processing mailbox");
    walk(&mailbox, counter, |key, message| {
        extractor.extract(key, message);
    });
}

/// Sum task and error counts across workers
pub fn aggregate_stats(stats: &[Arc<WorkerStats>]) -> (u64, u64) {
    stats.iter().fold((0, 0), |(tasks, errors), s| {
        (tasks + s.tasks(), errors + s.errors())
    })
}

/// Join every worker, returning how many failed
pub fn join_all(workers: Vec<Worker>) -> u64 {
    let mut failures = 0;
    for worker in workers {
        if let Err(e) = worker.join() {
            failures += 1;
            warn!(error = %e, "Worker failed to join cleanly");
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::Field;
    use crate::walker::queue::WorkQueue;
    use regex::Regex;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_worker_drains_queue() {
        let dir = tempdir().unwrap();
        let mut queue_paths = Vec::new();
        for name in ["one", "two", "three"] {
            let cur = dir.path().join(name).join("cur");
            fs::create_dir_all(&cur).unwrap();
            fs::write(cur.join("m1"), "Message-Id: <m1@host>\r\n\r\nbody").unwrap();
            queue_paths.push(dir.path().join(name));
        }

        let queue = WorkQueue::new();
        for path in queue_paths {
            queue.push(MailboxTask::new(path));
        }

        let counter = Arc::new(Counter::new());
        let extractor = Extractor::new(
            dir.path().join("out"),
            Regex::new(".*").unwrap(),
            true,
            Arc::clone(&counter),
        );

        let worker = Worker::spawn(0, queue.receiver(), extractor, Arc::clone(&counter)).unwrap();
        let stats = worker.stats();
        worker.join().unwrap();

        assert!(queue.is_empty());
        assert_eq!(stats.tasks(), 3);
        assert_eq!(counter.get(Field::Mailboxes), 3);
        assert_eq!(counter.get(Field::Messages), 3);
    }

    #[test]
    fn test_join_all_counts_panicked_workers() {
        let queue = WorkQueue::new();
        let counter = Arc::new(Counter::new());
        let extractor = Extractor::new(
            "unused".into(),
            Regex::new(".*").unwrap(),
            true,
            Arc::clone(&counter),
        );
        let clean = Worker::spawn(0, queue.receiver(), extractor, Arc::clone(&counter)).unwrap();
        let panicking = Worker {
            id: 1,
            handle: Some(thread::spawn(|| panic!("boom"))),
            stats: Arc::new(WorkerStats::default()),
        };

        assert_eq!(join_all(vec![clean, panicking]), 1);
    }

    #[test]
    fn test_join_reports_panic_message() {
        let worker = Worker {
            id: 7,
            handle: Some(thread::spawn(|| panic!("boom"))),
            stats: Arc::new(WorkerStats::default()),
        };

        match worker.join() {
            Err(WorkerError::Panicked { id, message }) => {
                assert_eq!(id, 7);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected join result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_mailbox_is_an_error_not_a_panic() {
        let dir = tempdir().unwrap();
        let queue = WorkQueue::new();
        queue.push(MailboxTask::new(dir.path().join("gone")));

        let counter = Arc::new(Counter::new());
        let extractor = Extractor::new(
            dir.path().join("out"),
            Regex::new(".*").unwrap(),
            true,
            Arc::clone(&counter),
        );

        let worker = Worker::spawn(0, queue.receiver(), extractor, Arc::clone(&counter)).unwrap();
        let stats = worker.stats();
        worker.join().unwrap();

        assert_eq!(stats.errors(), 1);
        assert_eq!(counter.get(Field::Mailboxes), 0);
    }
}
