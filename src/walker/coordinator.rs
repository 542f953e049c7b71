//! Extraction coordinator - orchestrates the parallel run
//!
//! The coordinator is responsible for:
//! - Validating targets and filling the work queue
//! - Spawning the worker pool
//! - Joining every worker before reporting
//! - Final statistics

use crate::config::ExtractConfig;
use crate::counter::{Counter, Totals};
use crate::error::{ExtractError, Result};
use crate::extract::Extractor;
use crate::walker::queue::{MailboxTask, WorkQueue};
use crate::walker::worker::{aggregate_stats, join_all, Worker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct ExtractResult {
    /// Final counter values
    pub totals: Totals,

    /// Targets accepted into the queue
    pub targets_queued: u64,

    /// Targets dropped because they are not directories
    pub targets_skipped: u64,

    /// Workers that did not finish cleanly
    pub worker_failures: u64,

    /// Wall-clock time from worker start to last join
    pub duration: Duration,
}

/// Progress information for display
#[derive(Debug, Clone, Default)]
pub struct ExtractProgress {
    pub totals: Totals,
    pub queue_size: usize,
    pub total_workers: usize,
    pub elapsed: Duration,
}

impl ExtractProgress {
    pub fn messages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.totals.messages as f64 / secs
        } else {
            0.0
        }
    }
}

/// Coordinates the parallel extraction
pub struct ExtractCoordinator {
    config: ExtractConfig,
    queue: WorkQueue,
    counter: Arc<Counter>,
}

impl ExtractCoordinator {
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            queue: WorkQueue::new(),
            counter: Arc::new(Counter::new()),
        }
    }

    /// Run to completion
    pub fn run(self) -> Result<ExtractResult> {
        let (queued, skipped) = self.enqueue_targets();

        info!(
            targets = queued,
            workers = self.config.worker_count,
            dry_run = self.config.dry_run,
            "Starting extraction"
        );

        let extractor = Extractor::new(
            self.config.output_dir.clone(),
            self.config.pattern.clone(),
            self.config.dry_run,
            Arc::clone(&self.counter),
        );

        let start = Instant::now();

        let mut workers = Vec::with_capacity(self.config.worker_count);
        for id in 0..self.config.worker_count {
            match Worker::spawn(
                id,
                self.queue.receiver(),
                extractor.clone(),
                Arc::clone(&self.counter),
            ) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    // Workers already running still hold the queue
                    join_all(workers);
                    return Err(ExtractError::Worker(e));
                }
            }
        }
        debug!(count = workers.len(), "Workers spawned");

        let stats: Vec<_> = workers.iter().map(|w| w.stats()).collect();
        let worker_failures = join_all(workers);

        let duration = start.elapsed();
        let (tasks, open_errors) = aggregate_stats(&stats);
        let totals = self.counter.snapshot();

        info!(
            mailboxes = totals.mailboxes,
            messages = totals.messages,
            attachments = totals.attachments,
            failures = totals.failures,
            duration_secs = duration.as_secs(),
            "Extraction completed"
        );
        debug!(tasks, open_errors, "Queue drained");

        Ok(ExtractResult {
            totals,
            targets_queued: queued,
            targets_skipped: skipped,
            worker_failures,
            duration,
        })
    }

    /// Run with a callback invoked periodically with live progress
    pub fn run_with_progress<F>(self, progress_callback: F) -> Result<ExtractResult>
    where
        F: Fn(ExtractProgress) + Send + 'static,
    {
        let start = Instant::now();
        let done = Arc::new(AtomicBool::new(false));
        let done_flag = Arc::clone(&done);
        let counter = Arc::clone(&self.counter);
        let queue_rx = self.queue.receiver();
        let total_workers = self.config.worker_count;

        let progress_handle = thread::spawn(move || {
            while !done_flag.load(Ordering::Relaxed) {
                progress_callback(ExtractProgress {
                    totals: counter.snapshot(),
                    queue_size: queue_rx.len(),
                    total_workers,
                    elapsed: start.elapsed(),
                });
                thread::sleep(Duration::from_millis(100));
            }
        });

        let result = self.run();

        done.store(true, Ordering::SeqCst);
        if progress_handle.join().is_err() {
            warn!("Progress thread panicked");
        }

        result
    }

    /// Queue every target that is an existing directory
    fn enqueue_targets(&self) -> (u64, u64) {
        let mut queued = 0;
        let mut skipped = 0;

        for target in &self.config.targets {
            if target.is_dir() {
                self.queue.push(MailboxTask::new(target.clone()));
                queued += 1;
            } else {
                skipped += 1;
                debug!(path = %target.display(), "Target is not a directory, dropped");
            }
        }

        (queued, skipped)
    }
}
