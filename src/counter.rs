//! Shared run counters
//!
//! One `Counter` is created by the coordinator and handed to every worker
//! behind an `Arc`. Each field is an independent atomic, so concurrent
//! increments from different workers are never lost.

use std::sync::atomic::{AtomicU64, Ordering};

/// A named counter field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Mailboxes (including nested folders) walked
    Mailboxes,
    /// Messages carrying a Message-Id
    Messages,
    /// Attachments whose filename matched the pattern
    Attachments,
    /// Attachments that matched but could not be written
    Failures,
    /// Payload bytes written to disk
    Bytes,
}

/// Aggregate metrics shared by all workers
#[derive(Debug, Default)]
pub struct Counter {
    mailboxes: AtomicU64,
    messages: AtomicU64,
    attachments: AtomicU64,
    failures: AtomicU64,
    bytes: AtomicU64,
}

/// Plain copy of counter values for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub mailboxes: u64,
    pub messages: u64,
    pub attachments: u64,
    pub failures: u64,
    pub bytes: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, field: Field) -> &AtomicU64 {
        match field {
            Field::Mailboxes => &self.mailboxes,
            Field::Messages => &self.messages,
            Field::Attachments => &self.attachments,
            Field::Failures => &self.failures,
            Field::Bytes => &self.bytes,
        }
    }

    /// Add `delta` to a field
    pub fn add(&self, field: Field, delta: u64) {
        self.slot(field).fetch_add(delta, Ordering::Relaxed);
    }

    /// Current value of a field
    ///
    /// Exact once all workers have been joined.
    pub fn get(&self, field: Field) -> u64 {
        self.slot(field).load(Ordering::Relaxed)
    }

    pub fn record_mailbox(&self) {
        self.add(Field::Mailboxes, 1);
    }

    pub fn record_message(&self) {
        self.add(Field::Messages, 1);
    }

    pub fn record_attachment(&self) {
        self.add(Field::Attachments, 1);
    }

    pub fn record_failure(&self) {
        self.add(Field::Failures, 1);
    }

    pub fn record_bytes(&self, bytes: u64) {
        self.add(Field::Bytes, bytes);
    }

    /// Read all fields at once
    pub fn snapshot(&self) -> Totals {
        Totals {
            mailboxes: self.get(Field::Mailboxes),
            messages: self.get(Field::Messages),
            attachments: self.get(Field::Attachments),
            failures: self.get(Field::Failures),
            bytes: self.get(Field::Bytes),
        }
    }
}
