//! maildir-extract - Parallel Maildir Attachment Extractor
//!
//! Scans Maildir stores, picks out attachments whose filenames match a
//! pattern, and copies them to an output directory. Independent mailboxes
//! are processed in parallel by a fixed pool of worker threads.
//!
//! # Features
//!
//! - **Recursive Traversal**: Nested Maildir++ sub-folders are walked and
//!   counted individually. Folder loops are detected and skipped.
//!
//! - **Parallel Workers**: One worker per CPU core by default, each draining
//!   a shared queue of top-level mailboxes.
//!
//! - **Dry Run**: Classification and counting without touching the disk.
//!
//! # Architecture
//!
//! ```text
//! target dirs ──► WorkQueue ──► Worker 1..N ──► walk(mailbox)
//!                                                  │
//!                                                  ▼
//!                                   Extractor per message (MIME parts)
//!                                                  │
//!                                                  ▼
//!                              <output>/<message key>/<filename>
//! ```
//!
//! # Example
//!
//! ```bash
//! # Count PDF attachments without writing anything
//! maildir-extract -n -v -p '\.pdf$' ~/Maildir
//!
//! # Extract everything from two stores into ./attachments
//! maildir-extract ~/Maildir ~/Archive
//! ```

pub mod config;
pub mod counter;
pub mod error;
pub mod extract;
pub mod maildir;
pub mod mime;
pub mod progress;
pub mod walker;

pub use config::{CliArgs, ExtractConfig};
pub use counter::{Counter, Field, Totals};
pub use error::{ExtractError, Result};
pub use extract::{ExtractOutcome, Extractor};
pub use maildir::{Maildir, Message};
pub use walker::{ExtractCoordinator, ExtractProgress, ExtractResult};
