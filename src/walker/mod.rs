//! Parallel mailbox walker
//!
//! ```text
//!                  ┌──────────────────────────┐
//!                  │   ExtractCoordinator     │
//!                  │  - validates targets     │
//!                  │  - fills the work queue  │
//!                  └────────────┬─────────────┘
//!                               │
//!                  ┌────────────▼─────────────┐
//!                  │  Work Queue (crossbeam)  │
//!                  └────────────┬─────────────┘
//!       ┌───────────────────────┼───────────────────────┐
//!       │                       │                       │
//! ┌─────▼─────┐           ┌─────▼─────┐           ┌─────▼─────┐
//! │ Worker 1  │           │ Worker 2  │           │ Worker N  │
//! │ walk      │           │ walk      │           │ walk      │
//! │ extract   │           │ extract   │           │ extract   │
//! └─────┬─────┘           └─────┬─────┘           └─────┬─────┘
//!       └───────────────────────┼───────────────────────┘
//!                               ▼
//!                     Shared Counter (atomics)
//! ```

pub mod coordinator;
pub mod mailbox;
pub mod queue;
pub mod worker;

pub use coordinator::{ExtractCoordinator, ExtractProgress, ExtractResult};
pub use mailbox::walk;
pub use queue::{MailboxTask, WorkQueue};
