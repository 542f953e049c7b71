//! Error types for maildir-extract
//!
//! This module defines the error hierarchy that covers:
//! - Configuration and CLI errors
//! - Maildir store access errors
//! - Per-attachment extraction failures
//! - Worker thread errors
//!
//! Only configuration errors are fatal. Everything raised while walking a
//! mailbox is reported at the point of detection and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the maildir-extract application
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Filename pattern does not compile
    #[error("Invalid filename pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Output path error
    #[error("Invalid output directory '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },
}

/// Maildir store errors
#[derive(Error, Debug)]
pub enum MailboxError {
    /// Root is not a directory
    #[error("Not a mailbox directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// Directory listing failed
    #[error("Failed to read mailbox directory '{path}': {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Message file could not be read
    #[error("Failed to read message '{path}': {source}")]
    ReadMessageFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Message bytes could not be parsed as MIME
    #[error("Failed to parse message '{key}': {reason}")]
    ParseFailed { key: String, reason: String },
}

/// Per-attachment failures
#[derive(Error, Debug)]
pub enum AttachmentError {
    /// Declared filename is not usable on disk
    #[error("Unsafe attachment filename '{filename}' in message '{key}'")]
    UnsafeFilename { key: String, filename: String },

    /// Payload transfer encoding could not be decoded
    #[error("Failed to decode '{filename}' in message '{key}': {reason}")]
    DecodeFailed {
        key: String,
        filename: String,
        reason: String,
    },

    /// Destination directory could not be created
    #[error("Failed to create '{path}': {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Payload could not be written
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Worker thread could not be started
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },
}

/// Result type alias for ExtractError
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Result type alias for MailboxError
pub type MailboxResult<T> = std::result::Result<T, MailboxError>;

/// Result type alias for AttachmentError
pub type AttachmentResult<T> = std::result::Result<T, AttachmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err = WorkerError::SpawnFailed {
            id: 3,
            reason: "resource temporarily unavailable".into(),
        };
        let top: ExtractError = err.into();
        assert!(matches!(top, ExtractError::Worker(_)));
        assert_eq!(
            top.to_string(),
            "Worker error: Failed to spawn worker 3: resource temporarily unavailable"
        );
    }

    #[test]
    fn test_attachment_error_message() {
        let err = AttachmentError::UnsafeFilename {
            key: "1700000000.M1P2.host".into(),
            filename: "..".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unsafe attachment filename '..' in message '1700000000.M1P2.host'"
        );
    }
}
