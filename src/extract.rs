//! Attachment classification and extraction
//!
//! Every part of a message, including the root, is checked. A part is a
//! candidate attachment when its main type is neither `multipart` nor `text`
//! and it carries a Content-Disposition other than `inline`. Parts without
//! any disposition are never candidates.
//!
//! Candidates whose filename contains a match for the configured pattern are
//! counted and, outside dry-run mode, written to
//! `<output>/<message key>/<filename>`.

use crate::counter::Counter;
use crate::error::{AttachmentError, AttachmentResult};
use crate::mime::{ParsedMessage, Part};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-message extraction results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOutcome {
    /// Parts that matched the pattern
    pub matched: u64,

    /// Parts written to disk
    pub written: u64,

    /// Parts that matched but could not be written
    pub failed: u64,

    /// Payload bytes written
    pub bytes: u64,
}

/// Whether a part qualifies as an attachment, ignoring its filename
pub fn is_candidate(part: &Part<'_, '_>) -> bool {
    let main_type = part.main_type();
    if main_type == "multipart" || main_type == "text" {
        return false;
    }
    match part.disposition() {
        Some(disposition) => disposition != "inline",
        None => false,
    }
}

/// Final path component of a declared filename
///
/// Returns `None` when nothing usable is left.
pub fn safe_filename(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    match base {
        "" | "." | ".." => None,
        _ => Some(base),
    }
}

/// Extracts matching attachments from messages
#[derive(Debug, Clone)]
pub struct Extractor {
    output_dir: PathBuf,
    pattern: Regex,
    dry_run: bool,
    counter: Arc<Counter>,
}

impl Extractor {
    pub fn new(output_dir: PathBuf, pattern: Regex, dry_run: bool, counter: Arc<Counter>) -> Self {
        Self {
            output_dir,
            pattern,
            dry_run,
            counter,
        }
    }

    /// Process every part of one message
    ///
    /// Write failures are logged and counted, never returned.
    pub fn extract(&self, key: &str, message: &ParsedMessage<'_>) -> ExtractOutcome {
        let mut outcome = ExtractOutcome::default();
        message.for_each_part(|part| self.extract_part(key, part, &mut outcome));
        outcome
    }

    fn extract_part(&self, key: &str, part: &Part<'_, '_>, outcome: &mut ExtractOutcome) {
        if !is_candidate(part) {
            return;
        }

        let Some(filename) = part.filename() else {
            debug!(key = %key, "Attachment without filename skipped");
            return;
        };

        if !self.pattern.is_match(&filename) {
            return;
        }

        self.counter.record_attachment();
        outcome.matched += 1;
        info!(key = %key, "{}", filename);

        if self.dry_run {
            return;
        }

        match self.save(key, &filename, part) {
            Ok(bytes) => {
                self.counter.record_bytes(bytes);
                outcome.written += 1;
                outcome.bytes += bytes;
            }
            Err(e) => {
                self.counter.record_failure();
                outcome.failed += 1;
                warn!(key = %key, filename = %filename, error = %e, "Attachment not saved");
            }
        }
    }

    /// Write one attachment payload, returning the byte count
    fn save(&self, key: &str, filename: &str, part: &Part<'_, '_>) -> AttachmentResult<u64> {
        let name = safe_filename(filename).ok_or_else(|| AttachmentError::UnsafeFilename {
            key: key.to_string(),
            filename: filename.to_string(),
        })?;

        let payload = part.payload().map_err(|e| AttachmentError::DecodeFailed {
            key: key.to_string(),
            filename: filename.to_string(),
            reason: e.to_string(),
        })?;

        let destination = self.output_dir.join(key);
        // create_dir_all succeeds if another worker created it first
        fs::create_dir_all(&destination).map_err(|source| AttachmentError::CreateDirFailed {
            path: destination.clone(),
            source,
        })?;

        let path = destination.join(name);
        fs::write(&path, &payload).map_err(|source| AttachmentError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = payload.len(), "Attachment written");
        Ok(payload.len() as u64)
    }
}
