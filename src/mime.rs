//! Read-only view over a parsed MIME tree
//!
//! Wraps `mailparse` so the rest of the crate only sees the handful of
//! attributes attachment classification needs: main type, disposition
//! marker, filename and decoded payload.

use mailparse::{MailHeaderMap, ParsedMail};
use tracing::debug;

/// Header carrying the unique message identifier
pub const MESSAGE_ID_HEADER: &str = "Message-Id";

/// Deepest chain of embedded `message/rfc822` parts that is followed
pub const MAX_EMBEDDED_DEPTH: usize = 16;

/// A parsed email message
pub struct ParsedMessage<'a> {
    root: ParsedMail<'a>,
}

impl<'a> ParsedMessage<'a> {
    pub fn new(root: ParsedMail<'a>) -> Self {
        Self { root }
    }

    /// Value of the Message-Id header, if present
    pub fn message_id(&self) -> Option<String> {
        self.root.headers.get_first_value(MESSAGE_ID_HEADER)
    }

    /// Depth-first, pre-order walk over every part including the root
    ///
    /// The body of a `message/rfc822` part is parsed and walked right after
    /// the part itself, so attachments of forwarded mail are visited too.
    pub fn for_each_part<F>(&self, mut visit: F)
    where
        F: FnMut(&Part<'_, '_>),
    {
        walk_tree(&self.root, 0, &mut visit);
    }
}

fn walk_tree<F>(root: &ParsedMail<'_>, depth: usize, visit: &mut F)
where
    F: FnMut(&Part<'_, '_>),
{
    let mut stack = vec![root];
    while let Some(mail) = stack.pop() {
        let part = Part { mail };
        visit(&part);

        if part.is_embedded_message() && mail.subparts.is_empty() {
            walk_embedded(&part, depth, visit);
        }

        // Reverse so the first subpart is visited next.
        stack.extend(mail.subparts.iter().rev());
    }
}

fn walk_embedded<F>(part: &Part<'_, '_>, depth: usize, visit: &mut F)
where
    F: FnMut(&Part<'_, '_>),
{
    if depth >= MAX_EMBEDDED_DEPTH {
        debug!(depth, "Embedded message nesting too deep, not descending");
        return;
    }

    let body = match part.payload() {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, "Embedded message body not decodable");
            return;
        }
    };

    match mailparse::parse_mail(&body) {
        Ok(inner) => walk_tree(&inner, depth + 1, visit),
        Err(e) => debug!(error = %e, "Embedded message not parseable"),
    }
}

/// One node in a message's MIME tree
#[derive(Clone, Copy)]
pub struct Part<'p, 'a> {
    mail: &'p ParsedMail<'a>,
}

impl<'p, 'a> Part<'p, 'a> {
    /// Content main type, lower-cased ("multipart", "text", "application", ...)
    pub fn main_type(&self) -> String {
        let mimetype = &self.mail.ctype.mimetype;
        let main = mimetype.split('/').next().unwrap_or(mimetype.as_str());
        main.trim().to_ascii_lowercase()
    }

    /// Disposition token of the Content-Disposition header
    ///
    /// `None` when the header is absent. Parameters are dropped, so
    /// `inline; filename=a.png` yields `inline`.
    pub fn disposition(&self) -> Option<String> {
        let raw = self.mail.headers.get_first_value("Content-Disposition")?;
        let token = raw.split(';').next().unwrap_or("").trim();
        Some(token.to_ascii_lowercase())
    }

    /// Declared filename
    ///
    /// The `filename` disposition parameter, falling back to the `name`
    /// content-type parameter.
    pub fn filename(&self) -> Option<String> {
        let disposition = self.mail.get_content_disposition();
        disposition
            .params
            .get("filename")
            .or_else(|| self.mail.ctype.params.get("name"))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Whether the body is a complete message of its own
    pub fn is_embedded_message(&self) -> bool {
        self.mail.ctype.mimetype.eq_ignore_ascii_case("message/rfc822")
    }

    /// Body with the transfer encoding removed
    pub fn payload(&self) -> Result<Vec<u8>, mailparse::MailParseError> {
        self.mail.get_body_raw()
    }
}
