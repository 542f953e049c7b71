//! Maildir store access
//!
//! A Maildir keeps one message per file. Two directories hold messages:
//! - `new/`: delivered but not yet seen
//! - `cur/`: seen by a client
//!
//! `tmp/` holds deliveries in progress and is never read.
//!
//! Filenames follow `<unique-id>:2,<flags>`. The part before the colon is the
//! message key. Sub-folders are dot-prefixed directories inside the store
//! root (`.Sent`, `.Archive`), each a Maildir of its own.

use crate::error::{MailboxError, MailboxResult};
use crate::mime::ParsedMessage;
use std::fs;
use std::path::{Path, PathBuf};

/// Message directories, in iteration order
const MESSAGE_DIRS: [&str; 2] = ["new", "cur"];

/// Separator between the unique name and the info section
const INFO_SEPARATOR: char = ':';

/// Handle to a directory-backed mailbox
#[derive(Debug, Clone)]
pub struct Maildir {
    root: PathBuf,
}

/// Location of one message file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    /// Unique name, without the info suffix
    pub key: String,

    /// Full path to the message file
    pub path: PathBuf,
}

impl Maildir {
    /// Open an existing mailbox directory
    pub fn open(path: impl Into<PathBuf>) -> MailboxResult<Self> {
        let root = path.into();
        if !root.is_dir() {
            return Err(MailboxError::NotADirectory { path: root });
        }
        Ok(Self { root })
    }

    /// Root path of the store
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// List message files, `new/` first, each directory sorted by name
    ///
    /// A missing `new/` or `cur/` directory is treated as empty.
    pub fn entries(&self) -> MailboxResult<Vec<MessageEntry>> {
        let mut entries = Vec::new();

        for sub in MESSAGE_DIRS {
            let dir = self.root.join(sub);
            if !dir.is_dir() {
                continue;
            }

            let mut batch = Vec::new();
            for item in read_dir(&dir)? {
                let item = item.map_err(|source| MailboxError::ReadDirFailed {
                    path: dir.clone(),
                    source,
                })?;
                let path = item.path();
                if !path.is_file() {
                    continue;
                }
                if let Some(key) = message_key(&path) {
                    batch.push(MessageEntry { key, path });
                }
            }
            batch.sort_by(|a, b| a.path.cmp(&b.path));
            entries.extend(batch);
        }

        Ok(entries)
    }

    /// Iterate `(key, message)` pairs, reading each file on demand
    pub fn messages(&self) -> MailboxResult<Messages> {
        Ok(Messages {
            entries: self.entries()?.into_iter(),
        })
    }

    /// Child mailboxes (dot-prefixed directories in the store root)
    pub fn folders(&self) -> MailboxResult<Vec<Maildir>> {
        let mut folders = Vec::new();

        for item in read_dir(&self.root)? {
            let item = item.map_err(|source| MailboxError::ReadDirFailed {
                path: self.root.clone(),
                source,
            })?;
            let name = item.file_name();
            let name = name.to_string_lossy();
            if name.len() > 1 && name.starts_with('.') && name != ".." {
                let path = item.path();
                if path.is_dir() {
                    folders.push(Maildir { root: path });
                }
            }
        }

        folders.sort_by(|a, b| a.root.cmp(&b.root));
        Ok(folders)
    }
}

fn read_dir(dir: &Path) -> MailboxResult<fs::ReadDir> {
    fs::read_dir(dir).map_err(|source| MailboxError::ReadDirFailed {
        path: dir.to_path_buf(),
        source,
    })
}

/// Derive the message key from a message file path
///
/// Hidden files are not messages. Names that are not valid UTF-8 are
/// converted lossily.
pub fn message_key(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let name = name.as_ref();
    if name.starts_with('.') {
        return None;
    }
    let key = name.split(INFO_SEPARATOR).next().unwrap_or(name);
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Iterator returned by [`Maildir::messages`]
pub struct Messages {
    entries: std::vec::IntoIter<MessageEntry>,
}

impl Iterator for Messages {
    type Item = MailboxResult<(String, Message)>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        Some(
            fs::read(&entry.path)
                .map(|raw| (entry.key, Message::from_bytes(raw)))
                .map_err(|source| MailboxError::ReadMessageFailed {
                    path: entry.path,
                    source,
                }),
        )
    }
}

/// Raw message contents
#[derive(Debug, Clone)]
pub struct Message {
    raw: Vec<u8>,
}

impl Message {
    pub fn from_bytes(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Parse headers and the MIME tree
    pub fn parse(&self, key: &str) -> MailboxResult<ParsedMessage<'_>> {
        mailparse::parse_mail(&self.raw)
            .map(ParsedMessage::new)
            .map_err(|e| MailboxError::ParseFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_message(dir: &Path, name: &str, body: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_message_key() {
        assert_eq!(
            message_key(Path::new("/m/cur/1700.M1P2.host:2,S")).as_deref(),
            Some("1700.M1P2.host")
        );
        assert_eq!(
            message_key(Path::new("/m/new/1700.M1P2.host")).as_deref(),
            Some("1700.M1P2.host")
        );
        assert_eq!(message_key(Path::new("/m/cur/.hidden")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_message_key_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.M1.host:2,S");
        let key = message_key(&Path::new("/m/cur").join(name)).unwrap();
        assert_eq!(key, "caf\u{FFFD}.M1.host");
    }

    #[test]
    fn test_open_requires_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();

        assert!(Maildir::open(dir.path()).is_ok());
        assert!(matches!(
            Maildir::open(&file),
            Err(MailboxError::NotADirectory { .. })
        ));
        assert!(Maildir::open(dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_entries_order_and_tmp_ignored() {
        let dir = tempdir().unwrap();
        write_message(&dir.path().join("cur"), "b:2,S", "Subject: b\r\n\r\n");
        write_message(&dir.path().join("cur"), "a:2,", "Subject: a\r\n\r\n");
        write_message(&dir.path().join("new"), "c", "Subject: c\r\n\r\n");
        write_message(&dir.path().join("tmp"), "d", "Subject: d\r\n\r\n");

        let mailbox = Maildir::open(dir.path()).unwrap();
        let keys: Vec<String> = mailbox.entries().unwrap().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_missing_message_dirs_are_empty() {
        let dir = tempdir().unwrap();
        let mailbox = Maildir::open(dir.path()).unwrap();
        assert!(mailbox.entries().unwrap().is_empty());
        assert!(mailbox.folders().unwrap().is_empty());
    }

    #[test]
    fn test_folders() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".Sent/cur")).unwrap();
        fs::create_dir_all(dir.path().join(".Archive")).unwrap();
        fs::create_dir_all(dir.path().join("cur")).unwrap();
        fs::write(dir.path().join(".dovecot-uidlist"), "").unwrap();

        let mailbox = Maildir::open(dir.path()).unwrap();
        let names: Vec<String> = mailbox
            .folders()
            .unwrap()
            .iter()
            .map(|m| m.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![".Archive", ".Sent"]);
    }

    #[test]
    fn test_messages_read_contents() {
        let dir = tempdir().unwrap();
        write_message(
            &dir.path().join("cur"),
            "k1:2,S",
            "Message-Id: <k1@host>\r\n\r\nbody",
        );

        let mailbox = Maildir::open(dir.path()).unwrap();
        let (key, message) = mailbox.messages().unwrap().next().unwrap().unwrap();
        assert_eq!(key, "k1");
        let parsed = message.parse(&key).unwrap();
        assert_eq!(parsed.message_id().as_deref(), Some("<k1@host>"));
    }
}
