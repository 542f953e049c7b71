//! Recursive mailbox traversal
//!
//! Visits every message of a mailbox, then every nested sub-folder. Each
//! mailbox visited counts once, so nested folders are counted individually.
//! Messages without a Message-Id are skipped and not counted.

use crate::counter::Counter;
use crate::maildir::Maildir;
use crate::mime::ParsedMessage;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Walk `mailbox` and its sub-folders, calling `on_message` for every
/// message that carries a Message-Id
pub fn walk<F>(mailbox: &Maildir, counter: &Counter, mut on_message: F)
where
    F: FnMut(&str, &ParsedMessage<'_>),
{
    let mut chain = Vec::new();
    walk_folder(mailbox, counter, &mut on_message, &mut chain);
}

fn walk_folder<F>(mailbox: &Maildir, counter: &Counter, on_message: &mut F, chain: &mut Vec<PathBuf>)
where
    F: FnMut(&str, &ParsedMessage<'_>),
{
    let canonical =
        fs::canonicalize(mailbox.path()).unwrap_or_else(|_| mailbox.path().to_path_buf());

    // A folder already on the current chain is reachable from itself.
    if chain.contains(&canonical) {
        warn!(path = %mailbox.path().display(), "Folder loop detected, skipping");
        return;
    }

    counter.record_mailbox();
    debug!(path = %mailbox.path().display(), "Walking mailbox");

    match mailbox.messages() {
        Ok(messages) => {
            for item in messages {
                match item {
                    Ok((key, message)) => {
                        let parsed = match message.parse(&key) {
                            Ok(parsed) => parsed,
                            Err(e) => {
                                warn!(error = %e, "Message skipped");
                                continue;
                            }
                        };

                        if parsed.message_id().is_none() {
                            debug!(key = %key, "No Message-Id found");
                            continue;
                        }

                        counter.record_message();
                        on_message(&key, &parsed);
                    }
                    Err(e) => warn!(error = %e, "Message skipped"),
                }
            }
        }
        Err(e) => warn!(error = %e, "Mailbox messages unreadable"),
    }

    let folders = match mailbox.folders() {
        Ok(folders) => folders,
        Err(e) => {
            warn!(error = %e, "Mailbox folders unreadable");
            return;
        }
    };

    chain.push(canonical);
    for folder in &folders {
        debug!(path = %folder.path().display(), "Subfolder found");
        walk_folder(folder, counter, on_message, chain);
    }
    chain.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::Field;
    use std::path::Path;
    use tempfile::tempdir;

    fn add_message(mailbox: &Path, name: &str, message_id: Option<&str>) {
        let cur = mailbox.join("cur");
        fs::create_dir_all(&cur).unwrap();
        let mut raw = String::new();
        if let Some(id) = message_id {
            raw.push_str(&format!("Message-Id: {}\r\n", id));
        }
        raw.push_str("Subject: test\r\n\r\nbody\r\n");
        fs::write(cur.join(name), raw).unwrap();
    }

    fn collect_keys(root: &Path, counter: &Counter) -> Vec<String> {
        let mailbox = Maildir::open(root).unwrap();
        let mut keys = Vec::new();
        walk(&mailbox, counter, |key, _| keys.push(key.to_string()));
        keys
    }

    #[test]
    fn test_messages_without_id_are_skipped() {
        let dir = tempdir().unwrap();
        add_message(dir.path(), "a:2,S", Some("<a@host>"));
        add_message(dir.path(), "b:2,S", None);
        add_message(dir.path(), "c:2,S", Some("<c@host>"));

        let counter = Counter::new();
        let keys = collect_keys(dir.path(), &counter);

        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(counter.get(Field::Messages), 2);
        assert_eq!(counter.get(Field::Mailboxes), 1);
    }

    #[test]
    fn test_nested_folders_counted_individually() {
        let dir = tempdir().unwrap();
        add_message(dir.path(), "root1", Some("<r1@host>"));
        add_message(&dir.path().join(".Sent"), "sent1", Some("<s1@host>"));
        add_message(&dir.path().join(".Sent").join(".2020"), "old1", Some("<o1@host>"));
        fs::create_dir_all(dir.path().join(".Empty")).unwrap();

        let counter = Counter::new();
        let keys = collect_keys(dir.path(), &counter);

        assert_eq!(keys, vec!["root1", "sent1", "old1"]);
        assert_eq!(counter.get(Field::Mailboxes), 4);
        assert_eq!(counter.get(Field::Messages), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_folder_loop_terminates() {
        let dir = tempdir().unwrap();
        add_message(dir.path(), "root1", Some("<r1@host>"));
        fs::create_dir_all(dir.path().join(".Child")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join(".Child").join(".Loop")).unwrap();

        let counter = Counter::new();
        let keys = collect_keys(dir.path(), &counter);

        assert_eq!(keys, vec!["root1"]);
        assert_eq!(counter.get(Field::Mailboxes), 2);
    }
}
