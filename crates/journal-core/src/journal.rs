//! The journal: entry store plus file sink behind one append entry point.

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::sync::broadcast;

use crate::config::JournalSettings;
use crate::entry::{resolve_font, JournalEntry};
use crate::fs::DirectoryProvider;
use crate::sink::{SinkState, SinkWriter};
use crate::store::{EntryStore, SubscriptionId};

/// Bounded journal of recent messages with optional file output.
///
/// # Example
///
/// ```ignore
/// use journal_core::{Journal, JournalConfig};
///
/// let config = JournalConfig { save_journal_to_file: true, ..Default::default() };
/// let mut journal = Journal::new("/path/to/client");
///
/// journal.subscribe(|entry| println!("{}", entry.to_line()));
/// journal.add(&config, "Hail and well met!", 0x0034, "Bob", true);
///
/// for entry in journal.entries() {
///     render(entry);
/// }
///
/// journal.clear();
/// ```
#[derive(Debug)]
pub struct Journal {
    store: EntryStore,
    sink: SinkWriter,
}

impl Journal {
    /// Create a journal whose files live under `data_root/Data/Client/JournalLogs`.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            store: EntryStore::new(),
            sink: SinkWriter::new(data_root),
        }
    }

    /// Create a journal with a custom directory provider.
    pub fn with_directories(
        data_root: impl Into<PathBuf>,
        directories: impl DirectoryProvider + 'static,
    ) -> Self {
        Self {
            store: EntryStore::new(),
            sink: SinkWriter::with_directories(data_root, directories),
        }
    }

    /// Append a message.
    ///
    /// `settings` is read on every call: its font override replaces the font
    /// id and unicode flag derived from `is_unicode`, and its save flag decides
    /// whether a journal file is opened. Observers are notified before the line
    /// reaches the file. Never fails; file problems only disable the sink.
    pub fn add(
        &mut self,
        settings: &impl JournalSettings,
        text: &str,
        hue: u16,
        name: &str,
        is_unicode: bool,
    ) -> JournalEntry {
        let (font, is_unicode) = resolve_font(is_unicode, settings.font_override());
        let entry = JournalEntry::new(text, font, hue, name, is_unicode, Local::now());

        tracing::trace!(font, hue, name, "Journal entry added");
        let entry = self.store.push(entry).clone();

        self.sink.ensure_open(settings.save_to_file());
        self.sink.write_entry(&entry);

        entry
    }

    /// Remove every entry and close the journal file.
    pub fn clear(&mut self) {
        self.store.clear();
        self.sink.close();
    }

    /// Close the journal file, keeping the entries. The next append with file
    /// output enabled opens a new file.
    pub fn close_sink(&mut self) {
        self.sink.close();
    }

    /// Register a callback for every appended entry.
    pub fn subscribe(&mut self, observer: impl FnMut(&JournalEntry) + 'static) -> SubscriptionId {
        self.store.subscribe(Box::new(observer))
    }

    /// Receive appended entries through a tokio broadcast channel.
    pub fn subscribe_channel(
        &mut self,
        capacity: usize,
    ) -> (SubscriptionId, broadcast::Receiver<JournalEntry>) {
        self.store.subscribe_channel(capacity)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Current entries, oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &JournalEntry> + ExactSizeIterator {
        self.store.iter()
    }

    pub fn latest(&self) -> Option<&JournalEntry> {
        self.store.latest()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn sink_state(&self) -> SinkState {
        self.sink.state()
    }

    /// Path of the journal file currently being written, if any.
    pub fn sink_path(&self) -> Option<&Path> {
        self.sink.path()
    }

    /// Directory journal files are written to.
    pub fn log_dir(&self) -> PathBuf {
        crate::sink::JOURNAL_DIR_SEGMENTS
            .iter()
            .fold(self.sink.root().to_path_buf(), |path, segment| path.join(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JournalConfig;
    use crate::entry::{ASCII_FONT, UNICODE_FONT};
    use crate::store::MAX_ENTRIES;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Directory provider that delegates to the filesystem and counts calls.
    #[derive(Clone)]
    struct CountingDirectories {
        calls: Rc<Cell<usize>>,
        fail: bool,
    }

    impl DirectoryProvider for CountingDirectories {
        fn ensure_directory(&self, base: &Path, segments: &[&str]) -> std::io::Result<PathBuf> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
            }
            crate::fs::FsDirectories.ensure_directory(base, segments)
        }
    }

    fn saving() -> JournalConfig {
        JournalConfig {
            save_journal_to_file: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_resolves_default_fonts() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());
        let config = JournalConfig::default();

        let unicode = journal.add(&config, "hello", 0x0034, "Bob", true);
        assert_eq!(unicode.font(), UNICODE_FONT);
        assert!(unicode.is_unicode());

        let ascii = journal.add(&config, "hello", 0x0034, "Bob", false);
        assert_eq!(ascii.font(), ASCII_FONT);
        assert!(!ascii.is_unicode());
    }

    #[test]
    fn test_add_applies_font_override() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());
        let config = JournalConfig {
            override_all_fonts: true,
            chat_font: 7,
            override_all_fonts_is_unicode: false,
            ..Default::default()
        };

        for is_unicode in [true, false] {
            let entry = journal.add(&config, "hello", 0, "Bob", is_unicode);
            assert_eq!(entry.font(), 7);
            assert!(!entry.is_unicode());
        }
    }

    #[test]
    fn test_settings_read_per_call() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());
        let mut config = JournalConfig::default();

        journal.add(&config, "before", 0, "Bob", true);
        assert_eq!(journal.sink_state(), SinkState::Disabled);

        config.save_journal_to_file = true;
        config.override_all_fonts = true;
        config.chat_font = 3;
        let entry = journal.add(&config, "after", 0, "Bob", true);

        assert_eq!(entry.font(), 3);
        assert_eq!(journal.sink_state(), SinkState::Open);
    }

    #[test]
    fn test_add_returns_stored_entry() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());

        let entry = journal.add(&JournalConfig::default(), "hello", 946, "Bob", true);

        assert_eq!(journal.latest(), Some(&entry));
        assert_eq!(entry.hue(), 946);
        assert_eq!(entry.name(), "Bob");
    }

    #[test]
    fn test_capacity_and_order() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());
        let config = JournalConfig::default();

        for n in 0..MAX_ENTRIES + 1 {
            journal.add(&config, &format!("line {}", n), 0, "", true);
        }

        assert_eq!(journal.len(), MAX_ENTRIES);
        assert_eq!(journal.entries().next().unwrap().text(), "line 1");
        assert_eq!(journal.entries().next_back().unwrap().text(), format!("line {}", MAX_ENTRIES));
    }

    #[test]
    fn test_one_notification_per_add() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        journal.subscribe(move |entry| sink.borrow_mut().push(entry.clone()));

        let first = journal.add(&JournalConfig::default(), "one", 1, "A", true);
        let second = journal.add(&JournalConfig::default(), "two", 2, "B", false);

        assert_eq!(*seen.borrow(), vec![first, second]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());
        let count = Rc::new(Cell::new(0));

        let counter = Rc::clone(&count);
        let id = journal.subscribe(move |_| counter.set(counter.get() + 1));

        journal.add(&JournalConfig::default(), "one", 0, "", true);
        assert!(journal.unsubscribe(id));
        journal.add(&JournalConfig::default(), "two", 0, "", true);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_writes_formatted_lines() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());

        let entry = journal.add(&saving(), "hello", 0, "Bob", true);

        let path = journal.sink_path().unwrap().to_path_buf();
        assert_eq!(path.parent().unwrap(), journal.log_dir());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}\n", entry.to_line()));
        assert!(content.ends_with("]  Bob: hello\n"));
    }

    #[test]
    fn test_poisoned_sink_attempts_once() {
        let calls = Rc::new(Cell::new(0));
        let mut journal = Journal::with_directories(
            "/unused",
            CountingDirectories {
                calls: Rc::clone(&calls),
                fail: true,
            },
        );

        for n in 0..10 {
            journal.add(&saving(), &format!("line {}", n), 0, "Bob", true);
        }

        // Entries are kept even though nothing reaches disk
        assert_eq!(journal.len(), 10);
        assert_eq!(journal.sink_state(), SinkState::Poisoned);
        assert_eq!(calls.get(), 1);

        journal.clear();
        journal.add(&saving(), "after clear", 0, "Bob", true);
        assert_eq!(journal.sink_state(), SinkState::Poisoned);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_clear_resets_entries_and_file() {
        let temp = TempDir::new().unwrap();
        let calls = Rc::new(Cell::new(0));
        let mut journal = Journal::with_directories(
            temp.path(),
            CountingDirectories {
                calls: Rc::clone(&calls),
                fail: false,
            },
        );

        journal.add(&saving(), "first", 0, "Bob", true);
        assert_eq!(journal.sink_state(), SinkState::Open);

        journal.clear();
        assert!(journal.is_empty());
        assert_eq!(journal.sink_state(), SinkState::Disabled);
        assert!(journal.sink_path().is_none());

        journal.add(&saving(), "second", 0, "Bob", true);
        assert_eq!(journal.sink_state(), SinkState::Open);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_clear_and_close_without_file() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());

        journal.close_sink();
        journal.clear();
        journal.close_sink();
        journal.clear();

        assert!(journal.is_empty());
        assert_eq!(journal.sink_state(), SinkState::Disabled);
        assert!(!temp.path().join("Data").exists());
    }

    #[test]
    fn test_close_sink_keeps_entries() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());

        journal.add(&saving(), "kept", 0, "Bob", true);
        journal.close_sink();

        assert_eq!(journal.len(), 1);
        assert_eq!(journal.sink_state(), SinkState::Disabled);
    }

    #[tokio::test]
    async fn test_subscribe_channel() {
        let temp = TempDir::new().unwrap();
        let mut journal = Journal::new(temp.path());
        let (_id, mut rx) = journal.subscribe_channel(8);

        let entry = journal.add(&JournalConfig::default(), "over the wire", 0, "Joy", true);

        let received = rx.recv().await.expect("Should receive entry");
        assert_eq!(received, entry);
    }
}
