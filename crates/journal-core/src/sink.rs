//! Plain-text journal file writer.
//!
//! At most one file is opened per session, lazily, on the first append made
//! while file output is enabled:
//!
//! ```text
//! <data_root>/
//! └── Data/Client/JournalLogs/
//!     └── 2026_01_21_14_30_45_journal.txt
//! ```
//!
//! Lines are flushed one at a time. If the directory or the file cannot be
//! created, the failure is reported once and the writer stays poisoned for the
//! rest of its life, so a read-only disk does not cost an I/O attempt on every
//! append.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::entry::{format_line, JournalEntry};
use crate::error::{JournalError, JournalResult};
use crate::fs::{DirectoryProvider, FsDirectories};

/// Directory segments under the data root holding journal files.
pub const JOURNAL_DIR_SEGMENTS: [&str; 3] = ["Data", "Client", "JournalLogs"];

/// Numbered names tried when a journal for the same second already exists.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// File name for a journal opened at `now`, e.g. `2026_01_21_14_30_45_journal.txt`.
///
/// `attempt` > 0 adds a suffix (`..._journal_1.txt`) for a second file opened
/// within the same second.
pub fn journal_file_name(now: DateTime<Local>, attempt: u32) -> String {
    let stamp = now.format("%Y_%m_%d_%H_%M_%S");
    if attempt == 0 {
        format!("{}_journal.txt", stamp)
    } else {
        format!("{}_journal_{}.txt", stamp, attempt)
    }
}

/// Observable state of a [`SinkWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// No file open. The next eligible append will try to open one.
    Disabled,
    /// A journal file is open and receiving lines.
    Open,
    /// Opening or writing failed; no further attempts this session.
    Poisoned,
}

enum Sink {
    Disabled,
    Open(JournalFile),
    Poisoned,
}

struct JournalFile {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl JournalFile {
    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}

/// Writer that copies journal entries to a per-session text file.
pub struct SinkWriter {
    root: PathBuf,
    directories: Box<dyn DirectoryProvider>,
    state: Sink,
}

impl SinkWriter {
    /// Create a writer rooted at `root` that creates directories on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_directories(root, FsDirectories)
    }

    /// Create a writer with a custom directory provider.
    pub fn with_directories(
        root: impl Into<PathBuf>,
        directories: impl DirectoryProvider + 'static,
    ) -> Self {
        Self {
            root: root.into(),
            directories: Box::new(directories),
            state: Sink::Disabled,
        }
    }

    pub fn state(&self) -> SinkState {
        match self.state {
            Sink::Disabled => SinkState::Disabled,
            Sink::Open(_) => SinkState::Open,
            Sink::Poisoned => SinkState::Poisoned,
        }
    }

    /// Path of the open journal file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.state {
            Sink::Open(file) => Some(&file.path),
            _ => None,
        }
    }

    /// Data root the journal directory is created under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open a journal file if `enabled` and none is open yet.
    ///
    /// No-op when a file is already open, when the writer is poisoned, or when
    /// `enabled` is false. A failure poisons the writer.
    pub fn ensure_open(&mut self, enabled: bool) {
        if !matches!(self.state, Sink::Disabled) || !enabled {
            return;
        }

        match self.open() {
            Ok(file) => {
                tracing::debug!(path = %file.path.display(), "Opened journal file");
                self.state = Sink::Open(file);
            }
            Err(e) => {
                tracing::error!(error = %e, root = %self.root.display(), "Failed to create journal file, journal saving disabled for this session");
                self.state = Sink::Poisoned;
            }
        }
    }

    fn open(&self) -> JournalResult<JournalFile> {
        let dir = self
            .directories
            .ensure_directory(&self.root, &JOURNAL_DIR_SEGMENTS)
            .map_err(|e| JournalError::DirectoryUnavailable(format!("{}: {}", self.root.display(), e)))?;

        // Never reuse an existing file: an earlier session's journal must survive
        let now = Local::now();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = dir.join(journal_file_name(now, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    return Ok(JournalFile {
                        writer: BufWriter::new(file),
                        path,
                    })
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(JournalError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free journal file name in {}", dir.display()),
        )))
    }

    /// Write one line for `entry` if a file is open. Silent otherwise.
    pub fn write_entry(&mut self, entry: &JournalEntry) {
        let result = match &mut self.state {
            Sink::Open(file) => file
                .write_line(&format_line(entry))
                .map_err(|e| (e, file.path.clone())),
            _ => return,
        };

        if let Err((e, path)) = result {
            tracing::error!(error = %e, path = %path.display(), "Failed to write journal file, journal saving disabled for this session");
            self.state = Sink::Poisoned;
        }
    }

    /// Flush and release the open file. Idempotent; a poisoned writer stays
    /// poisoned.
    pub fn close(&mut self) {
        if !matches!(self.state, Sink::Open(_)) {
            return;
        }

        if let Sink::Open(mut file) = std::mem::replace(&mut self.state, Sink::Disabled) {
            if let Err(e) = file.writer.flush() {
                tracing::warn!(error = %e, path = %file.path.display(), "Failed to flush journal file on close");
            }
            tracing::debug!(path = %file.path.display(), "Closed journal file");
        }
    }
}

impl Drop for SinkWriter {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SinkWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkWriter")
            .field("root", &self.root)
            .field("state", &self.state())
            .field("path", &self.path())
            .finish()
    }
}
