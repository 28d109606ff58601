//! Journal Core Library
//!
//! A bounded, append-only journal of recent chat and system messages with an
//! optional per-session text file copy.
//!
//! ## Overview
//!
//! - **EntryStore**: the last [`MAX_ENTRIES`] entries, oldest evicted first,
//!   with synchronous observers notified on every append
//! - **SinkWriter**: a lazily opened `<timestamp>_journal.txt` file, flushed per
//!   line, permanently disabled for the session after an I/O failure
//! - **Journal**: the single append entry point tying the two together
//!
//! ## Quick Start
//!
//! ```ignore
//! use journal_core::{Journal, JournalConfig};
//!
//! let config = JournalConfig::load_or_default("profile/journal.json")?;
//! let mut journal = Journal::new("/path/to/client");
//!
//! journal.subscribe(|entry| println!("{}", entry.to_line()));
//! journal.add(&config, "Welcome to Britannia", 0x03B2, "System", true);
//!
//! journal.clear();
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod fs;
pub mod journal;
pub mod sink;
pub mod store;

// Re-exports
pub use config::{JournalConfig, JournalSettings};
pub use entry::{format_line, resolve_font, FontOverride, JournalEntry, ASCII_FONT, UNICODE_FONT};
pub use error::{JournalError, JournalResult};
pub use fs::{DirectoryProvider, FsDirectories};
pub use journal::Journal;
pub use sink::{journal_file_name, SinkState, SinkWriter, JOURNAL_DIR_SEGMENTS};
pub use store::{EntryStore, Observer, SubscriptionId, MAX_ENTRIES};
