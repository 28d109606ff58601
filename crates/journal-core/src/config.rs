//! Journal settings.
//!
//! The journal never caches settings: [`Journal::add`](crate::Journal::add)
//! takes a [`JournalSettings`] on every call so a profile change (toggling
//! file output, switching the font override) applies to the next entry.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry::{FontOverride, UNICODE_FONT};
use crate::error::JournalResult;

/// Settings the journal consults at append time.
pub trait JournalSettings {
    /// Whether entries should be copied to a journal file.
    fn save_to_file(&self) -> bool;

    /// The active font override, if any.
    fn font_override(&self) -> Option<FontOverride>;
}

/// Profile-backed journal configuration.
///
/// Missing fields fall back to their defaults when loading from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Copy every entry to `Data/Client/JournalLogs/<timestamp>_journal.txt`
    pub save_journal_to_file: bool,

    /// Force `chat_font` / `override_all_fonts_is_unicode` onto every entry
    pub override_all_fonts: bool,

    /// Font id used while `override_all_fonts` is set
    pub chat_font: u8,

    /// Unicode flag used while `override_all_fonts` is set
    pub override_all_fonts_is_unicode: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            save_journal_to_file: false,
            override_all_fonts: false,
            chat_font: UNICODE_FONT,
            override_all_fonts_is_unicode: true,
        }
    }
}

impl JournalConfig {
    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> JournalResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a config, or return the default if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> JournalResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> JournalResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl JournalSettings for JournalConfig {
    fn save_to_file(&self) -> bool {
        self.save_journal_to_file
    }

    fn font_override(&self) -> Option<FontOverride> {
        self.override_all_fonts.then_some(FontOverride {
            font: self.chat_font,
            is_unicode: self.override_all_fonts_is_unicode,
        })
    }
}

/// No profile loaded: nothing is saved and no font override applies.
impl<T: JournalSettings> JournalSettings for Option<T> {
    fn save_to_file(&self) -> bool {
        self.as_ref().is_some_and(|s| s.save_to_file())
    }

    fn font_override(&self) -> Option<FontOverride> {
        self.as_ref().and_then(|s| s.font_override())
    }
}

impl<T: JournalSettings + ?Sized> JournalSettings for &T {
    fn save_to_file(&self) -> bool {
        (**self).save_to_file()
    }

    fn font_override(&self) -> Option<FontOverride> {
        (**self).font_override()
    }
}
