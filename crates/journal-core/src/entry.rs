//! Journal entry types for display and file output
//!
//! A [`JournalEntry`] is created once by the journal at append time and never
//! changes afterwards. The renderer reads its font, hue and unicode flag; the
//! file sink only needs [`format_line`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Font id used for unicode text when no override is active.
pub const UNICODE_FONT: u8 = 0;

/// Font id used for non-unicode (ASCII) text when no override is active.
pub const ASCII_FONT: u8 = 9;

/// Short date + short time, e.g. `10/18/2026 3:04 PM`.
pub const LINE_TIME_FORMAT: &str = "%-m/%-d/%Y %-I:%M %p";

/// A font policy that replaces the caller's font choice for every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontOverride {
    /// Font id forced onto every entry
    pub font: u8,
    /// Unicode flag forced onto every entry
    pub is_unicode: bool,
}

/// One logged message with its display metadata.
///
/// # Example
///
/// ```ignore
/// let entry = JournalEntry::new("Hail!", UNICODE_FONT, 0x0034, "Bob", true, Local::now());
/// assert_eq!(entry.name(), "Bob");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    text: String,
    font: u8,
    hue: u16,
    name: String,
    is_unicode: bool,
    time: DateTime<Local>,
}

impl JournalEntry {
    /// Create a new entry.
    ///
    /// # Arguments
    ///
    /// * `text` - Message body
    /// * `font` - Resolved font id
    /// * `hue` - Color index used by the renderer
    /// * `name` - Sender name, may be empty for system messages
    /// * `is_unicode` - Whether the renderer should use unicode glyphs
    /// * `time` - Creation time
    pub fn new(
        text: impl Into<String>,
        font: u8,
        hue: u16,
        name: impl Into<String>,
        is_unicode: bool,
        time: DateTime<Local>,
    ) -> Self {
        Self {
            text: text.into(),
            font,
            hue,
            name: name.into(),
            is_unicode,
            time,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> u8 {
        self.font
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }

    /// Sender name. Empty for messages without a speaker.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_unicode(&self) -> bool {
        self.is_unicode
    }

    pub fn time(&self) -> DateTime<Local> {
        self.time
    }

    /// Format this entry as a single journal file line (no trailing newline).
    pub fn to_line(&self) -> String {
        format_line(self)
    }
}

/// Resolve the font id and unicode flag for a new entry.
///
/// Without an override, unicode text gets [`UNICODE_FONT`] and everything else
/// gets [`ASCII_FONT`]. An active override replaces both values outright.
pub fn resolve_font(is_unicode: bool, font_override: Option<FontOverride>) -> (u8, bool) {
    match font_override {
        Some(policy) => (policy.font, policy.is_unicode),
        None if is_unicode => (UNICODE_FONT, true),
        None => (ASCII_FONT, false),
    }
}

/// Format an entry as `[<time>]  <name>: <text>`.
pub fn format_line(entry: &JournalEntry) -> String {
    format!(
        "[{}]  {}: {}",
        entry.time.format(LINE_TIME_FORMAT),
        entry.name,
        entry.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 21, 14, 30, 45).unwrap()
    }

    #[test]
    fn test_entry_creation() {
        let entry = JournalEntry::new("Hello, world!", UNICODE_FONT, 0x0034, "Love", true, fixed_time());

        assert_eq!(entry.text(), "Hello, world!");
        assert_eq!(entry.font(), UNICODE_FONT);
        assert_eq!(entry.hue(), 0x0034);
        assert_eq!(entry.name(), "Love");
        assert!(entry.is_unicode());
        assert_eq!(entry.time(), fixed_time());
    }

    #[test]
    fn test_format_line() {
        let entry = JournalEntry::new("hello", UNICODE_FONT, 0, "Bob", true, fixed_time());
        assert_eq!(format_line(&entry), "[1/21/2026 2:30 PM]  Bob: hello");
        assert_eq!(entry.to_line(), format_line(&entry));
    }

    #[test]
    fn test_format_line_empty_name() {
        let entry = JournalEntry::new("You see: a door", ASCII_FONT, 0x03B2, "", false, fixed_time());
        assert_eq!(format_line(&entry), "[1/21/2026 2:30 PM]  : You see: a door");
    }

    #[test]
    fn test_format_line_morning_and_double_digits() {
        let time = Local.with_ymd_and_hms(2026, 12, 5, 9, 7, 0).unwrap();
        let entry = JournalEntry::new("gm", UNICODE_FONT, 0, "Joy", true, time);
        assert_eq!(format_line(&entry), "[12/5/2026 9:07 AM]  Joy: gm");
    }

    #[test]
    fn test_resolve_font_without_override() {
        assert_eq!(resolve_font(true, None), (UNICODE_FONT, true));
        assert_eq!(resolve_font(false, None), (ASCII_FONT, false));
    }

    #[test]
    fn test_resolve_font_override_wins() {
        let policy = FontOverride {
            font: 7,
            is_unicode: false,
        };
        assert_eq!(resolve_font(true, Some(policy)), (7, false));
        assert_eq!(resolve_font(false, Some(policy)), (7, false));
    }

    #[test]
    fn test_entry_serialization() {
        let entry = JournalEntry::new("Hi", ASCII_FONT, 946, "Peace", false, fixed_time());

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"text\":\"Hi\""));
        assert!(json.contains("\"font\":9"));
        assert!(json.contains("\"hue\":946"));

        let parsed: JournalEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
