//! Badge check-in: scanned-text parsing and duplicate suppression.
//!
//! Event check-in scans membership badges and collects one row per
//! member.  Two badge text formats are in circulation:
//!
//! 1. vCard-style: a `BEGIN:VCARD` blob with `NICKNAME:<name>` and a
//!    `Member#: <digits>` note.
//! 2. Comma-separated: `Member Name:<name>, Member Number:<id>, ...`.
//!
//! The camera plumbing lives in the UI; this module only deals with the
//! decoded text.  A [`CheckinLog`] rejects a membership id it has
//! already seen in the current session, so waving the same badge twice
//! produces one row.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

/// One successful badge scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeEntry {
    pub name: String,
    pub membership_id: String,
    pub scanned_at: DateTime<Utc>,
    /// The decoded text exactly as scanned, kept for export.
    pub raw: String,
}

/// What happened to one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// New member, entry recorded.
    Added,
    /// Membership id already checked in this session.
    Duplicate,
    /// The text matched neither badge format.
    Unreadable,
}

/// Parse a decoded badge text into `(name, membership_id)`.
pub fn parse_badge(text: &str) -> Option<(String, String)> {
    if text.contains("BEGIN:VCARD") {
        let name = capture(text, "NICKNAME:", |c| c == ' ' || c == '\r' || c == '\n')?;
        let id = capture_digits(text, "Member#: ")?;
        return Some((name.to_string(), id.to_string()));
    }

    if text.contains("Member Name:") {
        let name = capture(text, "Member Name:", |c| c == ',')?;
        let id = capture(text, "Member Number:", |c| c == ',')?;
        return Some((name.to_string(), id.to_string()));
    }

    None
}

/// Session-scoped scan log with set-based duplicate suppression.
#[derive(Debug, Default)]
pub struct CheckinLog {
    entries: Vec<BadgeEntry>,
    seen: HashSet<String>,
}

impl CheckinLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and record one scan.
    pub fn record(&mut self, text: &str) -> ScanOutcome {
        let Some((name, membership_id)) = parse_badge(text) else {
            return ScanOutcome::Unreadable;
        };

        if !self.seen.insert(membership_id.clone()) {
            return ScanOutcome::Duplicate;
        }

        self.entries.push(BadgeEntry {
            name,
            membership_id,
            scanned_at: Utc::now(),
            raw: text.to_string(),
        });
        ScanOutcome::Added
    }

    /// All recorded entries, in scan order.
    pub fn entries(&self) -> &[BadgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The trimmed text between `prefix` and the first `stop` character (or
/// the end of input).  `None` when the prefix is absent or the capture
/// is empty.
fn capture<'a>(text: &'a str, prefix: &str, stop: impl Fn(char) -> bool) -> Option<&'a str> {
    let start = text.find(prefix)? + prefix.len();
    let rest = &text[start..];
    let end = rest.find(stop).unwrap_or(rest.len());
    let value = rest[..end].trim();
    (!value.is_empty()).then_some(value)
}

/// Like [`capture`], but the value is the run of ASCII digits directly
/// after the prefix.
fn capture_digits<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let start = text.find(prefix)? + prefix.len();
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value = &rest[..end];
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VCARD: &str = "BEGIN:VCARD\nVERSION:3.0\nNICKNAME:ada Lovelace\nNOTE:Member#: 40231 (regular)\nEND:VCARD";
    const CSV: &str = "Member Name: Grace Hopper, Member Number: 51822, Chapter: Main";

    #[test]
    fn parses_vcard_badges() {
        let (name, id) = parse_badge(VCARD).unwrap();
        assert_eq!(name, "ada");
        assert_eq!(id, "40231");
    }

    #[test]
    fn parses_comma_separated_badges() {
        let (name, id) = parse_badge(CSV).unwrap();
        assert_eq!(name, "Grace Hopper");
        assert_eq!(id, "51822");
    }

    #[test]
    fn rejects_unknown_formats() {
        assert_eq!(parse_badge("https://example.com/menu"), None);
        assert_eq!(parse_badge(""), None);
        // vCard missing the member number.
        assert_eq!(
            parse_badge("BEGIN:VCARD\nNICKNAME:ada\nEND:VCARD"),
            None
        );
    }

    #[test]
    fn duplicate_ids_are_suppressed() {
        let mut log = CheckinLog::new();

        assert_eq!(log.record(VCARD), ScanOutcome::Added);
        assert_eq!(log.record(VCARD), ScanOutcome::Duplicate);
        assert_eq!(log.record(CSV), ScanOutcome::Added);
        assert_eq!(log.record("garbage"), ScanOutcome::Unreadable);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].membership_id, "40231");
        assert_eq!(log.entries()[1].name, "Grace Hopper");
    }

    #[test]
    fn same_member_in_either_format_is_one_entry() {
        let mut log = CheckinLog::new();
        assert_eq!(log.record(VCARD), ScanOutcome::Added);

        let same_id_csv = "Member Name: Ada L, Member Number: 40231";
        assert_eq!(log.record(same_id_csv), ScanOutcome::Duplicate);
        assert_eq!(log.len(), 1);
    }
}
