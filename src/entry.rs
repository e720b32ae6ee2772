// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Log entry naming.
//!
//! `alert_change_<OP>_<yyyyMMdd_HHmmss_SSS>[_NNN].json`
//!
//! The optional `_NNN` suffix disambiguates entries of the same operation
//! captured in the same millisecond. `.` sorts before `_`, so the bare name
//! precedes its suffixed siblings, and any suffix precedes the next
//! millisecond: lexical order is chronological order within one operation.

use crate::record::Operation;
use chrono::{Duration, NaiveDateTime};
use std::fmt;

pub const PREFIX: &str = "alert_change_";
pub const EXTENSION: &str = "json";

/// Highest disambiguating suffix the writer will try.
pub const MAX_SEQ: u16 = 999;

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
// yyyyMMdd_HHmmss_SSS
const STAMP_LEN: usize = 19;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryName {
    pub operation: Operation,
    pub recorded_at: NaiveDateTime,
    /// 0 means no suffix.
    pub seq: u16,
}

impl EntryName {
    pub fn new(operation: Operation, recorded_at: NaiveDateTime) -> Self {
        Self {
            operation,
            recorded_at,
            seq: 0,
        }
    }

    pub fn with_seq(&self, seq: u16) -> Self {
        Self {
            seq,
            ..self.clone()
        }
    }

    pub fn matches(&self, filter: Option<Operation>) -> bool {
        filter.map_or(true, |op| op == self.operation)
    }

    /// Parse a bare file name. Anything that is not exactly a log entry
    /// name (including anything with path separators) yields `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(PREFIX)?;
        let rest = rest.strip_suffix(EXTENSION)?.strip_suffix('.')?;
        let (op, rest) = rest.split_once('_')?;
        let operation = match op {
            "CREATE" => Operation::Create,
            "UPDATE" => Operation::Update,
            "DELETE" => Operation::Delete,
            _ => return None,
        };

        if rest.len() < STAMP_LEN || !rest.is_ascii() {
            return None;
        }
        let (stamp, suffix) = rest.split_at(STAMP_LEN);
        let recorded_at = parse_stamp(stamp)?;

        let seq = if suffix.is_empty() {
            0
        } else {
            let digits = suffix.strip_prefix('_')?;
            if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            match digits.parse::<u16>().ok()? {
                0 => return None,
                n => n,
            }
        };

        Some(Self {
            operation,
            recorded_at,
            seq,
        })
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}_{}",
            PREFIX,
            self.operation,
            self.recorded_at.format(STAMP_FORMAT)
        )?;
        if self.seq > 0 {
            write!(f, "_{:03}", self.seq)?;
        }
        write!(f, ".{}", EXTENSION)
    }
}

fn parse_stamp(stamp: &str) -> Option<NaiveDateTime> {
    let bytes = stamp.as_bytes();
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        8 | 15 => *b == b'_',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    let seconds = NaiveDateTime::parse_from_str(&stamp[..15], "%Y%m%d_%H%M%S").ok()?;
    let millis: i64 = stamp[16..].parse().ok()?;
    Some(seconds + Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, ms)
            .unwrap()
    }

    #[test]
    fn test_format() {
        let name = EntryName::new(Operation::Create, at(7));
        assert_eq!(name.to_string(), "alert_change_CREATE_20250102_030405_007.json");
        assert_eq!(
            name.with_seq(12).to_string(),
            "alert_change_CREATE_20250102_030405_007_012.json"
        );
    }

    #[test]
    fn test_parse_back() {
        let name = EntryName::new(Operation::Delete, at(999)).with_seq(3);
        assert_eq!(EntryName::parse(&name.to_string()), Some(name));
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        for bad in [
            "",
            "notes.txt",
            "../alert_change_CREATE_20250102_030405_007.json",
            "alert_change_CREATE_20250102_030405_007.json.tmp",
            ".alert_change_CREATE_20250102_030405_007.json.tmp",
            "alert_change_MERGE_20250102_030405_007.json",
            "alert_change_CREATE_20250102_030405_07.json",
            "alert_change_CREATE_20251302_030405_007.json",
            "alert_change_CREATE_20250102_030405_007_000.json",
            "alert_change_CREATE_20250102_030405_007_1.json",
            "alert_change_CREATE_20250102_030405_007/x.json",
        ] {
            assert_eq!(EntryName::parse(bad), None, "accepted {bad:?}");
        }
    }

    #[test]
    fn test_lexical_order_is_chronological() {
        let names = vec![
            EntryName::new(Operation::Update, at(5)).to_string(),
            EntryName::new(Operation::Update, at(5)).with_seq(1).to_string(),
            EntryName::new(Operation::Update, at(5)).with_seq(2).to_string(),
            EntryName::new(Operation::Update, at(6)).to_string(),
            EntryName::new(Operation::Update, at(120)).to_string(),
        ];
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_matches_filter() {
        let name = EntryName::new(Operation::Update, at(1));
        assert!(name.matches(None));
        assert!(name.matches(Some(Operation::Update)));
        assert!(!name.matches(Some(Operation::Create)));
    }
}
