// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Change Record Codec
//!
//! A `ChangeRecord` is the unit of the change log: one mutation of one
//! alert, captured after the fact and written as a flat JSON object.
//!
//! # Invariants
//! - Records are immutable once written
//! - `timestamp` is when the record was captured, not a business time
//! - Field names on disk are fixed (`operation`, `timestamp`, `alert_id`, ...)

use crate::alert::Alert;
use crate::error::{ChangeLogError, Result};
use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of mutation observed on an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Create, Operation::Update, Operation::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }

    /// Parse an optional filter value as received from a caller.
    /// `None` and blank strings mean "no filter".
    pub fn parse_filter(raw: Option<&str>) -> Result<Option<Operation>> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ChangeLogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Operation::Create),
            "UPDATE" => Ok(Operation::Update),
            "DELETE" => Ok(Operation::Delete),
            _ => Err(ChangeLogError::InvalidParameter(format!(
                "unknown operation {:?} (expected CREATE, UPDATE or DELETE)",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub operation: Operation,
    pub timestamp: NaiveDateTime,
    pub alert_id: Option<i64>,
    pub subject: String,
    pub is_spam: bool,
    pub confidence: f64,
    pub created_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub version: Option<i64>,
}

impl ChangeRecord {
    /// Capture the state of `alert` for `operation`.
    ///
    /// `recorded_at` is truncated to milliseconds so the record and its entry
    /// name carry the same instant.
    pub fn capture(operation: Operation, alert: &Alert, recorded_at: NaiveDateTime) -> Self {
        Self {
            operation,
            timestamp: recorded_at.trunc_subsecs(3),
            alert_id: alert.id,
            subject: alert.subject.clone(),
            is_spam: alert.is_spam,
            confidence: alert.confidence,
            created_date: alert.created_date,
            last_modified_date: alert.last_modified_date,
            version: alert.version,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_milli_opt(9, 26, 53, ms)
            .unwrap()
    }

    #[test]
    fn test_operation_parse_case_insensitive() {
        assert_eq!("update".parse::<Operation>().unwrap(), Operation::Update);
        assert_eq!("Delete".parse::<Operation>().unwrap(), Operation::Delete);
        assert!(matches!(
            "MERGE".parse::<Operation>(),
            Err(ChangeLogError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_parse_filter_blank_means_none() {
        assert_eq!(Operation::parse_filter(None).unwrap(), None);
        assert_eq!(Operation::parse_filter(Some("  ")).unwrap(), None);
        assert_eq!(
            Operation::parse_filter(Some("create")).unwrap(),
            Some(Operation::Create)
        );
    }

    #[test]
    fn test_wire_keys() {
        let mut alert = Alert::new("Win a prize", true, 0.97);
        alert.id = Some(7);
        alert.version = Some(2);
        let record = ChangeRecord::capture(Operation::Update, &alert, at(123));

        let value: serde_json::Value = serde_json::from_slice(&record.encode().unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "operation",
            "timestamp",
            "alert_id",
            "subject",
            "is_spam",
            "confidence",
            "created_date",
            "last_modified_date",
            "version",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj["operation"], "UPDATE");
        assert_eq!(obj["alert_id"], 7);
        assert_eq!(obj["subject"], "Win a prize");
        assert_eq!(obj["is_spam"], true);
    }

    #[test]
    fn test_capture_truncates_to_millis() {
        let precise = at(0) + chrono::Duration::nanoseconds(456_789_123);
        let record = ChangeRecord::capture(Operation::Create, &Alert::new("x", false, 0.1), precise);
        assert_eq!(record.timestamp, at(456));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            ChangeRecord::decode(b"not json"),
            Err(ChangeLogError::Serialization(_))
        ));
    }
}
