// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The Alert entity whose mutations are captured by the change log.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A spam/phishing alert produced by the classification service.
///
/// `id`, `created_date`, `last_modified_date` and `version` are assigned by
/// the store; callers constructing a new alert leave them empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub id: Option<i64>,
    pub subject: String,
    pub is_spam: bool,
    pub confidence: f64,
    #[serde(default)]
    pub email_content: Option<String>,
    #[serde(default)]
    pub time_detected: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_modified_date: Option<NaiveDateTime>,
    /// Optimistic-lock version. 0 on insert, bumped on every update.
    #[serde(default)]
    pub version: Option<i64>,
}

impl Alert {
    pub fn new(subject: impl Into<String>, is_spam: bool, confidence: f64) -> Self {
        Self {
            id: None,
            subject: subject.into(),
            is_spam,
            confidence,
            email_content: None,
            time_detected: None,
            created_date: None,
            last_modified_date: None,
            version: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.email_content = Some(content.into());
        self
    }
}
