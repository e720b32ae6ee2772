// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChangeLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Entry name does not resolve to a log entry under the log directory.
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(i64),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every disambiguating suffix for this millisecond is taken.
    #[error("No free entry name for {0}")]
    NameExhausted(String),
}

pub type Result<T> = std::result::Result<T, ChangeLogError>;
