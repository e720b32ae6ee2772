// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Change Log Writer
//!
//! One observed mutation produces exactly one new file in the log
//! directory. Nothing is ever appended to or rewritten in place.
//!
//! # Write sequence
//! 1. Ensure the directory exists
//! 2. Serialize the record into a hidden temp file in the same directory,
//!    readable by everyone (0644 on Unix) like any plain export
//! 3. fsync the temp file
//! 4. Link it under the entry name without clobbering; on a name clash
//!    retry with the next `_NNN` suffix
//!
//! Readers only ever see complete entries.

use crate::alert::Alert;
use crate::directory::LogDirectory;
use crate::entry::{EntryName, MAX_SEQ};
use crate::error::{ChangeLogError, Result};
use crate::hooks::ChangeObserver;
use crate::record::{ChangeRecord, Operation};
use chrono::{Local, NaiveDateTime};
use std::io::{self, Write};
use std::path::PathBuf;

#[cfg(unix)]
const ENTRY_MODE: u32 = 0o644;

#[derive(Clone, Debug)]
pub struct ChangeLogWriter {
    dir: LogDirectory,
}

impl ChangeLogWriter {
    pub fn new(dir: LogDirectory) -> Self {
        Self { dir }
    }

    pub fn directory(&self) -> &LogDirectory {
        &self.dir
    }

    /// Record a mutation, logging and swallowing any failure.
    pub fn record(&self, alert: &Alert, operation: Operation) {
        match self.try_record(alert, operation) {
            Ok(path) => tracing::info!("Change exported to {:?}", path),
            Err(e) => tracing::error!(
                "Failed to export {} change for alert {:?}: {}",
                operation,
                alert.id,
                e
            ),
        }
    }

    pub fn try_record(&self, alert: &Alert, operation: Operation) -> Result<PathBuf> {
        self.try_record_at(alert, operation, Local::now().naive_local())
    }

    /// Record with an explicit capture instant.
    pub fn try_record_at(
        &self,
        alert: &Alert,
        operation: Operation,
        recorded_at: NaiveDateTime,
    ) -> Result<PathBuf> {
        self.dir.ensure()?;

        let record = ChangeRecord::capture(operation, alert, recorded_at);
        let bytes = record.encode()?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".alert_change_")
            .suffix(".tmp")
            .tempfile_in(self.dir.path())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(ENTRY_MODE))?;
        }
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;

        let name = EntryName::new(operation, record.timestamp);
        for seq in 0..=MAX_SEQ {
            let path = self.dir.path().join(name.with_seq(seq).to_string());
            match tmp.persist_noclobber(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!("Entry {:?} taken, trying next suffix", path);
                    tmp = e.file;
                }
                Err(e) => return Err(e.error.into()),
            }
        }

        Err(ChangeLogError::NameExhausted(name.to_string()))
    }
}

impl ChangeObserver for ChangeLogWriter {
    fn on_change(&self, operation: Operation, alert: &Alert) {
        self.record(alert, operation);
    }
}
