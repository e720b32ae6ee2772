// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Log Directory Index
//!
//! Read-only views over the log directory. A missing directory is an
//! empty, disabled log rather than an error.

use crate::directory::LogDirectory;
use crate::error::{ChangeLogError, Result};
use crate::record::{ChangeRecord, Operation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;

/// Aggregate view of the log. Always fully populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStatus {
    pub active: bool,
    pub export_directory: String,
    pub total_files: usize,
    pub per_operation_counts: BTreeMap<Operation, usize>,
}

impl LogStatus {
    pub fn label(&self) -> &'static str {
        if self.active {
            "ACTIVE"
        } else {
            "DISABLED"
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogIndex {
    dir: LogDirectory,
}

impl LogIndex {
    pub fn new(dir: LogDirectory) -> Self {
        Self { dir }
    }

    pub fn directory(&self) -> &LogDirectory {
        &self.dir
    }

    /// Entry names in ascending lexical order.
    pub fn list(&self, filter: Option<Operation>) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .dir
            .scan(filter)?
            .into_iter()
            .map(|e| e.file_name)
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn count(&self, filter: Option<Operation>) -> Result<usize> {
        Ok(self.dir.scan(filter)?.len())
    }

    /// Raw content of one entry.
    pub fn get(&self, file_name: &str) -> Result<String> {
        let not_found = || ChangeLogError::NotFound(file_name.to_string());
        let path = self.dir.resolve(file_name).ok_or_else(not_found)?;

        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(not_found()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        }

        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }

    /// Decoded form of `get`.
    pub fn read(&self, file_name: &str) -> Result<ChangeRecord> {
        let content = self.get(file_name)?;
        ChangeRecord::decode(content.as_bytes())
    }

    pub fn status(&self) -> Result<LogStatus> {
        let mut per_operation_counts: BTreeMap<Operation, usize> =
            Operation::ALL.iter().map(|op| (*op, 0)).collect();

        let active = self.dir.is_active();
        let mut total_files = 0;
        if active {
            for entry in self.dir.scan(None)? {
                *per_operation_counts.entry(entry.name.operation).or_insert(0) += 1;
                total_files += 1;
            }
        }

        Ok(LogStatus {
            active,
            export_directory: self.dir.path().display().to_string(),
            total_files,
            per_operation_counts,
        })
    }
}
