// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Handle to the directory holding the change log.

use crate::entry::EntryName;
use crate::error::Result;
use crate::record::Operation;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An entry found by a directory scan.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub name: EntryName,
    pub file_name: String,
    pub path: PathBuf,
}

/// The single storage location of the change log.
///
/// Created lazily by the writer; reads against a missing directory behave
/// as an empty, disabled log. Nothing here ever removes the directory.
#[derive(Clone, Debug)]
pub struct LogDirectory {
    root: PathBuf,
}

impl LogDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn is_active(&self) -> bool {
        self.root.is_dir()
    }

    /// Create the directory if absent. Idempotent.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Regular files whose names parse as log entries, filtered by
    /// operation. Order is unspecified.
    pub fn scan(&self, filter: Option<Operation>) -> Result<Vec<LogEntry>> {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for dirent in read_dir {
            let dirent = dirent?;
            let file_name = match dirent.file_name().into_string() {
                Ok(s) => s,
                Err(_) => continue,
            };
            let name = match EntryName::parse(&file_name) {
                Some(n) => n,
                None => continue,
            };
            if !name.matches(filter) {
                continue;
            }
            // Entries may vanish mid-scan under a concurrent prune.
            match dirent.file_type() {
                Ok(ft) if ft.is_file() => {}
                Ok(_) => continue,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
            entries.push(LogEntry {
                name,
                path: dirent.path(),
                file_name,
            });
        }

        tracing::debug!(
            "Scanned {:?}: {} entries (filter: {:?})",
            self.root,
            entries.len(),
            filter
        );
        Ok(entries)
    }

    /// Resolve a caller-supplied name to a path inside the directory.
    /// Only well-formed entry names resolve.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        EntryName::parse(file_name).map(|_| self.root.join(file_name))
    }
}
