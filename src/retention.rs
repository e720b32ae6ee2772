// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Retention Manager
//!
//! Keeps the N most recent entries (optionally per operation) and deletes
//! the rest. Recency is modification time, newest first, ties broken by
//! the capture instant encoded in the entry name. Safe to run alongside writers and other prunes: an entry
//! someone else already removed counts as gone, not as a failure.

use crate::directory::{LogDirectory, LogEntry};
use crate::error::{ChangeLogError, Result};
use crate::record::Operation;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fs;
use std::io;
use std::time::SystemTime;

/// Outcome of a prune.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneReport {
    /// Entries removed by this call.
    pub deleted: usize,
    /// Matching entries still present after this call.
    pub kept: usize,
}

/// Reject negative keep counts coming from untyped callers.
pub fn validate_keep(keep: i64) -> Result<usize> {
    usize::try_from(keep).map_err(|_| {
        ChangeLogError::InvalidParameter(format!("keep must be >= 0, got {}", keep))
    })
}

#[derive(Clone, Debug)]
pub struct RetentionManager {
    dir: LogDirectory,
    default_keep: usize,
}

impl RetentionManager {
    pub fn new(dir: LogDirectory, default_keep: usize) -> Self {
        Self { dir, default_keep }
    }

    pub fn default_keep(&self) -> usize {
        self.default_keep
    }

    /// Delete all but the `keep` most recent matching entries.
    /// Returns the number deleted.
    pub fn prune(&self, filter: Option<Operation>, keep: usize) -> Result<usize> {
        Ok(self.prune_with_report(filter, keep)?.deleted)
    }

    pub fn prune_with_report(&self, filter: Option<Operation>, keep: usize) -> Result<PruneReport> {
        if !self.dir.is_active() {
            return Ok(PruneReport { deleted: 0, kept: 0 });
        }

        let mut candidates: Vec<(SystemTime, LogEntry)> = Vec::new();
        for entry in self.dir.scan(filter)? {
            match fs::metadata(&entry.path) {
                Ok(meta) => candidates.push((meta.modified()?, entry)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        // The operation sorts before the stamp in a file name, so ties fall
        // back to the parsed instant rather than the name itself.
        candidates.sort_by_key(|(mtime, entry)| {
            Reverse((*mtime, entry.name.recorded_at, entry.name.seq))
        });

        let mut deleted = 0;
        let mut already_gone = 0;
        for (_, entry) in candidates.iter().skip(keep) {
            match fs::remove_file(&entry.path) {
                Ok(()) => deleted += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!("{} already removed", entry.file_name);
                    already_gone += 1;
                }
                Err(e) => tracing::warn!("Failed to remove {}: {}", entry.file_name, e),
            }
        }
        let kept = candidates.len() - deleted - already_gone;

        tracing::info!(
            "Pruned {} entries from {:?} (filter: {:?}, kept {})",
            deleted,
            self.dir.path(),
            filter,
            kept
        );
        Ok(PruneReport { deleted, kept })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::Alert;
    use crate::index::LogIndex;
    use crate::writer::ChangeLogWriter;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs::File;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    fn at(ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 2)
            .unwrap()
            .and_hms_milli_opt(8, 0, 0, ms)
            .unwrap()
    }

    #[test]
    fn test_validate_keep() {
        assert_eq!(validate_keep(0).unwrap(), 0);
        assert_eq!(validate_keep(50).unwrap(), 50);
        assert!(matches!(validate_keep(-1), Err(ChangeLogError::InvalidParameter(_))));
    }

    #[test]
    fn test_keeps_most_recent() {
        let dir = tempdir().unwrap();
        let log = LogDirectory::new(dir.path());
        let writer = ChangeLogWriter::new(log.clone());
        let alert = Alert::new("s", false, 0.5);
        for ms in 0..5 {
            writer.try_record_at(&alert, Operation::Create, at(ms)).unwrap();
        }

        let report = RetentionManager::new(log.clone(), 50)
            .prune_with_report(None, 2)
            .unwrap();

        assert_eq!(report, PruneReport { deleted: 3, kept: 2 });
        let left = LogIndex::new(log).list(None).unwrap();
        assert_eq!(
            left,
            vec![
                "alert_change_CREATE_20250202_080000_003.json",
                "alert_change_CREATE_20250202_080000_004.json",
            ]
        );
    }

    #[test]
    fn test_filter_limits_scope() {
        let dir = tempdir().unwrap();
        let log = LogDirectory::new(dir.path());
        let writer = ChangeLogWriter::new(log.clone());
        let alert = Alert::new("s", false, 0.5);
        for ms in 0..3 {
            writer.try_record_at(&alert, Operation::Create, at(ms)).unwrap();
            writer.try_record_at(&alert, Operation::Delete, at(ms)).unwrap();
        }

        let deleted = RetentionManager::new(log.clone(), 50)
            .prune(Some(Operation::Delete), 1)
            .unwrap();

        assert_eq!(deleted, 2);
        let index = LogIndex::new(log);
        assert_eq!(index.count(Some(Operation::Create)).unwrap(), 3);
        assert_eq!(index.count(Some(Operation::Delete)).unwrap(), 1);
    }

    #[test]
    fn test_keep_at_least_all_deletes_nothing() {
        let dir = tempdir().unwrap();
        let log = LogDirectory::new(dir.path());
        let writer = ChangeLogWriter::new(log.clone());
        for ms in 0..3 {
            writer
                .try_record_at(&Alert::new("s", true, 0.5), Operation::Update, at(ms))
                .unwrap();
        }
        let manager = RetentionManager::new(log, 50);
        assert_eq!(manager.prune(None, 3).unwrap(), 0);
        assert_eq!(manager.prune(None, 10).unwrap(), 0);
    }

    #[test]
    fn test_missing_dir_is_not_created() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("never-written");
        let manager = RetentionManager::new(LogDirectory::new(&root), 50);
        assert_eq!(manager.prune(None, 0).unwrap(), 0);
        assert!(!root.exists());
    }

    #[test]
    fn test_equal_mtime_keeps_newest_across_kinds() {
        let dir = tempdir().unwrap();
        let log = LogDirectory::new(dir.path());
        let writer = ChangeLogWriter::new(log.clone());
        let alert = Alert::new("s", true, 0.5);
        let older = writer.try_record_at(&alert, Operation::Update, at(10)).unwrap();
        let newer = writer.try_record_at(&alert, Operation::Delete, at(13)).unwrap();

        // Coarse filesystem clocks give both files the same mtime.
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        for path in [&older, &newer] {
            File::options().write(true).open(path).unwrap().set_modified(stamp).unwrap();
        }

        let report = RetentionManager::new(log.clone(), 50)
            .prune_with_report(None, 1)
            .unwrap();

        assert_eq!(report, PruneReport { deleted: 1, kept: 1 });
        assert!(newer.exists());
        assert!(!older.exists());
    }

    #[test]
    fn test_concurrent_prunes_delete_each_entry_once() {
        const ENTRIES: u32 = 100;
        const KEEP: usize = 5;

        for round in 0..10 {
            let dir = tempdir().unwrap();
            let log = LogDirectory::new(dir.path());
            let writer = ChangeLogWriter::new(log.clone());
            let alert = Alert::new("s", false, 0.5);
            for ms in 0..ENTRIES {
                let op = Operation::ALL[ms as usize % 3];
                writer.try_record_at(&alert, op, at(ms)).unwrap();
            }

            let manager = RetentionManager::new(log.clone(), 50);
            let reports: Vec<PruneReport> = thread::scope(|s| {
                let handles: Vec<_> = (0..4)
                    .map(|_| s.spawn(|| manager.prune_with_report(None, KEEP).unwrap()))
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let deleted: usize = reports.iter().map(|r| r.deleted).sum();
            assert_eq!(deleted, ENTRIES as usize - KEEP, "round {}", round);
            assert!(reports.iter().all(|r| r.kept == KEEP), "round {}", round);
            assert_eq!(LogIndex::new(log).count(None).unwrap(), KEEP);
        }
    }
}
