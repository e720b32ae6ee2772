// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! One configured change log: writer, index and retention sharing a
//! single `LogDirectory`.

use crate::config::ChangeLogConfig;
use crate::directory::LogDirectory;
use crate::index::LogIndex;
use crate::retention::RetentionManager;
use crate::writer::ChangeLogWriter;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ChangeLog {
    pub writer: Arc<ChangeLogWriter>,
    pub index: LogIndex,
    pub retention: RetentionManager,
}

impl ChangeLog {
    pub fn open(cfg: &ChangeLogConfig) -> Self {
        let dir = LogDirectory::new(&cfg.export_dir);
        tracing::info!("Change log directory: {:?}", dir.path());
        Self {
            writer: Arc::new(ChangeLogWriter::new(dir.clone())),
            index: LogIndex::new(dir.clone()),
            retention: RetentionManager::new(dir, cfg.default_keep),
        }
    }

    pub fn directory(&self) -> &LogDirectory {
        self.index.directory()
    }
}
