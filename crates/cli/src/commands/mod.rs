// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod count;
pub mod list;
pub mod prune;
pub mod show;
pub mod status;

use alert_changelog::config::ChangeLogConfig;
use alert_changelog::directory::LogDirectory;
use alert_changelog::{LogIndex, RetentionManager};
use std::path::Path;

pub(crate) fn open_index(dir: &Path) -> LogIndex {
    LogIndex::new(LogDirectory::new(dir))
}

/// Default keep honours `ALERT_CHANGELOG_KEEP`, same as the node.
pub fn open_retention(dir: &Path) -> RetentionManager {
    RetentionManager::new(LogDirectory::new(dir), ChangeLogConfig::from_env().default_keep)
}
