// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration for the change log.

use std::path::PathBuf;

/// Directory used when nothing else is configured.
pub const DEFAULT_EXPORT_DIR: &str = "data-exports";

/// Number of most recent entries kept by a prune without an explicit count.
pub const DEFAULT_KEEP: usize = 50;

pub const ENV_EXPORT_DIR: &str = "ALERT_CHANGELOG_DIR";
pub const ENV_KEEP: &str = "ALERT_CHANGELOG_KEEP";

#[derive(Debug, Clone)]
pub struct ChangeLogConfig {
    pub export_dir: PathBuf,
    pub default_keep: usize,
}

impl Default for ChangeLogConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            default_keep: DEFAULT_KEEP,
        }
    }
}

impl ChangeLogConfig {
    /// Defaults overridden by `ALERT_CHANGELOG_DIR` / `ALERT_CHANGELOG_KEEP`.
    /// An unparsable keep value falls back to the default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(dir) = std::env::var(ENV_EXPORT_DIR) {
            if !dir.is_empty() {
                cfg.export_dir = PathBuf::from(dir);
            }
        }
        if let Ok(raw) = std::env::var(ENV_KEEP) {
            match raw.parse::<usize>() {
                Ok(keep) => cfg.default_keep = keep,
                Err(_) => tracing::warn!("Ignoring invalid {}={:?}", ENV_KEEP, raw),
            }
        }
        cfg
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ChangeLogConfig::default();
        assert_eq!(cfg.export_dir, PathBuf::from("data-exports"));
        assert_eq!(cfg.default_keep, 50);
    }

    #[test]
    fn test_with_export_dir() {
        let cfg = ChangeLogConfig::default().with_export_dir("/tmp/changes");
        assert_eq!(cfg.export_dir, PathBuf::from("/tmp/changes"));
        assert_eq!(cfg.default_keep, DEFAULT_KEEP);
    }
}
