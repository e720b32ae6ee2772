// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! alert-changelog: captures every Alert mutation as an immutable,
//! timestamped JSON entry in a file-backed change log, and lists, counts,
//! fetches and prunes those entries.

pub mod config;
pub mod error;
pub mod alert;
pub mod record;
pub mod entry;
pub mod directory;
pub mod hooks;
pub mod writer;
pub mod repository;
pub mod index;
pub mod retention;
pub mod changelog;

pub use alert::Alert;
pub use changelog::ChangeLog;
pub use config::ChangeLogConfig;
pub use error::{ChangeLogError, Result};
pub use hooks::{ChangeHooks, ChangeObserver};
pub use index::{LogIndex, LogStatus};
pub use record::{ChangeRecord, Operation};
pub use repository::AlertRepository;
pub use retention::{PruneReport, RetentionManager};
pub use writer::ChangeLogWriter;
