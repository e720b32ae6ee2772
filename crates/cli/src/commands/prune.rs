// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alert_changelog::retention::validate_keep;
use alert_changelog::Operation;
use std::path::Path;

pub fn run(dir: &Path, operation: Option<&str>, keep: Option<i64>) -> anyhow::Result<()> {
    let filter = Operation::parse_filter(operation)?;
    let retention = super::open_retention(dir);
    let keep = match keep {
        Some(k) => validate_keep(k)?,
        None => retention.default_keep(),
    };

    let report = retention.prune_with_report(filter, keep)?;
    println!(
        "Removed {} entries. Kept {} most recent.",
        report.deleted, report.kept
    );
    Ok(())
}
