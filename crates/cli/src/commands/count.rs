// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alert_changelog::Operation;
use std::path::Path;

pub fn run(dir: &Path, operation: Option<&str>) -> anyhow::Result<()> {
    let filter = Operation::parse_filter(operation)?;
    let count = super::open_index(dir).count(filter)?;
    println!("{}", count);
    Ok(())
}
