// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alert_changelog::entry::EntryName;
use alert_changelog::Operation;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

pub fn run(dir: &Path, operation: Option<&str>) -> anyhow::Result<()> {
    let filter = Operation::parse_filter(operation)?;
    let names = super::open_index(dir).list(filter)?;

    if names.is_empty() {
        println!("\nNo change log entries in {:?}\n", dir);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Entry", "Operation", "Recorded At"]);

    for name in &names {
        let (op, at) = match EntryName::parse(name) {
            Some(entry) => (
                entry.operation.to_string(),
                entry.recorded_at.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            ),
            None => ("?".to_string(), String::new()),
        };
        table.add_row(vec![name.clone(), op, at]);
    }

    println!("\nChange Log ({} entries)\n", names.len());
    println!("{table}\n");

    Ok(())
}
