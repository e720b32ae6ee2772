// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

pub fn run(dir: &Path) -> anyhow::Result<()> {
    let status = super::open_index(dir).status()?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Property", "Value"]);

    table.add_row(vec!["Status".to_string(), status.label().to_string()]);
    table.add_row(vec!["Directory".to_string(), status.export_directory.clone()]);
    table.add_row(vec!["Total Entries".to_string(), status.total_files.to_string()]);
    for (op, count) in &status.per_operation_counts {
        table.add_row(vec![format!("{} Entries", op), count.to_string()]);
    }

    println!("\nChange Log Status");
    println!("-----------------");
    println!("{table}\n");

    Ok(())
}
