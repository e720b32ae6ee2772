// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::Path;

/// Print one entry. Content that is not JSON is printed as-is.
pub fn run(dir: &Path, name: &str) -> anyhow::Result<()> {
    let content = super::open_index(dir).get(name)?;
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", content),
    }
    Ok(())
}
