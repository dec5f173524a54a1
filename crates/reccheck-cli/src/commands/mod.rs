pub mod check;
pub mod config;
pub mod redact;

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::NameArgs;

/// Names from `--name` flags and the optional names file, blanks dropped
pub fn collect_names(args: &NameArgs) -> Result<Vec<String>> {
    let mut names: Vec<String> = args.names.iter().map(|n| n.trim().to_string()).collect();
    if let Some(path) = &args.names_file {
        names.extend(read_names_file(path)?);
    }
    names.retain(|n| !n.is_empty());
    Ok(names)
}

fn read_names_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read names file {}", path.display()))?;
    Ok(content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}
