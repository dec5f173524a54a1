use std::path::PathBuf;

use anyhow::{Context, Result};
use reccheck_config::Config;
use reccheck_engine::Checker;
use reccheck_sources::ExtractorRegistry;

use crate::cli::NameArgs;

pub async fn handle(config: Config, file: PathBuf, names: NameArgs) -> Result<()> {
    let names = super::collect_names(&names)?;
    let document = ExtractorRegistry::new()
        .load(&file)
        .await
        .with_context(|| format!("Failed to extract {}", file.display()))?;

    let checker = Checker::new(config)?;
    let redaction = checker.redact(&document.text, &names);

    println!("{}", redaction.text);

    eprintln!("Redactions: {}", redaction.substitutions);
    for info in &redaction.details {
        eprintln!("  {}: {}", info.redaction_type, info.count);
    }
    Ok(())
}
