use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use reccheck_config::Config;
use reccheck_engine::{Checker, render};

use crate::cli::{Format, NameArgs};

pub async fn handle(
    config: Config,
    file: PathBuf,
    names: NameArgs,
    format: Format,
    out: Option<PathBuf>,
) -> Result<()> {
    let names = super::collect_names(&names)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current record");
            flag.store(true, Ordering::Relaxed);
        }
    });

    let checker = Checker::new(config)?.with_cancel_flag(cancel);
    let report = checker
        .check_path(&file, &names)
        .await
        .with_context(|| format!("Failed to check {}", file.display()))?;

    let rendered = render(&report, format.into())?;
    match out {
        Some(path) => write_report(&path, &rendered)?,
        None => print!("{}", rendered),
    }

    tracing::info!(
        "Checked {} students: {} findings, {} unparsed blocks",
        report.students_checked,
        report.findings.len(),
        report.parse_failures.len()
    );
    Ok(())
}

fn write_report(path: &Path, rendered: &str) -> Result<()> {
    std::fs::write(path, rendered)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    eprintln!("✓ Wrote report to {}", path.display());
    Ok(())
}
