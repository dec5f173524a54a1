use std::path::Path;

use anyhow::{Context, Result};
use reccheck_config::{Config, PROJECT_FILE};

use crate::cli::ConfigCommands;

pub fn handle(cmd: ConfigCommands, explicit: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => init(force),
        ConfigCommands::Show => show(explicit),
        ConfigCommands::Path => path(explicit),
    }
}

fn init(force: bool) -> Result<()> {
    let path = std::env::current_dir()?.join(PROJECT_FILE);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save(&path)?;
    println!("✓ Created {}", path.display());
    println!("  Edit [subjects] and [terms] to match your school's policy");
    Ok(())
}

fn show(explicit: Option<&Path>) -> Result<()> {
    let config = Config::resolve(explicit)?;
    let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    print!("{}", content);
    Ok(())
}

fn path(explicit: Option<&Path>) -> Result<()> {
    if let Some(path) = explicit {
        println!("{}", path.display());
        return Ok(());
    }
    let current = std::env::current_dir()?;
    match Config::find_project_file_from(&current) {
        Some(project) => println!("{}", project.display()),
        None => println!("{}", Config::config_path().display()),
    }
    Ok(())
}
