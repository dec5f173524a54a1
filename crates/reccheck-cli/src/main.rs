mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use reccheck_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so reports on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let explicit = cli.config.as_deref();

    match cli.command {
        cli::Commands::Check {
            file,
            names,
            format,
            out,
        } => {
            let config = Config::resolve(explicit)?;
            commands::check::handle(config, file, names, format, out).await
        }
        cli::Commands::Redact { file, names } => {
            let config = Config::resolve(explicit)?;
            commands::redact::handle(config, file, names).await
        }
        cli::Commands::Config(cmd) => commands::config::handle(cmd, explicit),
    }
}
