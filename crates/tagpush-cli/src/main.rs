mod commands;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Parser)]
#[command(name = "tagpush", about = "Build, tag and push docker-compose releases")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a compose project and write a release compose file that uses registry images
    Compose(commands::ComposeArgs),
    /// Build a single Dockerfile and tag it as a release
    Dockerfile(commands::DockerfileArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let env_file = Path::new(".env");
    if env_file.is_file() {
        dotenvy::from_path(env_file).context("failed to load .env")?;
        tracing::debug!("loaded .env");
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Compose(args) => commands::compose(args).await?,
        Commands::Dockerfile(args) => commands::dockerfile(args).await?,
    }

    Ok(())
}
