use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vinyl_unwrapped::config::{
    check_dotenv, resolve_output_dir, AppConfig, CliConfig, EnvConfig, FileConfig,
};
use vinyl_unwrapped::generator::generate_collection;
use vinyl_unwrapped::writer::list_years;

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Generate the Vinyl Unwrapped collection JSON for a specific year.
///
/// Reads DISCOGS_TOKEN (required), DISCOGS_USERNAME, ENABLE_DEBUG and
/// DISCOGS_RATE_LIMIT_DELAY from the environment or a .env file.
#[derive(Parser, Debug)]
#[command(version)]
struct CliArgs {
    /// Year to generate collection data for (default: current year).
    #[clap(long, value_parser = clap::value_parser!(i32).range(1..=9999))]
    pub year: Option<i32>,

    /// Directory the collection_<year>.json files are written to.
    #[clap(long, value_parser = parse_path)]
    pub output_dir: Option<PathBuf>,

    /// Path to a TOML config file.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Discogs username whose collection is read.
    #[clap(long)]
    pub username: Option<String>,

    /// Seconds to wait between pages, and after a rate limit without Retry-After.
    #[clap(long)]
    pub delay_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shows the years that already have a collection file, newest first.
    Years,
}

fn init_logging(debug: bool) -> Result<()> {
    let default_level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // A missing .env file is fine, real environment variables still apply
    check_dotenv(dotenvy::dotenv())?;
    let env = EnvConfig::from_env()?;

    init_logging(env.enable_debug)?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config = CliConfig {
        username: cli_args.username,
        delay_secs: cli_args.delay_secs,
        output_dir: cli_args.output_dir,
    };

    if let Some(Command::Years) = cli_args.command {
        let output_dir = resolve_output_dir(&cli_config, file_config.as_ref());
        for year in list_years(&output_dir).await? {
            println!("{}", year);
        }
        return Ok(());
    }

    let config = AppConfig::resolve(&cli_config, &env, file_config)?;
    let year = cli_args.year.unwrap_or_else(|| chrono::Local::now().year());

    let outcome = generate_collection(&config, year)
        .await
        .with_context(|| format!("Collection generation for {} failed", year))?;

    info!(
        "Wrote {} releases added in {} to {}",
        outcome.entries.len(),
        year,
        outcome.path.display()
    );
    Ok(())
}
