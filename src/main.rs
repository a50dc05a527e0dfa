//! Crawler entry point
//!
//! A single executable with no positional arguments: configuration comes
//! from a YAML file at a well-known path (overridable with `--config`) plus
//! `REDIS_*`/`MDC_*` environment overrides. Exits zero on a clean drain and
//! non-zero on configuration or startup failure.

use clap::Parser;
use monzo_crawler::config::load_config_with_env;
use monzo_crawler::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Distributed single-domain web crawler
///
/// Crawls every reachable page on the seed URL's domain, printing each page
/// with its same-domain links. Multiple instances sharing one Redis
/// instance cooperate on a single crawl without visiting any URL twice.
#[derive(Parser, Debug)]
#[command(name = "monzo-crawler")]
#[command(version)]
#[command(about = "Distributed single-domain web crawler", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, value_name = "FILE", default_value = "crawler-config.yaml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("loading configuration from {}", cli.config.display());
    let config = match load_config_with_env(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "starting crawl of {} with {} workers (frontier at {}:{})",
        config.start_url,
        config.concurrency,
        config.redis.host,
        config.redis.port
    );

    match run_crawl(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Maps the verbosity flags onto an EnvFilter.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("monzo_crawler=info,warn"),
            1 => EnvFilter::new("monzo_crawler=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
