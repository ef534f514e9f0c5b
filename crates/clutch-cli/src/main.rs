use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clutch_client::ReqwestFetcher;
use clutch_core::config::{InputConfig, Settings};
use clutch_core::output;
use clutch_core::scrape::{ScrapeService, ScrapeSummary};
use clutch_core::throttle::ThrottledFetcher;

#[derive(Parser)]
#[command(name = "clutch", version, about = "Clutch.co search-results scraper")]
struct Cli {
    /// Input JSON containing search URLs and options
    #[arg(short, long, default_value = "data/inputs.sample.json")]
    input: PathBuf,

    /// Output JSON file for scraped results
    #[arg(short, long, default_value = "data/output.json")]
    output: PathBuf,

    /// Settings JSON file
    #[arg(short, long, default_value = "config/settings.example.json")]
    settings: PathBuf,

    /// Logging level: debug, info, warning, error
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Using input file: {}", cli.input.display());
    tracing::info!("Using settings file: {}", cli.settings.display());
    tracing::info!("Output will be written to: {}", cli.output.display());

    let input = InputConfig::load(&cli.input).context("Failed to load input config")?;
    let settings = Settings::load(&cli.settings);

    let fetcher =
        ReqwestFetcher::from_settings(&settings).context("Failed to create HTTP client")?;
    let max_pages = input.effective_max_pages(&settings);

    let summary = if settings.rate_limit_seconds > 0.0 {
        let delay = Duration::from_secs_f64(settings.rate_limit_seconds);
        ScrapeService::new(ThrottledFetcher::new(fetcher, delay), max_pages)
            .run(&input.search_urls)
            .await
    } else {
        ScrapeService::new(fetcher, max_pages)
            .run(&input.search_urls)
            .await
    };

    output::write_records(&summary.companies, &cli.output)
        .context("Failed to write scraped results")?;

    print_summary(&summary, &cli.output);
    Ok(())
}

/// Map the CLI log level to an env-filter default; unknown levels fall back
/// to info. An explicit `RUST_LOG` still wins.
fn log_filter(level: &str) -> EnvFilter {
    let level = match level.to_lowercase().as_str() {
        "debug" => "debug",
        "warning" | "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn print_summary(summary: &ScrapeSummary, output: &std::path::Path) {
    println!(
        "Scraped {} unique compan{} from {} search URL{} ({} page{} fetched)",
        summary.companies.len(),
        if summary.companies.len() == 1 { "y" } else { "ies" },
        summary.urls_processed,
        if summary.urls_processed == 1 { "" } else { "s" },
        summary.pages_fetched,
        if summary.pages_fetched == 1 { "" } else { "s" },
    );
    println!("Results saved to {}", output.display());
}
