use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use naver_news_scraper::app::logging::init_tracing;
use naver_news_scraper::app::signal::spawn_shutdown_listener;
use naver_news_scraper::app::AppContext;
use naver_news_scraper::cli::{commands, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let ctx = AppContext::new(cli.config.as_deref(), &cli.output)?;

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_tracing(&ctx.config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        cpus = std::thread::available_parallelism().map_or(1, |n| n.get()),
        "Starting naver-news-scraper"
    );
    info!(
        urls = %cli.urls.display(),
        output = %ctx.output_dir.display(),
        format = ?ctx.config.output.format,
        "Run settings"
    );

    spawn_shutdown_listener(ctx.shutdown.clone());

    let outcome = commands::scrape(&ctx, &cli.urls).await?;
    Ok(outcome.exit_code())
}
