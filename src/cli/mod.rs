pub mod commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "naver-news-scraper")]
#[command(about = "Scrape Naver News articles and their comments", version, long_about = None)]
pub struct Cli {
    /// Text file with one article URL per line
    #[arg(short, long)]
    pub urls: PathBuf,

    /// Configuration file (TOML, or JSON by extension); defaults to the user config directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for result files
    #[arg(short, long, default_value = "output/")]
    pub output: PathBuf,
}
