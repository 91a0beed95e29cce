use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use url::Url;

use member_scraper::browser::HttpBrowser;
use member_scraper::config::{CrawlConfig, Overrides};
use member_scraper::crawler;
use member_scraper::parser::{self, ProfileDocument};

#[derive(Parser)]
#[command(name = "member_scraper", about = "Member directory profile scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the directory and write every profile to a JSON array
    Crawl {
        /// JSON config file (missing keys use defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory listing URL (page 1)
        #[arg(short, long)]
        url: Option<String>,
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Delay after each page load, in milliseconds
        #[arg(long)]
        settle_ms: Option<u64>,
    },
    /// Extract one saved profile page and print its record
    Extract {
        /// Saved profile HTML
        file: PathBuf,
        /// URL the page was saved from, for resolving relative links
        #[arg(short, long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Crawl {
            config,
            url,
            output,
            settle_ms,
        } => {
            let overrides = Overrides {
                start_url: url,
                output,
                settle_ms,
            };
            let cfg = CrawlConfig::load(config.as_deref(), &overrides)?;

            let browser = HttpBrowser::launch(&cfg).context("Failed to start browser session")?;
            println!("Crawling {} -> {}", cfg.start_url, cfg.output.display());
            let stats = crawler::run(browser, &cfg).await?;
            println!(
                "Done: {} entries ({} written, {} skipped, {} without data).",
                stats.entries, stats.written, stats.skipped, stats.empty
            );
            Ok(())
        }
        Commands::Extract { file, base_url } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let base = match base_url {
                Some(u) => Url::parse(&u).with_context(|| format!("Invalid base URL {}", u))?,
                None => file_url(&file)?,
            };
            let doc = ProfileDocument::parse(&source, base);
            let record = parser::extract_member(&doc, &parser::ProfileSelectors::default());
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn file_url(path: &std::path::Path) -> anyhow::Result<Url> {
    let abs = std::fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    Url::from_file_path(&abs).map_err(|_| anyhow::anyhow!("Not a file path: {}", abs.display()))
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
