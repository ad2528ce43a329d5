// html-archiver: print a self-contained copy of a web page to stdout.
//
// Usage: html-archiver <URL>
// Logging goes to stderr; set RUST_LOG=debug to see every inlined resource.

use anyhow::{Context, Result};
use clap::Parser;
use html_archiver::utils::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use html_archiver::{ArchiverConfig, HtmlArchiver};
use std::time::Duration;

/// Create a self-contained HTML archive of a web page
#[derive(Debug, Parser)]
#[command(name = "html-archiver", version, about)]
struct Cli {
    /// Page to archive (http, https or file URL)
    url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "UA", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Wrong argument count prints usage and exits non-zero
    let cli = Cli::parse();

    let config = ArchiverConfig::builder()
        .request_timeout(Duration::from_secs(cli.timeout))
        .user_agent(cli.user_agent)
        .build()
        .context("Invalid configuration")?;

    let archiver = HtmlArchiver::with_config(config)?;
    let report = archiver
        .archive_url_report(&cli.url)
        .await
        .with_context(|| format!("Failed to archive {}", cli.url))?;

    if report.has_warnings() {
        log::warn!(
            "{} of {} resources could not be inlined",
            report.warnings.len(),
            report.total()
        );
    }

    println!("{}", report.html);
    Ok(())
}
