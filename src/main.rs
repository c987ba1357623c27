use std::error::Error;

use chrono::Local;
use clap::Parser;
use krishi_news::cli::{Cli, Command};
use krishi_news::config::AppConfig;
use krishi_news::models::ApiResponse;
use krishi_news::outputs::json;
use krishi_news::scrapers::{self, HomepageSource, krishijagran::HttpSource};
use krishi_news::server;
use krishi_news::utils::ensure_writable_dir;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = AppConfig::load(args.config.as_deref()).await?;

    match args.command {
        Command::Serve { port, frontend_url } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(origin) = frontend_url.as_deref() {
                config.allow_origin(origin);
            }
            server::serve(&config).await?;
        }
        Command::Scrape {
            html_file,
            json_output_dir,
            diagnostics,
        } => {
            let start_time = std::time::Instant::now();

            // Early check: ensure JSON output dir is writable
            if let Some(dir) = json_output_dir.as_deref() {
                if let Err(e) = ensure_writable_dir(dir).await {
                    error!(
                        path = %dir,
                        error = %e,
                        "JSON output directory is not writable (fix perms or choose a different path)"
                    );
                    return Err(e.into());
                }
            }

            let html = match html_file.as_deref() {
                Some(path) => {
                    info!(path, "Reading homepage from file");
                    tokio::fs::read_to_string(path).await?
                }
                None => HttpSource::new(&config)?.fetch().await?,
            };

            let result = scrapers::extract(&html, &config.base_origin, diagnostics)?;

            match json_output_dir.as_deref() {
                Some(dir) => {
                    json::write_snapshot(&result, dir, Local::now()).await?;
                }
                None => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&ApiResponse::Success(result))?
                    );
                }
            }

            let elapsed = start_time.elapsed();
            info!(?elapsed, "Execution complete");
        }
    }

    Ok(())
}
