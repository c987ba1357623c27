//! Command-line interface definitions.
//!
//! Every option can also come from the environment, which is how hosted
//! deployments pass `PORT` and `FRONTEND_URL`.

use clap::{Parser, Subcommand};

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Serve the API on $PORT (default 5000)
/// krishi_news serve
///
/// # Print one extraction with diagnostics
/// krishi_news scrape --diagnostics
///
/// # Extract from a saved page into dated JSON snapshots
/// krishi_news scrape --html-file homepage.html -j ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, global = true, env = "KRISHI_NEWS_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Extra frontend origin allowed by CORS
        #[arg(long, env = "FRONTEND_URL")]
        frontend_url: Option<String>,
    },

    /// Extract the homepage once and print or save the result
    Scrape {
        /// Read HTML from this file instead of fetching the live homepage
        #[arg(long)]
        html_file: Option<String>,

        /// Output directory for dated JSON snapshots (prints to stdout if unset)
        #[arg(short, long)]
        json_output_dir: Option<String>,

        /// Include per-section diagnostics
        #[arg(long)]
        diagnostics: bool,
    },
}
