//! # Krishi News
//!
//! Scrapes the [Krishi Jagran Odia](https://odia.krishijagran.com) homepage
//! into a flat, section-tagged list of article records and serves it as
//! JSON.
//!
//! ## Architecture
//!
//! 1. **Fetching**: [`scrapers::krishijagran::HttpSource`] downloads the
//!    homepage with a bounded timeout
//! 2. **Extraction**: [`scrapers::extract`] runs one recipe per homepage
//!    section over the parsed document and collects [`models::NewsRecord`]s
//! 3. **Output**: [`server`] serves the result at `/api/news`;
//!    [`outputs::json`] writes dated snapshots for the `scrape` command
//!
//! ```
//! use krishi_news::scrapers::{extract, krishijagran::BASE_ORIGIN};
//!
//! let html = r#"<div class="latest-news"><ul class="list-unstyled">
//!     <li><a href="/news/seed-kits" title="Seed kits distributed"></a></li>
//! </ul></div>"#;
//! let result = extract(html, BASE_ORIGIN, false).unwrap();
//! assert_eq!(result.count, 1);
//! assert_eq!(result.data[0].link, "https://odia.krishijagran.com/news/seed-kits");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod server;
pub mod utils;
