//! Output generation for the `scrape` command.
//!
//! - [`json`]: writes extraction results as dated JSON snapshots

pub mod json;
