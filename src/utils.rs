//! Utility functions for edition naming, log-friendly truncation, and output
//! directory checks.

use std::fs as stdfs;

use chrono::{NaiveTime, Timelike};
use tokio::fs;
use tracing::{info, instrument};

use crate::error::Result;

/// Classify a local time into the snapshot edition it belongs to.
///
/// - **Morning**: 00:00 - 08:00
/// - **Afternoon**: 08:00 - 16:00
/// - **Evening**: 16:00 - 24:00
pub fn edition_for(time: NaiveTime) -> &'static str {
    match time.hour() {
        0..8 => "morning",
        8..16 => "afternoon",
        _ => "evening",
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a char
/// boundary) with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        // Odia characters are three bytes each in UTF-8.
        let s = "ପାଣିପାଗ";
        let result = truncate_for_log(s, 4);
        assert!(result.starts_with("ପ"));
        assert!(result.ends_with(&format!("(+{} bytes)", s.len() - 3)));
    }

    #[test]
    fn test_edition_boundaries() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(edition_for(at(0, 0)), "morning");
        assert_eq!(edition_for(at(7, 59)), "morning");
        assert_eq!(edition_for(at(8, 0)), "afternoon");
        assert_eq!(edition_for(at(15, 59)), "afternoon");
        assert_eq!(edition_for(at(16, 0)), "evening");
        assert_eq!(edition_for(at(23, 59)), "evening");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("json/2025");
        ensure_writable_dir(nested.to_str().unwrap()).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
