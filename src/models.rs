//! Data models for extracted homepage records and the JSON envelopes served
//! to clients.
//!
//! - [`Section`]: the fixed homepage regions articles are grouped into
//! - [`NewsRecord`]: one article reference pulled out of a section
//! - [`ExtractionResult`]: every record from one homepage snapshot, plus
//!   optional per-section diagnostics
//! - [`ApiResponse`]: the `status`-tagged envelope written by the server and
//!   the `scrape` command
//!
//! Field names are camelCase on the wire to match what existing frontends
//! consume (`readMoreLink`, `elementsFound`).

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::scrapers::diagnostics::Diagnostics;

/// A homepage region.
///
/// Variants are declared in processing order, so `Ord` and [`Section::ALL`]
/// both follow the order records appear in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    TopStory,
    LeftList,
    RightList,
    AnimalHusbandry,
    HealthLifestyle,
    Categories,
    Trending,
    LatestNews,
}

impl Section {
    /// Every section, in processing order.
    pub const ALL: [Section; 8] = [
        Section::TopStory,
        Section::LeftList,
        Section::RightList,
        Section::AnimalHusbandry,
        Section::HealthLifestyle,
        Section::Categories,
        Section::Trending,
        Section::LatestNews,
    ];

    /// The wire name of the section.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::TopStory => "top_story",
            Section::LeftList => "left_list",
            Section::RightList => "right_list",
            Section::AnimalHusbandry => "animal_husbandry",
            Section::HealthLifestyle => "health_lifestyle",
            Section::Categories => "categories",
            Section::Trending => "trending",
            Section::LatestNews => "latest_news",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One article reference extracted from the homepage.
///
/// Only built once both `title` and `link` resolved; every URL field is
/// absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRecord {
    /// The section whose extractor produced this record.
    pub section: Section,
    /// The category group name. Only set for [`Section::Categories`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The headline.
    pub title: String,
    /// Absolute URL of the article.
    pub link: String,
    /// Absolute URL of the thumbnail, if any candidate attribute carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Absolute URL of the secondary call-to-action link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_more_link: Option<String>,
}

/// Every record extracted from one homepage snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Number of records in `data`.
    pub count: usize,
    /// Records in section order, then document order.
    pub data: Vec<NewsRecord>,
    /// Per-section counters, present only when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

impl ExtractionResult {
    pub fn new(data: Vec<NewsRecord>, diagnostics: Option<Diagnostics>) -> Self {
        Self {
            count: data.len(),
            data,
            diagnostics,
        }
    }

    /// Records tagged with `section`, in output order.
    pub fn in_section(&self, section: Section) -> impl Iterator<Item = &NewsRecord> {
        self.data.iter().filter(move |r| r.section == section)
    }
}

/// Body of a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// What the caller asked for and did not get.
    pub message: String,
    /// The underlying failure.
    pub error: String,
    /// RFC 3339 time the failure was reported.
    pub timestamp: String,
}

/// The JSON envelope returned by `/api/news` and printed by `scrape`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    Success(ExtractionResult),
    Error(ApiError),
}

impl ApiResponse {
    pub fn error(message: impl Into<String>, error: impl fmt::Display) -> Self {
        ApiResponse::Error(ApiError {
            message: message.into(),
            error: error.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(section: Section) -> NewsRecord {
        NewsRecord {
            section,
            category: None,
            title: "Paddy procurement begins".to_string(),
            link: "https://odia.krishijagran.com/news/paddy".to_string(),
            image: None,
            read_more_link: None,
        }
    }

    #[test]
    fn test_section_wire_names_match_serde() {
        for section in Section::ALL {
            let json = serde_json::to_value(section).unwrap();
            assert_eq!(json, json!(section.as_str()));
        }
    }

    #[test]
    fn test_section_order_follows_declaration() {
        let mut shuffled = vec![Section::LatestNews, Section::TopStory, Section::Categories];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Section::TopStory, Section::Categories, Section::LatestNews]
        );
    }

    #[test]
    fn test_record_omits_absent_optionals() {
        let json = serde_json::to_value(record(Section::Trending)).unwrap();
        assert_eq!(
            json,
            json!({
                "section": "trending",
                "title": "Paddy procurement begins",
                "link": "https://odia.krishijagran.com/news/paddy",
            })
        );
    }

    #[test]
    fn test_record_uses_camel_case_read_more_link() {
        let mut r = record(Section::HealthLifestyle);
        r.read_more_link = Some("https://odia.krishijagran.com/health-lifestyle".to_string());
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(
            json["readMoreLink"],
            json!("https://odia.krishijagran.com/health-lifestyle")
        );
    }

    #[test]
    fn test_success_envelope_shape() {
        let result = ExtractionResult::new(vec![record(Section::TopStory)], None);
        let json = serde_json::to_value(ApiResponse::Success(result)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert!(json.get("diagnostics").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let json =
            serde_json::to_value(ApiResponse::error("Failed to fetch news data", "timed out"))
                .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Failed to fetch news data");
        assert_eq!(json["error"], "timed out");
        assert!(json["timestamp"].as_str().is_some());
    }

    #[test]
    fn test_in_section_filters() {
        let result = ExtractionResult::new(
            vec![record(Section::TopStory), record(Section::Trending)],
            None,
        );
        assert_eq!(result.in_section(Section::Trending).count(), 1);
        assert_eq!(result.in_section(Section::LatestNews).count(), 0);
    }
}
