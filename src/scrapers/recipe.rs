//! Declarative section recipes and the generic runner that executes them.
//!
//! A [`SectionRecipe`] names where a homepage region lives and where each
//! record field sits inside one of its items. [`SectionExtractor`] is the
//! compiled form; running it over a document yields that section's records
//! and fills in its [`SectionDiagnostics`].

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::models::{NewsRecord, Section};
use crate::scrapers::diagnostics::{FailureReason, SectionDiagnostics};
use crate::scrapers::fields::{Location, LocationSpec, parse_selector, resolve};
use crate::scrapers::urls::normalize_url;

/// Where one section's records live in the page.
#[derive(Debug, Clone, Copy)]
pub struct SectionRecipe {
    pub section: Section,
    /// Matched against the whole document.
    pub root: &'static str,
    /// When set, every root match is a named group and this resolves the
    /// name. Groups whose name is absent are skipped.
    pub group_name: Option<&'static [LocationSpec]>,
    /// Matched under each root. When absent the roots are the items.
    pub item: Option<&'static str>,
    pub title: &'static [LocationSpec],
    pub link: &'static [LocationSpec],
    pub image: &'static [LocationSpec],
    pub read_more_link: &'static [LocationSpec],
}

/// A [`SectionRecipe`] with every selector parsed.
#[derive(Debug)]
pub struct SectionExtractor {
    section: Section,
    root: Selector,
    group_name: Option<Vec<Location>>,
    item: Option<Selector>,
    title: Vec<Location>,
    link: Vec<Location>,
    image: Vec<Location>,
    read_more_link: Vec<Location>,
}

impl SectionExtractor {
    pub fn compile(recipe: &SectionRecipe) -> Result<Self> {
        Ok(Self {
            section: recipe.section,
            root: parse_selector(recipe.root)?,
            group_name: recipe.group_name.map(Location::compile_all).transpose()?,
            item: recipe.item.map(parse_selector).transpose()?,
            title: Location::compile_all(recipe.title)?,
            link: Location::compile_all(recipe.link)?,
            image: Location::compile_all(recipe.image)?,
            read_more_link: Location::compile_all(recipe.read_more_link)?,
        })
    }

    /// Extract this section's records from `document` in document order.
    #[instrument(level = "debug", skip_all, fields(section = %self.section))]
    pub fn run(
        &self,
        document: &Html,
        base_origin: &str,
        diagnostics: &mut SectionDiagnostics,
    ) -> Vec<NewsRecord> {
        let mut records = Vec::new();
        let mut visited = HashSet::new();

        for root in document.select(&self.root) {
            let category = match &self.group_name {
                Some(locations) => match resolve(root, locations) {
                    Some(name) => Some(name),
                    None => {
                        debug!("Skipping group without a name");
                        diagnostics.skipped_groups += 1;
                        continue;
                    }
                },
                None => None,
            };

            let items: Vec<ElementRef<'_>> = match &self.item {
                Some(item) => root.select(item).collect(),
                None => vec![root],
            };

            for item in items {
                // Nested roots reach the same item more than once.
                if !visited.insert(item.id()) {
                    continue;
                }
                let index = diagnostics.found();
                match self.build_record(item, category.as_deref(), base_origin) {
                    Ok(record) => {
                        diagnostics.parsed();
                        records.push(record);
                    }
                    Err(reason) => {
                        debug!(index, ?reason, "Dropping incomplete item");
                        diagnostics.failed(index, reason, category.as_deref());
                    }
                }
            }
        }

        debug!(
            found = diagnostics.elements_found,
            parsed = diagnostics.elements_parsed,
            "Section extracted"
        );
        records
    }

    fn build_record(
        &self,
        item: ElementRef<'_>,
        category: Option<&str>,
        base_origin: &str,
    ) -> std::result::Result<NewsRecord, FailureReason> {
        let title = resolve(item, &self.title);
        let link = resolve(item, &self.link);
        let (title, link) = match (title, link) {
            (Some(title), Some(link)) => (title, link),
            (title, link) => {
                return Err(FailureReason::from_presence(title.is_some(), link.is_some())
                    .unwrap_or(FailureReason::MissingTitleAndLink));
            }
        };

        let absolute = |path: String| normalize_url(&path, base_origin);
        Ok(NewsRecord {
            section: self.section,
            category: category.map(str::to_owned),
            title,
            link: absolute(link),
            image: resolve(item, &self.image).map(absolute),
            read_more_link: resolve(item, &self.read_more_link).map(absolute),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::scrapers::fields::image_at;

    const BASE: &str = "https://odia.krishijagran.com";

    const TITLE: &[LocationSpec] = &[LocationSpec::attr("a", "title"), LocationSpec::text("a")];
    const LINK: &[LocationSpec] = &[LocationSpec::attr("a", "href")];
    const IMAGE: &[LocationSpec] = &image_at("img");

    const LIST: SectionRecipe = SectionRecipe {
        section: Section::Trending,
        root: ".box",
        group_name: None,
        item: Some("li"),
        title: TITLE,
        link: LINK,
        image: IMAGE,
        read_more_link: &[],
    };

    fn run(recipe: &SectionRecipe, html: &str) -> (Vec<NewsRecord>, SectionDiagnostics) {
        let document = Html::parse_document(html);
        let extractor = SectionExtractor::compile(recipe).unwrap();
        let mut diagnostics = SectionDiagnostics::default();
        let records = extractor.run(&document, BASE, &mut diagnostics);
        (records, diagnostics)
    }

    #[test]
    fn test_items_in_document_order() {
        let (records, diag) = run(
            &LIST,
            r#"<ul class="box">
                <li><a href="/one" title="One"></a></li>
                <li><a href="/two">Two</a></li>
            </ul>"#,
        );
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two"]);
        assert_eq!(records[0].link, "https://odia.krishijagran.com/one");
        assert_eq!(diag.elements_found, 2);
        assert_eq!(diag.elements_parsed, 2);
        assert!(diag.failures.is_empty());
    }

    #[test]
    fn test_incomplete_items_are_dropped_and_recorded() {
        let (records, diag) = run(
            &LIST,
            r#"<ul class="box">
                <li><a title="No link"></a></li>
                <li><a href="/ok" title="Ok"></a></li>
                <li><span>nothing</span></li>
            </ul>"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(diag.elements_found, 3);
        assert_eq!(diag.elements_parsed, 1);
        assert_eq!(diag.failures.len(), 2);
        assert_eq!(diag.failures[0].index, 0);
        assert_eq!(diag.failures[0].reason, FailureReason::MissingLink);
        assert_eq!(diag.failures[1].index, 2);
        assert_eq!(diag.failures[1].reason, FailureReason::MissingTitleAndLink);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let (records, diag) = run(&LIST, "<div class=\"other\"><li>x</li></div>");
        assert!(records.is_empty());
        assert_eq!(diag, SectionDiagnostics::default());
    }

    #[test]
    fn test_roots_are_items_without_item_selector() {
        let recipe = SectionRecipe {
            section: Section::TopStory,
            item: None,
            ..LIST
        };
        let (records, diag) = run(
            &recipe,
            r#"<div class="box"><a href="/top" title="Top"><img src="/top.jpg"></a></div>"#,
        );
        assert_eq!(diag.elements_found, 1);
        assert_eq!(records[0].section, Section::TopStory);
        assert_eq!(
            records[0].image.as_deref(),
            Some("https://odia.krishijagran.com/top.jpg")
        );
    }

    #[test]
    fn test_nested_roots_visit_items_once() {
        let (records, diag) = run(
            &LIST,
            r#"<div class="box"><ul class="box"><li><a href="/x" title="X"></a></li></ul></div>"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(diag.elements_found, 1);
    }

    #[test]
    fn test_groups_tag_records_and_skip_unnamed() {
        const GROUP: &[LocationSpec] = &[LocationSpec::attr("h3 a", "title")];
        let recipe = SectionRecipe {
            section: Section::Categories,
            root: ".group",
            group_name: Some(GROUP),
            item: Some("li"),
            ..LIST
        };
        let (records, diag) = run(
            &recipe,
            r#"
            <div class="group"><h3><a title="Weather"></a></h3>
                <ul><li><a href="/w1" title="W1"></a></li></ul></div>
            <div class="group"><h3></h3>
                <ul><li><a href="/u1" title="U1"></a></li></ul></div>
            <div class="group"><h3><a title="Market"></a></h3>
                <ul><li><a title="M-no-link"></a></li></ul></div>
            "#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category.as_deref(), Some("Weather"));
        assert_eq!(diag.skipped_groups, 1);
        assert_eq!(diag.elements_found, 2);
        assert_eq!(diag.failures[0].category.as_deref(), Some("Market"));
    }

    #[test]
    fn test_bad_selector_fails_compile() {
        let recipe = SectionRecipe {
            root: "[[broken",
            ..LIST
        };
        assert!(matches!(
            SectionExtractor::compile(&recipe),
            Err(AppError::Selector { .. })
        ));
    }
}
