//! Homepage extraction pipeline.
//!
//! Raw HTML is loaded into a document once, then every [`SectionRecipe`] is
//! compiled and run against it in order. Records are concatenated in recipe
//! order; within a section they follow document order.
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`fields`] | Ordered-fallback field resolution |
//! | [`urls`] | Absolutizing relative paths |
//! | [`recipe`] | Section recipes and the generic runner |
//! | [`diagnostics`] | Per-section found/parsed counters |
//! | [`krishijagran`] | The portal's recipes and HTTP fetcher |
//!
//! # Failure model
//!
//! Only an empty document fails the whole extraction. A section whose
//! recipe does not compile is logged, marked in its diagnostics, and
//! contributes no records; the remaining sections still run.

use std::future::Future;

use scraper::Html;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::models::ExtractionResult;
use crate::utils::truncate_for_log;

pub mod diagnostics;
pub mod fields;
pub mod krishijagran;
pub mod recipe;
pub mod urls;

use diagnostics::Diagnostics;
use recipe::{SectionExtractor, SectionRecipe};

/// Something that can hand over the homepage HTML.
///
/// The production implementation is [`krishijagran::HttpSource`]; the
/// server is generic over this so it can be driven by fixture HTML.
pub trait HomepageSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Extract every section of the portal homepage from `html`.
pub fn extract(html: &str, base_origin: &str, with_diagnostics: bool) -> Result<ExtractionResult> {
    extract_with(krishijagran::RECIPES, html, base_origin, with_diagnostics)
}

/// Extract the sections described by `recipes` from `html`, in order.
///
/// # Arguments
///
/// * `recipes` - Section recipes; records come out in this order
/// * `html` - The raw homepage document
/// * `base_origin` - Origin prepended to relative links and images
/// * `with_diagnostics` - Attach per-section counters to the result
///
/// # Returns
///
/// Every record the recipes could build. Fails only with
/// [`AppError::EmptyDocument`] when `html` is blank; a recipe that does not
/// compile is reported in that section's diagnostics instead.
///
/// # Examples
///
/// ```
/// use krishi_news::models::Section;
/// use krishi_news::scrapers::extract_with;
/// use krishi_news::scrapers::krishijagran::{BASE_ORIGIN, RECIPES};
///
/// let trending: Vec<_> = RECIPES
///     .iter()
///     .copied()
///     .filter(|r| r.section == Section::Trending)
///     .collect();
/// let html = r#"<aside class="trending-articles"><ul class="list-unstyled">
///     <li><a href="/news/millets" title="Millet mission expands"></a></li>
/// </ul></aside>"#;
///
/// let result = extract_with(&trending, html, BASE_ORIGIN, true).unwrap();
/// assert_eq!(result.count, 1);
/// let diagnostics = result.diagnostics.unwrap();
/// assert_eq!(diagnostics[&Section::Trending].elements_parsed, 1);
/// ```
#[instrument(level = "info", skip_all, fields(bytes = html.len(), sections = recipes.len()))]
pub fn extract_with(
    recipes: &[SectionRecipe],
    html: &str,
    base_origin: &str,
    with_diagnostics: bool,
) -> Result<ExtractionResult> {
    let document = load_document(html)?;
    let mut records = Vec::new();
    let mut diagnostics = Diagnostics::new();

    for recipe in recipes {
        let section_diagnostics = diagnostics.entry(recipe.section).or_default();
        match SectionExtractor::compile(recipe) {
            Ok(extractor) => {
                records.extend(extractor.run(&document, base_origin, section_diagnostics));
            }
            Err(e) => {
                warn!(section = %recipe.section, error = %e, "Section skipped");
                section_diagnostics.error = Some(e.to_string());
            }
        }
    }

    if records.is_empty() {
        warn!(
            preview = %truncate_for_log(html, 300),
            "No records extracted; homepage markup may have changed"
        );
    }
    info!(count = records.len(), "Extracted homepage records");

    Ok(ExtractionResult::new(
        records,
        with_diagnostics.then_some(diagnostics),
    ))
}

/// Parse `html` into a document. Blank input is the only failure.
fn load_document(html: &str) -> Result<Html> {
    if html.trim().is_empty() {
        return Err(AppError::EmptyDocument);
    }
    Ok(Html::parse_document(html))
}
