//! Ordered-fallback field resolution.
//!
//! A field is described by a list of [`LocationSpec`]s: a selector relative
//! to the item element plus what to read from the elements it matches.
//! [`resolve`] walks the list in order and returns the first value that is
//! not blank, so markup that moves an attribute around (lazy-loaded images
//! carry `data-src` on some sections and only `src` on others) still
//! resolves.

use scraper::{ElementRef, Selector};

use crate::error::{AppError, Result};

/// What to read from a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    /// The value of the named attribute.
    Attr(&'static str),
    /// The element's text content, whitespace collapsed.
    Text,
}

/// One candidate location for a field, as declared in a recipe.
///
/// An empty selector reads from the item element itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationSpec {
    pub selector: &'static str,
    pub read: Read,
}

impl LocationSpec {
    pub const fn attr(selector: &'static str, name: &'static str) -> Self {
        Self {
            selector,
            read: Read::Attr(name),
        }
    }

    pub const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            read: Read::Text,
        }
    }
}

/// Image attributes in priority order. Lazy loaders keep the real URL in a
/// `data-*` attribute and leave a placeholder in `src`.
pub const IMAGE_ATTRS: [&str; 4] = ["data-src", "data-lazy-src", "data-original", "src"];

/// Candidate locations for an image found at `selector`, lazy attributes
/// first.
pub const fn image_at(selector: &'static str) -> [LocationSpec; 4] {
    [
        LocationSpec::attr(selector, IMAGE_ATTRS[0]),
        LocationSpec::attr(selector, IMAGE_ATTRS[1]),
        LocationSpec::attr(selector, IMAGE_ATTRS[2]),
        LocationSpec::attr(selector, IMAGE_ATTRS[3]),
    ]
}

/// A [`LocationSpec`] with its selector parsed.
#[derive(Debug)]
pub struct Location {
    selector: Option<Selector>,
    read: Read,
}

impl Location {
    pub fn compile(spec: &LocationSpec) -> Result<Self> {
        let selector = if spec.selector.trim().is_empty() {
            None
        } else {
            Some(parse_selector(spec.selector)?)
        };
        Ok(Self {
            selector,
            read: spec.read,
        })
    }

    /// Compile every spec, failing on the first bad selector.
    pub fn compile_all(specs: &[LocationSpec]) -> Result<Vec<Self>> {
        specs.iter().map(Self::compile).collect()
    }

    /// Attributes come from the first match only. Text comes from the first
    /// match whose text is not blank, so an image-only anchor ahead of the
    /// headline anchor does not hide the headline.
    fn read_from(&self, node: ElementRef<'_>) -> Option<String> {
        match (&self.selector, self.read) {
            (Some(selector), Read::Attr(name)) => attr_of(node.select(selector).next()?, name),
            (None, Read::Attr(name)) => attr_of(node, name),
            (Some(selector), Read::Text) => node.select(selector).find_map(text_of),
            (None, Read::Text) => text_of(node),
        }
    }
}

/// Return the first non-blank value found at `locations` under `node`.
pub fn resolve(node: ElementRef<'_>, locations: &[Location]) -> Option<String> {
    locations.iter().find_map(|location| location.read_from(node))
}

pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn attr_of(element: ElementRef<'_>, name: &str) -> Option<String> {
    let value = element.value().attr(name)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn text_of(element: ElementRef<'_>) -> Option<String> {
    let value = collapse_whitespace(&element.text().collect::<String>());
    (!value.is_empty()).then_some(value)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    fn compile(specs: &[LocationSpec]) -> Vec<Location> {
        Location::compile_all(specs).unwrap()
    }

    #[test]
    fn test_lazy_attribute_wins_over_src() {
        let doc = Html::parse_fragment(
            r#"<div class="item"><img src="/placeholder.gif" data-src="/real.jpg"></div>"#,
        );
        let item = first(&doc, ".item");
        assert_eq!(
            resolve(item, &compile(&image_at("img"))),
            Some("/real.jpg".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_src() {
        let doc = Html::parse_fragment(r#"<div class="item"><img src="/eager.jpg"></div>"#);
        let item = first(&doc, ".item");
        assert_eq!(
            resolve(item, &compile(&image_at("img"))),
            Some("/eager.jpg".to_string())
        );
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let doc = Html::parse_fragment(
            r#"<div class="item"><a href="/x" title="   ">  Heatwave   eases
            by weekend </a></div>"#,
        );
        let item = first(&doc, ".item");
        let locations = compile(&[LocationSpec::attr("a", "title"), LocationSpec::text("a")]);
        assert_eq!(
            resolve(item, &locations),
            Some("Heatwave eases by weekend".to_string())
        );
    }

    #[test]
    fn test_empty_selector_reads_node_itself() {
        let doc = Html::parse_fragment(r#"<a class="item" href="/self">Self</a>"#);
        let item = first(&doc, ".item");
        let locations = compile(&[LocationSpec::attr("", "href")]);
        assert_eq!(resolve(item, &locations), Some("/self".to_string()));
    }

    #[test]
    fn test_no_match_is_absent() {
        let doc = Html::parse_fragment(r#"<div class="item"><span>text</span></div>"#);
        let item = first(&doc, ".item");
        let locations = compile(&[LocationSpec::attr("a", "href"), LocationSpec::text("a")]);
        assert_eq!(resolve(item, &locations), None);
    }

    #[test]
    fn test_attribute_reads_first_match_only() {
        let doc = Html::parse_fragment(
            r#"<div class="item"><a>no href</a><a href="/second">second</a></div>"#,
        );
        let item = first(&doc, ".item");
        let locations = compile(&[LocationSpec::attr("a", "href")]);
        assert_eq!(resolve(item, &locations), None);
    }

    #[test]
    fn test_text_skips_blank_matches() {
        let doc = Html::parse_fragment(
            r#"<div class="item">
                <div class="img"><a href="/turmeric"><img src="/t.jpg"></a></div>
                <a href="/turmeric">  Turmeric   benefits </a>
                <a class="btn-link" href="/more">Read more</a>
            </div>"#,
        );
        let item = first(&doc, ".item");
        let locations = compile(&[LocationSpec::text("a")]);
        assert_eq!(resolve(item, &locations), Some("Turmeric benefits".to_string()));
    }

    #[test]
    fn test_text_of_node_itself() {
        let doc = Html::parse_fragment(r#"<span class="item"> Odisha  rains </span>"#);
        let item = first(&doc, ".item");
        assert_eq!(
            resolve(item, &compile(&[LocationSpec::text("")])),
            Some("Odisha rains".to_string())
        );
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let err = Location::compile(&LocationSpec::attr("[[broken", "href")).unwrap_err();
        assert!(matches!(err, AppError::Selector { .. }));
    }
}
