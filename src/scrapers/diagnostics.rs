//! Per-section counters describing how an extraction went.
//!
//! Extractors write into a [`Diagnostics`] map local to one extraction call.
//! Nothing here feeds back into which records are emitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Section;

/// Diagnostics for every section that ran, in processing order.
pub type Diagnostics = BTreeMap<Section, SectionDiagnostics>;

/// Why a candidate element did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    MissingTitle,
    MissingLink,
    MissingTitleAndLink,
}

impl FailureReason {
    /// Classify which required fields were absent, or `None` if both resolved.
    pub fn from_presence(has_title: bool, has_link: bool) -> Option<Self> {
        match (has_title, has_link) {
            (true, true) => None,
            (false, true) => Some(FailureReason::MissingTitle),
            (true, false) => Some(FailureReason::MissingLink),
            (false, false) => Some(FailureReason::MissingTitleAndLink),
        }
    }
}

/// A candidate element that was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// Position of the element among everything the section visited.
    pub index: usize,
    /// The category group the element sat in, for the categories section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub reason: FailureReason,
}

/// Counters for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDiagnostics {
    /// Candidate elements located by the root/item selectors.
    pub elements_found: usize,
    /// Elements that yielded a record.
    pub elements_parsed: usize,
    /// Elements that were dropped, and why.
    #[serde(default)]
    pub failures: Vec<ExtractionFailure>,
    /// Category groups skipped because their name did not resolve.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped_groups: usize,
    /// Set when the section could not run at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SectionDiagnostics {
    /// Count a visited element and return its index.
    pub fn found(&mut self) -> usize {
        let index = self.elements_found;
        self.elements_found += 1;
        index
    }

    pub fn parsed(&mut self) {
        self.elements_parsed += 1;
    }

    pub fn failed(&mut self, index: usize, reason: FailureReason, category: Option<&str>) {
        self.failures.push(ExtractionFailure {
            index,
            category: category.map(str::to_owned),
            reason,
        });
    }
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}
