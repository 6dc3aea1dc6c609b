#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crash report bundle types.
//!
//! A [`ReportBundle`] is the complete answer to one query: the filters that
//! were applied, how they were derived from the query text, headline
//! numbers, and one [`FacetReport`] per facet in fixed order.

use crash_report_analytics_models::{AggregateResult, Facet, SummaryStats};
use crash_report_filter_models::{Extraction, FilterSpec};
use serde::{Deserialize, Serialize};

/// One facet's result paired with its one-sentence insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetReport {
    /// Facet this entry covers.
    pub facet: Facet,
    /// Panel title.
    pub title: String,
    /// Aggregated data.
    pub result: AggregateResult,
    /// Templated summary sentence.
    pub insight: String,
}

/// Everything produced for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBundle {
    /// Filters applied to the dataset.
    pub filters: FilterSpec,
    /// Human-readable form of `filters`.
    pub description: String,
    /// Phrases recognized in the query text, in text order.
    pub trace: Vec<Extraction>,
    /// Query tokens that matched nothing.
    pub unmatched: Vec<String>,
    /// Headline numbers over the filtered rows.
    pub summary: SummaryStats,
    /// One entry per facet, in [`Facet::ALL`] order.
    pub facets: Vec<FacetReport>,
}

impl ReportBundle {
    /// Returns the entry for `facet`.
    #[must_use]
    pub fn facet(&self, facet: Facet) -> Option<&FacetReport> {
        self.facets.iter().find(|f| f.facet == facet)
    }

    /// Returns `true` if no rows matched the filters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.summary.total_records == 0
    }
}
