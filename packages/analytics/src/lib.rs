#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Facet aggregation over filtered crash rows.
//!
//! Each public function computes one report facet from the rows that passed
//! a filter. [`aggregate`] dispatches on [`Facet`]; [`aggregate_all`] runs
//! every facet in report order. Nothing here fails or mutates its input.

pub mod facets;
pub mod summary;

use crash_report_analytics_models::{AggregateResult, Facet, FactorSlot, ReportConfig};
use crash_report_crash_models::CrashRecord;

pub use facets::{
    aggregate_categories, aggregate_day_hour, aggregate_factors, aggregate_geo, aggregate_hours,
    aggregate_person_types, aggregate_severity, aggregate_trend,
};
pub use summary::summarize;

/// Computes one facet.
#[must_use]
pub fn aggregate(facet: Facet, rows: &[&CrashRecord], config: &ReportConfig) -> AggregateResult {
    match facet {
        Facet::Trend => AggregateResult::Trend(aggregate_trend(rows, config.trend_granularity)),
        Facet::PersonTypeShare => AggregateResult::PersonTypeShare(aggregate_person_types(rows)),
        Facet::CategoryBar => AggregateResult::CategoryBar(aggregate_categories(
            rows,
            config.category_field,
            config.category_limit,
        )),
        Facet::HourlyDistribution => AggregateResult::HourlyDistribution(aggregate_hours(rows)),
        Facet::ContributingFactor1 => AggregateResult::ContributingFactor1(aggregate_factors(
            rows,
            FactorSlot::Vehicle1,
            config.factor_top_n,
        )),
        Facet::ContributingFactor2 => AggregateResult::ContributingFactor2(aggregate_factors(
            rows,
            FactorSlot::Vehicle2,
            config.factor_top_n,
        )),
        Facet::SeverityComparison => AggregateResult::SeverityComparison(aggregate_severity(rows)),
        Facet::DayHourHeatmap => AggregateResult::DayHourHeatmap(aggregate_day_hour(rows)),
        Facet::GeoMap => AggregateResult::GeoMap(aggregate_geo(rows)),
    }
}

/// Computes every facet, in [`Facet::ALL`] order.
#[must_use]
pub fn aggregate_all(rows: &[&CrashRecord], config: &ReportConfig) -> Vec<AggregateResult> {
    log::debug!("Aggregating {} facets over {} rows", Facet::ALL.len(), rows.len());

    Facet::ALL
        .iter()
        .map(|facet| aggregate(*facet, rows, config))
        .collect()
}

/// `count / total`, or 0 when `total` is 0.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
