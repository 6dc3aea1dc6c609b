#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report assembly and the end-to-end query pipeline.
//!
//! [`generate_report`] takes a query (free text plus explicit selections)
//! through parse, resolve, filter and aggregate, and [`assemble`] packages
//! the results with their insight sentences into a [`ReportBundle`].

pub mod insights;

use crash_report_analytics::{aggregate_all, summarize};
use crash_report_analytics_models::{AggregateResult, ReportConfig, SummaryStats};
use crash_report_dataset::DatasetView;
use crash_report_filter::{DropdownSelections, FilterError, ParsedQuery, parse_with_trace, resolve};
use crash_report_filter_models::FilterSpec;
use crash_report_report_models::{FacetReport, ReportBundle};
use thiserror::Error;

pub use insights::{NO_MATCHING_RECORDS, insight};

/// Errors that abort a single report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An explicit selection was rejected.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Packages facet results into a bundle.
///
/// Results are put in facet order and each one gets its insight sentence.
/// The population for the insights is `summary.total_records`.
#[must_use]
pub fn assemble(
    mut results: Vec<AggregateResult>,
    summary: SummaryStats,
    spec: &FilterSpec,
    query: &ParsedQuery,
) -> ReportBundle {
    results.sort_by_key(AggregateResult::facet);

    let population = summary.total_records;
    let facets = results
        .into_iter()
        .map(|result| {
            let facet = result.facet();
            FacetReport {
                facet,
                title: facet.title().to_string(),
                insight: insight(&result, population),
                result,
            }
        })
        .collect();

    ReportBundle {
        filters: *spec,
        description: spec.describe(),
        trace: query.trace.clone(),
        unmatched: query.unmatched.clone(),
        summary,
        facets,
    }
}

/// Runs one query against `view`.
///
/// `text` is parsed for filters, `explicit` selections override whatever
/// the text implied, and every facet is computed over the matching rows.
///
/// # Errors
///
/// * [`ReportError::Filter`] - an explicit selection is unknown or out of
///   range
pub fn generate_report(
    view: &DatasetView<'_>,
    text: &str,
    explicit: &DropdownSelections,
    config: &ReportConfig,
) -> Result<ReportBundle, ReportError> {
    let query = parse_with_trace(text);
    let explicit = explicit.to_partial()?;
    let spec = resolve(&query.filters, &explicit)?;

    let rows = view.apply(&spec);
    log::info!(
        "Report for {}: {} of {} records match",
        spec.describe(),
        rows.len(),
        view.len()
    );

    let results = aggregate_all(rows.as_slice(), config);
    let summary = summarize(rows.as_slice());

    Ok(assemble(results, summary, &spec, &query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crash_report_analytics_models::Facet;
    use crash_report_crash_models::{
        Borough, CrashRecord, DayOfWeek, InjurySeverity, PersonSex, PersonType, TimeOfDayBand,
        VehicleType,
    };
    use crash_report_filter_models::{DaySelection, TimeOfDay, YearRange};

    #[allow(clippy::too_many_arguments)]
    fn record(
        id: &str,
        date: (i32, u32, u32),
        hour: u8,
        borough: Option<Borough>,
        vehicle: VehicleType,
        person_type: PersonType,
        sex: PersonSex,
        severity: InjurySeverity,
    ) -> CrashRecord {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        CrashRecord {
            collision_id: id.to_string(),
            date,
            hour: Some(hour),
            day_of_week: Some(DayOfWeek::of_date(date)),
            borough,
            latitude: Some(40.7),
            longitude: Some(-73.95),
            vehicle_type_1: Some(vehicle),
            vehicle_type_2: None,
            contributing_factor_1: Some("Driver Inattention/Distraction".to_string()),
            contributing_factor_2: None,
            person_type,
            person_age: Some(35),
            person_sex: Some(sex),
            injury_severity: severity,
        }
    }

    #[rustfmt::skip]
    fn sample() -> Vec<CrashRecord> {
        use Borough::{Brooklyn, Manhattan, Queens};
        use InjurySeverity::{Fatality, Injury, NoInjury};
        use PersonSex::{Female, Male};
        use PersonType::{Driver, Passenger, Pedestrian};
        use VehicleType::{Motorcycle, Sedan, Taxi};

        vec![
            // 2022-06-10 is a Friday, 2022-06-11 a Saturday, 2022-06-12 a Sunday.
            record("1", (2022, 3, 2), 8, Some(Brooklyn), Sedan, Pedestrian, Female, Injury),
            record("2", (2022, 7, 19), 17, Some(Brooklyn), Sedan, Pedestrian, Male, NoInjury),
            record("3", (2021, 3, 2), 8, Some(Brooklyn), Sedan, Pedestrian, Male, Injury),
            record("4", (2022, 6, 10), 23, Some(Queens), Motorcycle, Driver, Male, Fatality),
            record("5", (2022, 6, 10), 14, Some(Queens), Motorcycle, Driver, Male, Fatality),
            record("6", (2022, 6, 10), 23, Some(Queens), Motorcycle, Driver, Male, Injury),
            record("7", (2022, 6, 11), 2, Some(Manhattan), Taxi, Passenger, Female, Injury),
            record("8", (2022, 6, 12), 20, Some(Manhattan), Taxi, Passenger, Male, Fatality),
            record("9", (2022, 6, 13), 20, Some(Manhattan), Taxi, Passenger, Male, Injury),
            record("10", (2022, 6, 11), 3, Some(Manhattan), Taxi, Passenger, Male, NoInjury),
            record("11", (2022, 6, 11), 3, None, Sedan, Driver, Female, NoInjury),
        ]
    }

    fn report(records: &[CrashRecord], text: &str, explicit: &DropdownSelections) -> ReportBundle {
        generate_report(
            &DatasetView::new(records),
            text,
            explicit,
            &ReportConfig::default(),
        )
        .unwrap()
    }

    fn ids(records: &[CrashRecord], spec: &FilterSpec) -> Vec<String> {
        DatasetView::new(records)
            .apply(spec)
            .iter()
            .map(|r| r.collision_id.clone())
            .collect()
    }

    #[test]
    fn brooklyn_pedestrians_in_one_year() {
        let records = sample();
        let bundle = report(
            &records,
            "Brooklyn 2022 pedestrian crashes",
            &DropdownSelections::default(),
        );

        assert_eq!(
            bundle.filters,
            FilterSpec {
                borough: Some(Borough::Brooklyn),
                year_range: Some(YearRange::single(2022)),
                person_type: Some(PersonType::Pedestrian),
                ..FilterSpec::default()
            }
        );
        assert_eq!(ids(&records, &bundle.filters), vec!["1", "2"]);
        assert_eq!(bundle.summary.total_records, 2);
        assert_eq!(bundle.unmatched, vec!["crashes"]);
    }

    #[test]
    fn queens_friday_night_motorcycle_fatalities() {
        let records = sample();
        let bundle = report(
            &records,
            "Queens Friday night motorcycle fatalities",
            &DropdownSelections::default(),
        );

        assert_eq!(
            bundle.filters,
            FilterSpec {
                borough: Some(Borough::Queens),
                day_of_week: Some(DaySelection::Day(DayOfWeek::Friday)),
                time_of_day: Some(TimeOfDay::Band(TimeOfDayBand::Night)),
                vehicle_type: Some(VehicleType::Motorcycle),
                severity_min: Some(InjurySeverity::Fatality),
                ..FilterSpec::default()
            }
        );
        // Row 5 is at 14:00 and row 6 is only an injury.
        assert_eq!(ids(&records, &bundle.filters), vec!["4"]);
        assert_eq!(bundle.summary.killed_persons, 1);
    }

    #[test]
    fn empty_query_reports_on_everything() {
        let records = sample();
        let bundle = report(&records, "", &DropdownSelections::default());

        assert!(bundle.filters.is_unrestricted());
        assert_eq!(bundle.summary.total_records, records.len() as u64);
        let facets: Vec<Facet> = bundle.facets.iter().map(|f| f.facet).collect();
        assert_eq!(facets, Facet::ALL.to_vec());
        assert!(bundle.facets.iter().all(|f| f.insight != NO_MATCHING_RECORDS));
    }

    #[test]
    fn manhattan_weekend_taxi_injuries() {
        let records = sample();
        let bundle = report(
            &records,
            "Manhattan weekend taxi injuries",
            &DropdownSelections::default(),
        );

        assert_eq!(bundle.filters.borough, Some(Borough::Manhattan));
        assert_eq!(bundle.filters.day_of_week, Some(DaySelection::Weekend));
        assert_eq!(bundle.filters.vehicle_type, Some(VehicleType::Taxi));
        assert_eq!(bundle.filters.severity_min, Some(InjurySeverity::Injury));
        // Injury threshold keeps the fatality; Monday and uninjured rows drop.
        assert_eq!(ids(&records, &bundle.filters), vec!["7", "8"]);
    }

    #[test]
    fn dropdowns_override_text() {
        let records = sample();
        let explicit = DropdownSelections {
            borough: Some("Queens".to_string()),
            ..DropdownSelections::default()
        };
        let bundle = report(&records, "Brooklyn crashes", &explicit);

        assert_eq!(bundle.filters.borough, Some(Borough::Queens));
        assert_eq!(bundle.summary.total_records, 3);
        // The text match is still traced.
        assert_eq!(bundle.trace.len(), 1);
        assert_eq!(bundle.trace[0].value, "Brooklyn");
    }

    #[test]
    fn invalid_dropdown_is_rejected() {
        let records = sample();
        let explicit = DropdownSelections {
            month: Some("13".to_string()),
            ..DropdownSelections::default()
        };
        let result = generate_report(
            &DatasetView::new(&records),
            "",
            &explicit,
            &ReportConfig::default(),
        );
        assert!(matches!(result, Err(ReportError::Filter(_))));
    }

    #[test]
    fn no_matches_gives_empty_facets() {
        let records = sample();
        let bundle = report(&records, "Staten Island", &DropdownSelections::default());

        assert!(bundle.is_empty());
        assert_eq!(bundle.facets.len(), Facet::ALL.len());
        assert!(bundle.facets.iter().all(|f| f.insight == NO_MATCHING_RECORDS));
        assert_eq!(bundle.summary.most_affected_borough, None);
    }

    #[test]
    fn assemble_restores_facet_order() {
        let spec = FilterSpec::default();
        let mut results = aggregate_all(&[], &ReportConfig::default());
        results.reverse();
        let bundle = assemble(
            results,
            summarize(&[]),
            &spec,
            &parse_with_trace(""),
        );

        let facets: Vec<Facet> = bundle.facets.iter().map(|f| f.facet).collect();
        assert_eq!(facets, Facet::ALL.to_vec());
        assert_eq!(bundle.facets[0].title, Facet::Trend.title());
    }

    #[test]
    fn bundle_serializes_with_camel_case_names() {
        let records = sample();
        let bundle = report(&records, "Queens", &DropdownSelections::default());
        let json = serde_json::to_value(&bundle).unwrap();

        assert!(json["summary"]["totalRecords"].is_u64());
        assert!(json["filters"].get("yearRange").is_some());
        assert_eq!(json["facets"].as_array().map(Vec::len), Some(9));
        assert_eq!(json["facets"][3]["result"]["facet"], "hourly_distribution");
    }
}
