//! One-sentence insights for facet results.
//!
//! Every sentence is a fixed template filled from the result, so the same
//! data always yields the same text.

use crash_report_analytics_models::{
    AggregateResult, CategoricalField, CategoryBreakdown, DayHourGrid, FactorBreakdown,
    FactorSlot, GeoPoints, HourlyDistribution, SeverityComparison, ShareBreakdown, TrendSeries,
};
use crash_report_crash_models::InjurySeverity;

/// Insight used for every facet when the filters matched nothing.
pub const NO_MATCHING_RECORDS: &str = "No matching records.";

/// Builds the insight sentence for `result` over a population of
/// `population` filtered rows.
#[must_use]
pub fn insight(result: &AggregateResult, population: u64) -> String {
    if population == 0 {
        return NO_MATCHING_RECORDS.to_string();
    }

    match result {
        AggregateResult::Trend(trend) => trend_insight(trend),
        AggregateResult::PersonTypeShare(shares) => share_insight(shares),
        AggregateResult::CategoryBar(bars) => category_insight(bars),
        AggregateResult::HourlyDistribution(hours) => hourly_insight(hours),
        AggregateResult::ContributingFactor1(factors)
        | AggregateResult::ContributingFactor2(factors) => factor_insight(factors),
        AggregateResult::SeverityComparison(severity) => severity_insight(severity),
        AggregateResult::DayHourHeatmap(grid) => heatmap_insight(grid),
        AggregateResult::GeoMap(geo) => geo_insight(geo),
    }
}

fn trend_insight(trend: &TrendSeries) -> String {
    let busiest = trend
        .points
        .iter()
        .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.period.cmp(&a.period)));

    match busiest {
        Some(point) => format!(
            "Busiest {}: {} ({} records) across {} {}s with crashes",
            trend.granularity,
            point.period,
            point.count,
            trend.points.len(),
            trend.granularity
        ),
        None => "No dated records.".to_string(),
    }
}

fn share_insight(shares: &ShareBreakdown) -> String {
    let largest = shares
        .slices
        .iter()
        .max_by(|a, b| a.count.cmp(&b.count).then(b.person_type.cmp(&a.person_type)));

    match largest {
        Some(slice) => format!(
            "{}s are the largest group: {} of {} people ({})",
            slice.person_type.label(),
            slice.count,
            shares.total,
            percent(slice.share)
        ),
        None => "No person type data for matching records.".to_string(),
    }
}

fn category_insight(bars: &CategoryBreakdown) -> String {
    let field = match bars.field {
        CategoricalField::Borough => "borough",
        CategoricalField::VehicleType => "vehicle type",
        CategoricalField::PersonType => "person type",
        CategoricalField::PersonSex => "sex",
    };

    match bars.categories.first() {
        Some(top) => format!(
            "Most records by {field}: {} ({} of {})",
            top.category, top.count, bars.total
        ),
        None => format!("No {field} data for matching records."),
    }
}

fn hourly_insight(hours: &HourlyDistribution) -> String {
    match hours.peak() {
        Some(peak) => format!(
            "Peak crash hour: {:02}:00 ({})",
            peak.hour,
            counted(peak.count, "record", "records")
        ),
        None => "No hour data for matching records.".to_string(),
    }
}

fn factor_insight(factors: &FactorBreakdown) -> String {
    let vehicle = match factors.slot {
        FactorSlot::Vehicle1 => 1,
        FactorSlot::Vehicle2 => 2,
    };

    match factors.top.first() {
        Some(top) => format!(
            "Top contributing factor for vehicle {vehicle}: {} ({} of {} records with a factor)",
            top.category, top.count, factors.total
        ),
        None => format!("No contributing factor recorded for vehicle {vehicle}."),
    }
}

fn severity_insight(severity: &SeverityComparison) -> String {
    let level = |target: InjurySeverity| {
        severity
            .levels
            .iter()
            .find(|l| l.severity == target)
            .copied()
    };
    let injured = level(InjurySeverity::Injury).map_or(0, |l| l.count);
    let killed = level(InjurySeverity::Fatality).map_or(0, |l| l.count);
    let harmed_rate = level(InjurySeverity::Injury).map_or(0.0, |l| l.rate)
        + level(InjurySeverity::Fatality).map_or(0.0, |l| l.rate);

    format!(
        "{} of {} people injured or killed ({}); {killed} killed",
        injured + killed,
        severity.total,
        percent(harmed_rate)
    )
}

fn heatmap_insight(grid: &DayHourGrid) -> String {
    match grid.peak() {
        Some((day, hour, count)) => {
            format!(
                "Busiest time: {} {hour:02}:00 ({})",
                day.label(),
                counted(count, "record", "records")
            )
        }
        None => "No day and hour data for matching records.".to_string(),
    }
}

fn geo_insight(geo: &GeoPoints) -> String {
    if geo.points.is_empty() {
        format!(
            "No mappable locations ({} without usable coordinates).",
            counted(geo.excluded, "record", "records")
        )
    } else {
        format!(
            "{}; {} without usable coordinates",
            counted(geo.points.len() as u64, "mappable location", "mappable locations"),
            counted(geo.excluded, "record", "records")
        )
    }
}

fn counted(n: u64, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

fn percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_report_analytics_models::{
        CategoryCount, GeoPoint, HourCount, SeverityLevelCount, ShareSlice, TimeGranularity,
        TimeSeriesPoint,
    };
    use crash_report_crash_models::{DayOfWeek, PersonType};

    #[test]
    fn empty_population_says_no_matching_records() {
        let result = AggregateResult::GeoMap(GeoPoints {
            points: Vec::new(),
            excluded: 0,
        });
        assert_eq!(insight(&result, 0), NO_MATCHING_RECORDS);
    }

    #[test]
    fn peak_hour_sentence() {
        let mut hours: Vec<HourCount> = (0..24).map(|hour| HourCount { hour, count: 1 }).collect();
        hours[17].count = 42;
        let result = AggregateResult::HourlyDistribution(HourlyDistribution {
            total: 65,
            hours,
        });
        assert_eq!(insight(&result, 65), "Peak crash hour: 17:00 (42 records)");
    }

    #[test]
    fn missing_hours_get_a_facet_specific_sentence() {
        let result = AggregateResult::HourlyDistribution(HourlyDistribution {
            total: 0,
            hours: (0..24).map(|hour| HourCount { hour, count: 0 }).collect(),
        });
        assert_eq!(insight(&result, 3), "No hour data for matching records.");
    }

    #[test]
    fn trend_sentence_names_busiest_period() {
        let result = AggregateResult::Trend(TrendSeries {
            granularity: TimeGranularity::Monthly,
            points: vec![
                TimeSeriesPoint {
                    period: "2022-01".to_string(),
                    count: 4,
                },
                TimeSeriesPoint {
                    period: "2022-02".to_string(),
                    count: 9,
                },
            ],
        });
        assert_eq!(
            insight(&result, 13),
            "Busiest month: 2022-02 (9 records) across 2 months with crashes"
        );
    }

    #[test]
    fn share_and_category_sentences() {
        let shares = AggregateResult::PersonTypeShare(ShareBreakdown {
            total: 4,
            slices: vec![
                ShareSlice {
                    person_type: PersonType::Driver,
                    count: 3,
                    share: 0.75,
                },
                ShareSlice {
                    person_type: PersonType::Pedestrian,
                    count: 1,
                    share: 0.25,
                },
            ],
        });
        assert_eq!(
            insight(&shares, 4),
            "Drivers are the largest group: 3 of 4 people (75.0%)"
        );

        let bars = AggregateResult::CategoryBar(CategoryBreakdown {
            field: CategoricalField::Borough,
            total: 4,
            categories: vec![CategoryCount {
                category: "Queens".to_string(),
                count: 3,
            }],
        });
        assert_eq!(insight(&bars, 4), "Most records by borough: Queens (3 of 4)");
    }

    #[test]
    fn factor_sentences() {
        let none = AggregateResult::ContributingFactor2(FactorBreakdown {
            slot: FactorSlot::Vehicle2,
            total: 0,
            top: Vec::new(),
            other: 0,
        });
        assert_eq!(
            insight(&none, 5),
            "No contributing factor recorded for vehicle 2."
        );
    }

    #[test]
    fn severity_sentence() {
        let result = AggregateResult::SeverityComparison(SeverityComparison {
            total: 4,
            levels: vec![
                SeverityLevelCount {
                    severity: InjurySeverity::NoInjury,
                    count: 2,
                    rate: 0.5,
                },
                SeverityLevelCount {
                    severity: InjurySeverity::Injury,
                    count: 1,
                    rate: 0.25,
                },
                SeverityLevelCount {
                    severity: InjurySeverity::Fatality,
                    count: 1,
                    rate: 0.25,
                },
            ],
        });
        assert_eq!(
            insight(&result, 4),
            "2 of 4 people injured or killed (50.0%); 1 killed"
        );
    }

    #[test]
    fn heatmap_and_geo_sentences() {
        let mut grid = DayHourGrid::default();
        grid.cells[DayOfWeek::Friday.index()][22] = 3;
        assert_eq!(
            insight(&AggregateResult::DayHourHeatmap(grid), 3),
            "Busiest time: Friday 22:00 (3 records)"
        );

        let geo = AggregateResult::GeoMap(GeoPoints {
            points: vec![GeoPoint {
                latitude: 40.7,
                longitude: -73.9,
                weight: 1.0,
            }],
            excluded: 2,
        });
        assert_eq!(
            insight(&geo, 3),
            "1 mappable location; 2 records without usable coordinates"
        );

        let geo = AggregateResult::GeoMap(GeoPoints {
            points: vec![
                GeoPoint {
                    latitude: 40.7,
                    longitude: -73.9,
                    weight: 1.0,
                },
                GeoPoint {
                    latitude: 40.6,
                    longitude: -74.0,
                    weight: 1.0,
                },
            ],
            excluded: 1,
        });
        assert_eq!(
            insight(&geo, 3),
            "2 mappable locations; 1 record without usable coordinates"
        );

        let nowhere = AggregateResult::GeoMap(GeoPoints {
            points: vec![],
            excluded: 1,
        });
        assert_eq!(
            insight(&nowhere, 1),
            "No mappable locations (1 record without usable coordinates)."
        );
    }
}
