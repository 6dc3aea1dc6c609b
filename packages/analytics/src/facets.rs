//! One aggregation function per report facet.
//!
//! Every function is a single pass over the filtered rows. None of them
//! fail: an empty input produces a well-formed empty or all-zero shape.
//! Rows with an unknown value for a facet's key are skipped by that facet
//! only.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike as _;
use crash_report_analytics_models::{
    CategoricalField, CategoryBreakdown, CategoryCount, DayHourGrid, FactorBreakdown, FactorSlot,
    GeoPoint, GeoPoints, HourCount, HourlyDistribution, SeverityComparison, SeverityLevelCount,
    ShareBreakdown, ShareSlice, TimeGranularity, TimeSeriesPoint, TrendGranularity, TrendSeries,
};
use crash_report_crash_models::{CrashRecord, InjurySeverity, PersonType};

use crate::ratio;

/// Latitude bounds of the New York City envelope.
pub const NYC_LATITUDE: (f64, f64) = (40.0, 41.0);

/// Longitude bounds of the New York City envelope.
pub const NYC_LONGITUDE: (f64, f64) = (-74.3, -73.6);

/// Crash counts per period.
///
/// With [`TrendGranularity::Auto`], rows confined to one calendar year are
/// bucketed daily, two to five years monthly, and longer spans yearly.
#[must_use]
pub fn aggregate_trend(rows: &[&CrashRecord], granularity: TrendGranularity) -> TrendSeries {
    let first = rows.iter().map(|r| r.date.year()).min().unwrap_or_default();
    let last = rows.iter().map(|r| r.date.year()).max().unwrap_or_default();
    let granularity = granularity.for_years(first, last);

    let format = match granularity {
        TimeGranularity::Daily => "%Y-%m-%d",
        TimeGranularity::Monthly => "%Y-%m",
        TimeGranularity::Yearly => "%Y",
    };

    // Zero-padded labels sort chronologically.
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        *buckets.entry(row.date.format(format).to_string()).or_default() += 1;
    }

    TrendSeries {
        granularity,
        points: buckets
            .into_iter()
            .map(|(period, count)| TimeSeriesPoint { period, count })
            .collect(),
    }
}

/// Count and share of each person type. Zero slices are omitted.
#[must_use]
pub fn aggregate_person_types(rows: &[&CrashRecord]) -> ShareBreakdown {
    let total = rows.len() as u64;

    let slices = PersonType::all()
        .iter()
        .filter_map(|person_type| {
            let count = rows.iter().filter(|r| r.person_type == *person_type).count() as u64;
            (count > 0).then(|| ShareSlice {
                person_type: *person_type,
                count,
                share: ratio(count, total),
            })
        })
        .collect();

    ShareBreakdown { total, slices }
}

/// Counts per value of `field`, largest first with ties broken by label.
///
/// `limit` caps the number of categories returned; 0 returns all of them.
/// The vehicle breakdown uses the first vehicle slot.
#[must_use]
pub fn aggregate_categories(
    rows: &[&CrashRecord],
    field: CategoricalField,
    limit: usize,
) -> CategoryBreakdown {
    let mut counts: HashMap<&'static str, u64> = HashMap::new();

    for row in rows {
        let label = match field {
            CategoricalField::Borough => row.borough.map(|b| b.label()),
            CategoricalField::VehicleType => row.vehicle_type_1.map(|v| v.label()),
            CategoricalField::PersonType => Some(row.person_type.label()),
            CategoricalField::PersonSex => row.person_sex.map(|s| s.label()),
        };
        if let Some(label) = label {
            *counts.entry(label).or_default() += 1;
        }
    }

    let total = counts.values().sum();
    let mut categories = ranked(counts);
    if limit > 0 {
        categories.truncate(limit);
    }

    CategoryBreakdown {
        field,
        total,
        categories,
    }
}

/// Counts for each hour of the day, always 24 bins.
#[must_use]
pub fn aggregate_hours(rows: &[&CrashRecord]) -> HourlyDistribution {
    let mut bins = [0u64; 24];
    for hour in rows.iter().filter_map(|r| r.hour) {
        if let Some(bin) = bins.get_mut(usize::from(hour)) {
            *bin += 1;
        }
    }

    HourlyDistribution {
        total: bins.iter().sum(),
        hours: (0u8..)
            .zip(bins)
            .map(|(hour, count)| HourCount { hour, count })
            .collect(),
    }
}

/// The `top_n` most frequent contributing factors for one vehicle slot,
/// with the remainder folded into `other`.
#[must_use]
pub fn aggregate_factors(rows: &[&CrashRecord], slot: FactorSlot, top_n: usize) -> FactorBreakdown {
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for row in rows {
        let factor = match slot {
            FactorSlot::Vehicle1 => row.contributing_factor_1.as_deref(),
            FactorSlot::Vehicle2 => row.contributing_factor_2.as_deref(),
        };
        if let Some(factor) = factor {
            *counts.entry(factor).or_default() += 1;
        }
    }

    let total: u64 = counts.values().sum();
    let mut top = ranked(counts);
    top.truncate(top_n);
    let other = total - top.iter().map(|c| c.count).sum::<u64>();

    FactorBreakdown {
        slot,
        total,
        top,
        other,
    }
}

/// Count and rate for every severity level, least severe first.
#[must_use]
pub fn aggregate_severity(rows: &[&CrashRecord]) -> SeverityComparison {
    let total = rows.len() as u64;

    let levels = InjurySeverity::all()
        .iter()
        .map(|severity| {
            let count = rows
                .iter()
                .filter(|r| r.injury_severity == *severity)
                .count() as u64;
            SeverityLevelCount {
                severity: *severity,
                count,
                rate: ratio(count, total),
            }
        })
        .collect();

    SeverityComparison { total, levels }
}

/// Counts per day of week and hour. Rows missing either are skipped.
#[must_use]
pub fn aggregate_day_hour(rows: &[&CrashRecord]) -> DayHourGrid {
    let mut grid = DayHourGrid::default();

    for row in rows {
        if let (Some(day), Some(hour)) = (row.day_of_week, row.hour)
            && let Some(cell) = grid.cells[day.index()].get_mut(usize::from(hour))
        {
            *cell += 1;
        }
    }

    grid
}

/// Locations of rows inside the city envelope, each with weight 1.
#[must_use]
pub fn aggregate_geo(rows: &[&CrashRecord]) -> GeoPoints {
    let mut points = Vec::new();
    let mut excluded = 0u64;

    for row in rows {
        match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) if in_envelope(latitude, longitude) => {
                points.push(GeoPoint {
                    latitude,
                    longitude,
                    weight: 1.0,
                });
            }
            _ => excluded += 1,
        }
    }

    GeoPoints { points, excluded }
}

fn in_envelope(latitude: f64, longitude: f64) -> bool {
    latitude != 0.0
        && longitude != 0.0
        && (NYC_LATITUDE.0..=NYC_LATITUDE.1).contains(&latitude)
        && (NYC_LONGITUDE.0..=NYC_LONGITUDE.1).contains(&longitude)
}

/// Sorts counts by descending count, then ascending label.
fn ranked(counts: HashMap<&str, u64>) -> Vec<CategoryCount> {
    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    ranked
}
