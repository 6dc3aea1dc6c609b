#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result shapes for the nine report facets.
//!
//! Each facet of a crash report has its own output type. [`AggregateResult`]
//! is the closed union of them, tagged by [`Facet`], so a report can carry
//! all nine results in one list. [`ReportConfig`] holds the handful of knobs
//! the facets accept.

use crash_report_crash_models::{Borough, DayOfWeek, InjurySeverity, PersonType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One panel of a crash report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Facet {
    /// Crash counts over time.
    Trend,
    /// Share of each person type.
    PersonTypeShare,
    /// Counts per value of one categorical field.
    CategoryBar,
    /// Counts per hour of day.
    HourlyDistribution,
    /// Top contributing factors of the first vehicle.
    ContributingFactor1,
    /// Top contributing factors of the second vehicle.
    ContributingFactor2,
    /// Counts and rates per injury severity.
    SeverityComparison,
    /// Counts per day of week and hour.
    DayHourHeatmap,
    /// Crash locations.
    GeoMap,
}

impl Facet {
    /// Every facet, in report order.
    pub const ALL: [Self; 9] = [
        Self::Trend,
        Self::PersonTypeShare,
        Self::CategoryBar,
        Self::HourlyDistribution,
        Self::ContributingFactor1,
        Self::ContributingFactor2,
        Self::SeverityComparison,
        Self::DayHourHeatmap,
        Self::GeoMap,
    ];

    /// Returns all variants of this enum, in report order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// Returns the panel title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Trend => "Crash trend",
            Self::PersonTypeShare => "People involved by type",
            Self::CategoryBar => "Crashes by category",
            Self::HourlyDistribution => "Crashes by hour",
            Self::ContributingFactor1 => "Contributing factors (vehicle 1)",
            Self::ContributingFactor2 => "Contributing factors (vehicle 2)",
            Self::SeverityComparison => "Injury severity",
            Self::DayHourHeatmap => "Day and hour heatmap",
            Self::GeoMap => "Crash locations",
        }
    }
}

/// Granularity of a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGranularity {
    /// Daily counts.
    Daily,
    /// Monthly counts.
    Monthly,
    /// Yearly counts.
    Yearly,
}

impl std::fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "day"),
            Self::Monthly => write!(f, "month"),
            Self::Yearly => write!(f, "year"),
        }
    }
}

/// Configured trend granularity: fixed, or chosen from the data's span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendGranularity {
    /// One calendar year: daily. Two to five years: monthly. More: yearly.
    #[default]
    Auto,
    /// Always daily.
    Daily,
    /// Always monthly.
    Monthly,
    /// Always yearly.
    Yearly,
}

impl TrendGranularity {
    /// Picks the concrete granularity for data spanning the calendar years
    /// `first..=last`.
    #[must_use]
    pub const fn for_years(self, first: i32, last: i32) -> TimeGranularity {
        match self {
            Self::Daily => TimeGranularity::Daily,
            Self::Monthly => TimeGranularity::Monthly,
            Self::Yearly => TimeGranularity::Yearly,
            Self::Auto => match last - first + 1 {
                ..=1 => TimeGranularity::Daily,
                2..=5 => TimeGranularity::Monthly,
                _ => TimeGranularity::Yearly,
            },
        }
    }
}

/// A time-series data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Period label (`"2022-03-01"`, `"2022-03"`, `"2022"`).
    pub period: String,
    /// Rows in this period.
    pub count: u64,
}

/// A count for a named category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category label.
    pub category: String,
    /// Number of rows.
    pub count: u64,
}

/// Crash counts bucketed by period, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    /// Bucket size.
    pub granularity: TimeGranularity,
    /// One point per non-empty period, chronological.
    pub points: Vec<TimeSeriesPoint>,
}

/// One slice of a share breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSlice {
    /// Person type of this slice.
    pub person_type: PersonType,
    /// Rows of this type.
    pub count: u64,
    /// `count / total`.
    pub share: f64,
}

/// Proportions of each person type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBreakdown {
    /// Rows counted.
    pub total: u64,
    /// Non-empty slices in person type order.
    pub slices: Vec<ShareSlice>,
}

/// Field a category bar chart groups by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CategoricalField {
    /// Crash borough.
    #[default]
    Borough,
    /// Class of the first vehicle.
    VehicleType,
    /// Person role.
    PersonType,
    /// Person sex.
    PersonSex,
}

/// Counts per value of a categorical field, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// Field grouped by.
    pub field: CategoricalField,
    /// Rows with a known value for the field.
    pub total: u64,
    /// Categories by descending count, ties by label.
    pub categories: Vec<CategoryCount>,
}

/// Rows in one hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
    /// Hour, 0-23.
    pub hour: u8,
    /// Rows in this hour.
    pub count: u64,
}

/// Counts for each of the 24 hours of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyDistribution {
    /// Rows with a known hour.
    pub total: u64,
    /// Exactly 24 bins, hour 0 first.
    pub hours: Vec<HourCount>,
}

impl HourlyDistribution {
    /// Returns the busiest hour, earliest on ties, or `None` when empty.
    #[must_use]
    pub fn peak(&self) -> Option<HourCount> {
        self.hours
            .iter()
            .copied()
            .filter(|h| h.count > 0)
            .max_by(|a, b| a.count.cmp(&b.count).then(b.hour.cmp(&a.hour)))
    }
}

/// Which vehicle's contributing factor a breakdown covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorSlot {
    /// `CONTRIBUTING_FACTOR_VEHICLE_1`
    Vehicle1,
    /// `CONTRIBUTING_FACTOR_VEHICLE_2`
    Vehicle2,
}

/// Most frequent contributing factors for one vehicle slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorBreakdown {
    /// Vehicle slot.
    pub slot: FactorSlot,
    /// Rows with a known factor in this slot.
    pub total: u64,
    /// Top factors by descending count, ties by label.
    pub top: Vec<CategoryCount>,
    /// Rows whose factor is not in `top`.
    pub other: u64,
}

/// Count and rate for one severity level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityLevelCount {
    /// Severity level.
    pub severity: InjurySeverity,
    /// Rows at this level.
    pub count: u64,
    /// `count / total`, 0 when there are no rows.
    pub rate: f64,
}

/// Counts and rates for every severity level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityComparison {
    /// Rows counted.
    pub total: u64,
    /// One entry per level, least severe first.
    pub levels: Vec<SeverityLevelCount>,
}

/// 7x24 grid of counts, Monday first, hour columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHourGrid {
    /// `cells[day][hour]`.
    pub cells: [[u64; 24]; 7],
}

impl Default for DayHourGrid {
    fn default() -> Self {
        Self {
            cells: [[0; 24]; 7],
        }
    }
}

impl DayHourGrid {
    /// Count for one day and hour, or `None` when `hour` is past 23.
    #[must_use]
    pub fn get(&self, day: DayOfWeek, hour: u8) -> Option<u64> {
        self.cells[day.index()].get(usize::from(hour)).copied()
    }

    /// Sum of every cell.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    /// The busiest cell, earliest day then hour on ties, or `None` when
    /// empty.
    #[must_use]
    pub fn peak(&self) -> Option<(DayOfWeek, u8, u64)> {
        let mut best: Option<(DayOfWeek, u8, u64)> = None;
        for day in DayOfWeek::all() {
            for hour in 0..24u8 {
                let count = self.get(*day, hour).unwrap_or(0);
                if count > 0 && best.is_none_or(|(_, _, c)| count > c) {
                    best = Some((*day, hour, count));
                }
            }
        }
        best
    }
}

/// One weighted map point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Point weight.
    pub weight: f64,
}

/// Mappable crash locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoints {
    /// Points inside the city envelope.
    pub points: Vec<GeoPoint>,
    /// Rows without a usable location.
    pub excluded: u64,
}

/// Output of one facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "facet", content = "data", rename_all = "snake_case")]
pub enum AggregateResult {
    /// [`Facet::Trend`]
    Trend(TrendSeries),
    /// [`Facet::PersonTypeShare`]
    PersonTypeShare(ShareBreakdown),
    /// [`Facet::CategoryBar`]
    CategoryBar(CategoryBreakdown),
    /// [`Facet::HourlyDistribution`]
    HourlyDistribution(HourlyDistribution),
    /// [`Facet::ContributingFactor1`]
    ContributingFactor1(FactorBreakdown),
    /// [`Facet::ContributingFactor2`]
    ContributingFactor2(FactorBreakdown),
    /// [`Facet::SeverityComparison`]
    SeverityComparison(SeverityComparison),
    /// [`Facet::DayHourHeatmap`]
    DayHourHeatmap(DayHourGrid),
    /// [`Facet::GeoMap`]
    GeoMap(GeoPoints),
}

impl AggregateResult {
    /// Returns the facet this result belongs to.
    #[must_use]
    pub const fn facet(&self) -> Facet {
        match self {
            Self::Trend(_) => Facet::Trend,
            Self::PersonTypeShare(_) => Facet::PersonTypeShare,
            Self::CategoryBar(_) => Facet::CategoryBar,
            Self::HourlyDistribution(_) => Facet::HourlyDistribution,
            Self::ContributingFactor1(_) => Facet::ContributingFactor1,
            Self::ContributingFactor2(_) => Facet::ContributingFactor2,
            Self::SeverityComparison(_) => Facet::SeverityComparison,
            Self::DayHourHeatmap(_) => Facet::DayHourHeatmap,
            Self::GeoMap(_) => Facet::GeoMap,
        }
    }
}

/// Headline numbers over a filtered population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Person rows.
    pub total_records: u64,
    /// Distinct collision ids.
    pub distinct_collisions: u64,
    /// Rows with severity [`InjurySeverity::Injury`].
    pub injured_persons: u64,
    /// Rows with severity [`InjurySeverity::Fatality`].
    pub killed_persons: u64,
    /// Distinct collisions with at least one pedestrian row.
    pub pedestrian_collisions: u64,
    /// `(injured + killed) / total`, 0 when there are no rows.
    pub severity_rate: f64,
    /// Borough with the most rows, `None` when no row has a borough.
    pub most_affected_borough: Option<Borough>,
}

/// Tunables for the facet computations. Every field has a default, so an
/// empty TOML document is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Field the category bar chart groups by.
    pub category_field: CategoricalField,
    /// Maximum bars in the category chart; 0 shows every category.
    pub category_limit: usize,
    /// Factors listed per contributing factor facet before `other`.
    pub factor_top_n: usize,
    /// Trend bucket size.
    pub trend_granularity: TrendGranularity,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            category_field: CategoricalField::Borough,
            category_limit: 10,
            factor_top_n: 10,
            trend_granularity: TrendGranularity::Auto,
        }
    }
}

impl ReportConfig {
    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document is malformed or a value is
    /// outside its domain.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::de::from_str(toml_str)
    }
}
