#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter specification types.
//!
//! A [`PartialFilterSpec`] is what the free-text parser and the dropdown
//! layer each produce; the resolver merges two of them into a canonical
//! [`FilterSpec`], which the dataset view evaluates. Both carry one optional
//! constraint per facet. Day-of-week and time-of-day constraints may name a
//! fixed set (weekend, a time band) instead of a single value.

use chrono::{Datelike as _, NaiveDate};
use crash_report_crash_models::{
    Borough, DayOfWeek, InjurySeverity, PersonSex, PersonType, TimeOfDayBand, VehicleType,
};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Returns the English name of a 1-based month, or `None` outside 1-12.
#[must_use]
pub fn month_name(month: u8) -> Option<&'static str> {
    MONTH_NAMES.get(usize::from(month).checked_sub(1)?).copied()
}

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRange {
    /// First year included.
    pub start: i32,
    /// Last year included.
    pub end: i32,
}

impl YearRange {
    /// Creates a range covering a single year.
    #[must_use]
    pub const fn single(year: i32) -> Self {
        Self {
            start: year,
            end: year,
        }
    }

    /// Creates a range from two years given in either order.
    #[must_use]
    pub const fn between(a: i32, b: i32) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Returns `true` if `year` is inside the range.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// Returns `true` if the range covers exactly one year.
    #[must_use]
    pub const fn is_single(self) -> bool {
        self.start == self.end
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A day-of-week constraint: one day, or one of the named day sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DaySelection {
    /// Exactly one day.
    Day(DayOfWeek),
    /// Saturday and Sunday.
    Weekend,
    /// Monday through Friday.
    Weekdays,
}

impl DaySelection {
    /// Returns `true` if `day` belongs to this selection.
    #[must_use]
    pub const fn contains(self, day: DayOfWeek) -> bool {
        match self {
            Self::Day(d) => d as u8 == day as u8,
            Self::Weekend => day.is_weekend(),
            Self::Weekdays => !day.is_weekend(),
        }
    }

    /// Returns a display label (`"Friday"`, `"weekends"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day(d) => d.label(),
            Self::Weekend => "weekends",
            Self::Weekdays => "weekdays",
        }
    }
}

/// A time-of-day constraint: one clock hour, or a named hour band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeOfDay {
    /// Exactly one hour, 0-23.
    Hour(u8),
    /// A fixed band of hours.
    Band(TimeOfDayBand),
}

impl TimeOfDay {
    /// Returns `true` if `hour` belongs to this constraint.
    #[must_use]
    pub const fn contains(self, hour: u8) -> bool {
        match self {
            Self::Hour(h) => h == hour,
            Self::Band(band) => band.contains(hour),
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hour(h) => write!(f, "{h:02}:00"),
            Self::Band(band) => f.write_str(band.label()),
        }
    }
}

/// Names one field of a filter specification.
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
pub enum FilterField {
    /// [`FilterSpec::borough`]
    Borough,
    /// [`FilterSpec::year_range`]
    YearRange,
    /// [`FilterSpec::month`]
    Month,
    /// [`FilterSpec::day_of_week`]
    DayOfWeek,
    /// [`FilterSpec::time_of_day`]
    TimeOfDay,
    /// [`FilterSpec::vehicle_type`]
    VehicleType,
    /// [`FilterSpec::person_type`]
    PersonType,
    /// [`FilterSpec::severity_min`]
    SeverityMin,
    /// [`FilterSpec::gender`]
    Gender,
}

impl FilterField {
    /// Returns all variants of this enum, in filter-spec field order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Borough,
            Self::YearRange,
            Self::Month,
            Self::DayOfWeek,
            Self::TimeOfDay,
            Self::VehicleType,
            Self::PersonType,
            Self::SeverityMin,
            Self::Gender,
        ]
    }
}

/// Filter constraints as extracted from one input (free text or dropdowns),
/// before merging and validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialFilterSpec {
    /// Borough constraint.
    pub borough: Option<Borough>,
    /// Year constraint.
    pub year_range: Option<YearRange>,
    /// Month constraint (1-12).
    pub month: Option<u8>,
    /// Day-of-week constraint.
    pub day_of_week: Option<DaySelection>,
    /// Time-of-day constraint.
    pub time_of_day: Option<TimeOfDay>,
    /// Vehicle class constraint (either vehicle slot).
    pub vehicle_type: Option<VehicleType>,
    /// Person role constraint.
    pub person_type: Option<PersonType>,
    /// Minimum injury severity.
    pub severity_min: Option<InjurySeverity>,
    /// Person sex constraint.
    pub gender: Option<PersonSex>,
}

impl PartialFilterSpec {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set_fields().is_empty()
    }

    /// Returns the fields that carry a value, in field order.
    #[must_use]
    pub fn set_fields(&self) -> Vec<FilterField> {
        let flags = [
            (FilterField::Borough, self.borough.is_some()),
            (FilterField::YearRange, self.year_range.is_some()),
            (FilterField::Month, self.month.is_some()),
            (FilterField::DayOfWeek, self.day_of_week.is_some()),
            (FilterField::TimeOfDay, self.time_of_day.is_some()),
            (FilterField::VehicleType, self.vehicle_type.is_some()),
            (FilterField::PersonType, self.person_type.is_some()),
            (FilterField::SeverityMin, self.severity_min.is_some()),
            (FilterField::Gender, self.gender.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(field, set)| set.then_some(field))
            .collect()
    }

    /// Returns a copy of `self` with every field set in `over` replaced by
    /// the value from `over`.
    #[must_use]
    pub fn overlaid_with(&self, over: &Self) -> Self {
        Self {
            borough: over.borough.or(self.borough),
            year_range: over.year_range.or(self.year_range),
            month: over.month.or(self.month),
            day_of_week: over.day_of_week.or(self.day_of_week),
            time_of_day: over.time_of_day.or(self.time_of_day),
            vehicle_type: over.vehicle_type.or(self.vehicle_type),
            person_type: over.person_type.or(self.person_type),
            severity_min: over.severity_min.or(self.severity_min),
            gender: over.gender.or(self.gender),
        }
    }
}

/// Canonical, validated set of query constraints.
///
/// Produced by the resolver; a new query always yields a new value. Unset
/// fields place no constraint on the rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Borough constraint.
    pub borough: Option<Borough>,
    /// Year constraint.
    pub year_range: Option<YearRange>,
    /// Month constraint (1-12).
    pub month: Option<u8>,
    /// Day-of-week constraint.
    pub day_of_week: Option<DaySelection>,
    /// Time-of-day constraint.
    pub time_of_day: Option<TimeOfDay>,
    /// Vehicle class constraint (either vehicle slot).
    pub vehicle_type: Option<VehicleType>,
    /// Person role constraint.
    pub person_type: Option<PersonType>,
    /// Minimum injury severity.
    pub severity_min: Option<InjurySeverity>,
    /// Person sex constraint.
    pub gender: Option<PersonSex>,
}

impl FilterSpec {
    /// Returns `true` if no field is set, i.e. every record matches.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        PartialFilterSpec::from(*self).is_empty()
    }

    /// Returns `true` if the crash date satisfies the year and month
    /// constraints.
    #[must_use]
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        self.year_range.is_none_or(|r| r.contains(date.year()))
            && self.month.is_none_or(|m| date.month() == u32::from(m))
    }

    /// Human-readable one-line description of the active constraints.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(borough) = self.borough {
            parts.push(borough.label().to_string());
        }
        if let Some(range) = self.year_range {
            parts.push(range.to_string());
        }
        if let Some(name) = self.month.and_then(month_name) {
            parts.push(name.to_string());
        }
        if let Some(days) = self.day_of_week {
            parts.push(days.label().to_string());
        }
        if let Some(time) = self.time_of_day {
            parts.push(time.to_string());
        }
        if let Some(vehicle) = self.vehicle_type {
            parts.push(vehicle.label().to_string());
        }
        if let Some(person) = self.person_type {
            parts.push(person.label().to_lowercase());
        }
        if let Some(severity) = self.severity_min {
            parts.push(format!("{} or worse", severity.label().to_lowercase()));
        }
        if let Some(gender) = self.gender {
            parts.push(gender.label().to_lowercase());
        }

        if parts.is_empty() {
            "all records".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl From<FilterSpec> for PartialFilterSpec {
    fn from(spec: FilterSpec) -> Self {
        Self {
            borough: spec.borough,
            year_range: spec.year_range,
            month: spec.month,
            day_of_week: spec.day_of_week,
            time_of_day: spec.time_of_day,
            vehicle_type: spec.vehicle_type,
            person_type: spec.person_type,
            severity_min: spec.severity_min,
            gender: spec.gender,
        }
    }
}

/// One lexicon or pattern match made while parsing free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    /// Field the match populated.
    pub field: FilterField,
    /// Normalized text that matched.
    pub phrase: String,
    /// Canonical value the phrase resolved to, for display.
    pub value: String,
    /// Index of the first matched token.
    pub position: usize,
    /// `true` if a later match for the same field replaced this one.
    pub superseded: bool,
}
