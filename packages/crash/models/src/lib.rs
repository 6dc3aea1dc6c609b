#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crash and person record types with their categorical domains.
//!
//! This crate defines the canonical shape of one row of the integrated
//! collision dataset (a crash joined with one involved person) and the
//! closed enumerations every other crate filters and groups on. The upstream
//! ETL normalizes its source columns into these domains.

use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Parses a human or machine label (`"Staten Island"`, `"staten-island"`,
/// `"STATEN_ISLAND"`) into one of the enums in this crate.
///
/// Returns `None` for blank input or labels outside the enum's domain.
#[must_use]
pub fn parse_label<T: FromStr>(label: &str) -> Option<T> {
    let key: String = label
        .trim()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();
    if key.is_empty() {
        return None;
    }
    key.parse().ok()
}

/// One of the five New York City boroughs.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Borough {
    /// The Bronx
    Bronx,
    /// Brooklyn (Kings County)
    Brooklyn,
    /// Manhattan (New York County)
    Manhattan,
    /// Queens
    Queens,
    /// Staten Island (Richmond County)
    StatenIsland,
}

impl Borough {
    /// Returns the display label used in insights and dropdowns.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bronx => "Bronx",
            Self::Brooklyn => "Brooklyn",
            Self::Manhattan => "Manhattan",
            Self::Queens => "Queens",
            Self::StatenIsland => "Staten Island",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bronx,
            Self::Brooklyn,
            Self::Manhattan,
            Self::Queens,
            Self::StatenIsland,
        ]
    }
}

/// Day of the week, Monday first.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DayOfWeek {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl DayOfWeek {
    /// Zero-based row index, Monday = 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for Saturday and Sunday.
    #[must_use]
    pub const fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }

    /// Returns the display label (`"Monday"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Returns the weekday a calendar date falls on.
    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        use chrono::Datelike as _;
        date.weekday().into()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

/// Coarse, fixed hour bands used by time-of-day phrases.
///
/// A band is a named set of hours rather than a single hour, so
/// [`TimeOfDayBand::contains`] is the only correct way to test membership.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TimeOfDayBand {
    /// 06:00-11:59
    Morning,
    /// 12:00-16:59
    Afternoon,
    /// 17:00-20:59
    Evening,
    /// 21:00-05:59, wrapping midnight
    Night,
    /// 07:00-09:59 and 16:00-18:59
    RushHour,
}

impl TimeOfDayBand {
    /// Returns `true` if `hour` (0-23) falls inside this band.
    #[must_use]
    pub const fn contains(self, hour: u8) -> bool {
        match self {
            Self::Morning => matches!(hour, 6..=11),
            Self::Afternoon => matches!(hour, 12..=16),
            Self::Evening => matches!(hour, 17..=20),
            Self::Night => matches!(hour, 21..=23 | 0..=5),
            Self::RushHour => matches!(hour, 7..=9 | 16..=18),
        }
    }

    /// Returns the display label (`"rush hour"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
            Self::RushHour => "rush hour",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Morning,
            Self::Afternoon,
            Self::Evening,
            Self::Night,
            Self::RushHour,
        ]
    }
}

/// Role of the person described by a record.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PersonType {
    /// Operator of a motor vehicle
    Driver,
    /// Person on foot
    Pedestrian,
    /// Rider of a bicycle or other human-powered vehicle
    Cyclist,
    /// Non-driving vehicle occupant
    Passenger,
}

impl PersonType {
    /// Returns the display label (`"Pedestrian"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Driver => "Driver",
            Self::Pedestrian => "Pedestrian",
            Self::Cyclist => "Cyclist",
            Self::Passenger => "Passenger",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Driver,
            Self::Pedestrian,
            Self::Cyclist,
            Self::Passenger,
        ]
    }
}

/// Recorded sex of the person.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PersonSex {
    /// Male
    Male,
    /// Female
    Female,
}

impl PersonSex {
    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Male, Self::Female]
    }
}

/// Worst outcome for the person, ordered `NoInjury < Injury < Fatality`.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum InjurySeverity {
    /// Not injured (property damage only)
    NoInjury = 0,
    /// Injured
    Injury = 1,
    /// Killed
    Fatality = 2,
}

impl InjurySeverity {
    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoInjury => "No injury",
            Self::Injury => "Injury",
            Self::Fatality => "Fatality",
        }
    }

    /// Returns all variants of this enum, least severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::NoInjury, Self::Injury, Self::Fatality]
    }
}

/// Canonical vehicle classes that raw vehicle type codes are folded into.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum VehicleType {
    /// Passenger car / sedan
    Sedan,
    /// Sport utility vehicle / station wagon
    Suv,
    /// Yellow or green cab, livery
    Taxi,
    /// Pick-up truck
    PickupTruck,
    /// Box, tractor, dump, and other heavy trucks
    Truck,
    /// Transit, school, or coach bus
    Bus,
    /// Passenger or cargo van
    Van,
    /// Motorcycle, moped, dirt bike
    Motorcycle,
    /// Human-powered bicycle
    Bicycle,
    /// Electric bicycle
    EBike,
    /// Kick or electric scooter
    Scooter,
    /// Ambulance or other emergency vehicle
    Ambulance,
    /// Any code not covered above
    Other,
}

impl VehicleType {
    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sedan => "Sedan",
            Self::Suv => "SUV",
            Self::Taxi => "Taxi",
            Self::PickupTruck => "Pick-up Truck",
            Self::Truck => "Truck",
            Self::Bus => "Bus",
            Self::Van => "Van",
            Self::Motorcycle => "Motorcycle",
            Self::Bicycle => "Bicycle",
            Self::EBike => "E-Bike",
            Self::Scooter => "Scooter",
            Self::Ambulance => "Ambulance",
            Self::Other => "Other",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Sedan,
            Self::Suv,
            Self::Taxi,
            Self::PickupTruck,
            Self::Truck,
            Self::Bus,
            Self::Van,
            Self::Motorcycle,
            Self::Bicycle,
            Self::EBike,
            Self::Scooter,
            Self::Ambulance,
            Self::Other,
        ]
    }
}

/// One row of the integrated dataset: a collision joined with one person
/// involved in it.
///
/// Value-range invariants (coordinates inside the NYC envelope, hour 0-23,
/// plausible ages) are guaranteed by the ETL that produced the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashRecord {
    /// Collision identifier shared by every person row of one crash.
    pub collision_id: String,
    /// Calendar date of the crash.
    pub date: NaiveDate,
    /// Hour of day (0-23), if recorded.
    pub hour: Option<u8>,
    /// Day of the week, if recorded.
    pub day_of_week: Option<DayOfWeek>,
    /// Borough, `None` when the source reported it as unknown.
    pub borough: Option<Borough>,
    /// WGS84 latitude.
    pub latitude: Option<f64>,
    /// WGS84 longitude.
    pub longitude: Option<f64>,
    /// Class of the first vehicle involved.
    pub vehicle_type_1: Option<VehicleType>,
    /// Class of the second vehicle involved.
    pub vehicle_type_2: Option<VehicleType>,
    /// Contributing factor reported for the first vehicle.
    pub contributing_factor_1: Option<String>,
    /// Contributing factor reported for the second vehicle.
    pub contributing_factor_2: Option<String>,
    /// Role of the person.
    pub person_type: PersonType,
    /// Age in years, if recorded.
    pub person_age: Option<u8>,
    /// Sex, `None` when unknown.
    pub person_sex: Option<PersonSex>,
    /// Worst outcome for the person.
    pub injury_severity: InjurySeverity,
}

impl CrashRecord {
    /// Returns `true` if either vehicle slot is of the given class.
    #[must_use]
    pub fn involves_vehicle(&self, vehicle: VehicleType) -> bool {
        self.vehicle_type_1 == Some(vehicle) || self.vehicle_type_2 == Some(vehicle)
    }
}
