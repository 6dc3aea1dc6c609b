//! Parsers for individual CSV cells.
//!
//! Every parser receives a trimmed, non-empty cell and returns `None` when
//! the value cannot be interpreted. Whether that is fatal is decided by the
//! loader: required columns fail the load, optional ones become missing.

use chrono::NaiveDate;
use crash_report_crash_models::{
    Borough, DayOfWeek, InjurySeverity, PersonSex, PersonType, parse_label,
};

/// Parses `YYYY-MM-DD`, `MM/DD/YYYY`, or the date prefix of an ISO
/// datetime (`2022-03-01T00:00:00.000`).
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok())
}

/// Parses an hour of day, accepting `17` and `17:00`.
#[must_use]
pub fn parse_hour(raw: &str) -> Option<u8> {
    let hour = raw.split(':').next()?.parse::<u8>().ok()?;
    (hour <= 23).then_some(hour)
}

/// Parses a day name (`Friday`, `FRIDAY`, `Fri`).
#[must_use]
pub fn parse_day(raw: &str) -> Option<DayOfWeek> {
    parse_label(raw).or_else(|| {
        if raw.len() != 3 {
            return None;
        }
        DayOfWeek::all()
            .iter()
            .copied()
            .find(|d| d.label()[..3].eq_ignore_ascii_case(raw))
    })
}

/// Parses a borough name. The source's `"Unknown"` is reported as missing.
#[must_use]
pub fn parse_borough(raw: &str) -> Option<Option<Borough>> {
    if raw.eq_ignore_ascii_case("unknown") {
        return Some(None);
    }
    parse_label(raw).map(Some)
}

/// Parses a coordinate. A literal zero is the source's placeholder for a
/// missing location.
#[must_use]
pub fn parse_coordinate(raw: &str) -> Option<Option<f64>> {
    let value = raw.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value != 0.0).then_some(value))
}

/// Normalizes a contributing factor. `"Unspecified"` is treated as missing.
#[must_use]
pub fn parse_factor(raw: &str) -> Option<String> {
    if raw.eq_ignore_ascii_case("unspecified") {
        return None;
    }
    Some(raw.to_string())
}

/// Parses a person role, including the collision dataset's own labels
/// (`Occupant`, `Bicyclist`, `Other Motorized`).
#[must_use]
pub fn parse_person_type(raw: &str) -> Option<PersonType> {
    match raw.to_lowercase().as_str() {
        "driver" => Some(PersonType::Driver),
        "pedestrian" => Some(PersonType::Pedestrian),
        "cyclist" | "bicyclist" | "other motorized" => Some(PersonType::Cyclist),
        "occupant" | "passenger" => Some(PersonType::Passenger),
        _ => parse_label(raw),
    }
}

/// Parses an age in whole years.
#[must_use]
pub fn parse_age(raw: &str) -> Option<u8> {
    raw.parse().ok()
}

/// Parses a person sex. `U` and `Unknown` are reported as missing.
#[must_use]
pub fn parse_sex(raw: &str) -> Option<Option<PersonSex>> {
    match raw.to_uppercase().as_str() {
        "M" | "MALE" => Some(Some(PersonSex::Male)),
        "F" | "FEMALE" => Some(Some(PersonSex::Female)),
        "U" | "UNKNOWN" => Some(None),
        _ => None,
    }
}

/// Parses an injury outcome from a label or its numeric rank.
#[must_use]
pub fn parse_severity(raw: &str) -> Option<InjurySeverity> {
    match raw.to_lowercase().as_str() {
        "0" | "none" | "no injury" | "uninjured" | "property damage" | "property damage only" => {
            Some(InjurySeverity::NoInjury)
        }
        "1" | "injury" | "injured" => Some(InjurySeverity::Injury),
        "2" | "fatal" | "fatality" | "killed" => Some(InjurySeverity::Fatality),
        _ => parse_label(raw),
    }
}
