//! Explicit filter selections made through dropdown-style controls.
//!
//! Each control sends its raw label. `"All"` or a blank value means the
//! control is unset. Labels are matched case-insensitively against the
//! display labels and the canonical names of each domain.

use std::str::FromStr;

use crash_report_crash_models::{
    Borough, DayOfWeek, InjurySeverity, PersonSex, PersonType, TimeOfDayBand, VehicleType,
    parse_label,
};
use crash_report_filter_models::{
    DaySelection, FilterField, MONTH_NAMES, PartialFilterSpec, TimeOfDay, YearRange,
};
use serde::{Deserialize, Serialize};

use crate::FilterError;

/// Raw values of the explicit filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropdownSelections {
    /// Borough label (`"Staten Island"`).
    pub borough: Option<String>,
    /// A year (`"2022"`) or an inclusive range (`"2019-2021"`).
    pub year: Option<String>,
    /// Month number (`"7"`) or name (`"July"`).
    pub month: Option<String>,
    /// Day name, `"Weekend"` or `"Weekdays"`.
    pub day_of_week: Option<String>,
    /// Hour (`"17"`, `"17:00"`) or band name (`"Rush hour"`).
    pub time_of_day: Option<String>,
    /// Vehicle class label.
    pub vehicle_type: Option<String>,
    /// Person role label.
    pub person_type: Option<String>,
    /// Minimum severity label.
    pub severity: Option<String>,
    /// Person sex label (`"Female"`, `"F"`).
    pub gender: Option<String>,
}

impl DropdownSelections {
    /// Converts the raw selections into explicit filter constraints.
    ///
    /// Numeric values are passed through unchecked so that range errors are
    /// reported by [`crate::resolve`] together with every other validation.
    ///
    /// # Errors
    ///
    /// * [`FilterError::Validation`] if a label matches nothing in its domain
    pub fn to_partial(&self) -> Result<PartialFilterSpec, FilterError> {
        Ok(PartialFilterSpec {
            borough: selected(self.borough.as_deref())
                .map(|raw| choose(FilterField::Borough, raw, Borough::all(), Borough::label))
                .transpose()?,
            year_range: selected(self.year.as_deref())
                .map(parse_year_selection)
                .transpose()?,
            month: selected(self.month.as_deref())
                .map(parse_month_selection)
                .transpose()?,
            day_of_week: selected(self.day_of_week.as_deref())
                .map(parse_day_selection)
                .transpose()?,
            time_of_day: selected(self.time_of_day.as_deref())
                .map(parse_time_selection)
                .transpose()?,
            vehicle_type: selected(self.vehicle_type.as_deref())
                .map(|raw| {
                    choose(
                        FilterField::VehicleType,
                        raw,
                        VehicleType::all(),
                        VehicleType::label,
                    )
                })
                .transpose()?,
            person_type: selected(self.person_type.as_deref())
                .map(|raw| {
                    choose(
                        FilterField::PersonType,
                        raw,
                        PersonType::all(),
                        PersonType::label,
                    )
                })
                .transpose()?,
            severity_min: selected(self.severity.as_deref())
                .map(|raw| {
                    choose(
                        FilterField::SeverityMin,
                        raw,
                        InjurySeverity::all(),
                        InjurySeverity::label,
                    )
                })
                .transpose()?,
            gender: selected(self.gender.as_deref())
                .map(parse_gender_selection)
                .transpose()?,
        })
    }
}

/// Returns the trimmed value unless the control is blank or `"All"`.
fn selected(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn choose<T: Copy + FromStr>(
    field: FilterField,
    raw: &str,
    domain: &[T],
    label: fn(T) -> &'static str,
) -> Result<T, FilterError> {
    domain
        .iter()
        .copied()
        .find(|v| label(*v).eq_ignore_ascii_case(raw))
        .or_else(|| parse_label(raw))
        .ok_or_else(|| FilterError::validation(field, raw, format!("unknown {field}")))
}

fn parse_year_selection(raw: &str) -> Result<YearRange, FilterError> {
    let invalid =
        || FilterError::validation(FilterField::YearRange, raw, "expected YYYY or YYYY-YYYY");

    match raw.split_once('-') {
        Some((start, end)) => Ok(YearRange {
            start: start.trim().parse().map_err(|_| invalid())?,
            end: end.trim().parse().map_err(|_| invalid())?,
        }),
        None => raw.parse().map(YearRange::single).map_err(|_| invalid()),
    }
}

fn parse_month_selection(raw: &str) -> Result<u8, FilterError> {
    if let Ok(number) = raw.parse::<u8>() {
        return Ok(number);
    }
    MONTH_NAMES
        .iter()
        .zip(1u8..)
        .find(|(name, _)| name.eq_ignore_ascii_case(raw) || name[..3].eq_ignore_ascii_case(raw))
        .map(|(_, number)| number)
        .ok_or_else(|| FilterError::validation(FilterField::Month, raw, "unknown month"))
}

fn parse_day_selection(raw: &str) -> Result<DaySelection, FilterError> {
    match raw.to_ascii_lowercase().as_str() {
        "weekend" | "weekends" => Ok(DaySelection::Weekend),
        "weekday" | "weekdays" => Ok(DaySelection::Weekdays),
        _ => choose(FilterField::DayOfWeek, raw, DayOfWeek::all(), DayOfWeek::label)
            .map(DaySelection::Day),
    }
}

fn parse_time_selection(raw: &str) -> Result<TimeOfDay, FilterError> {
    let hour_part = raw.strip_suffix(":00").unwrap_or(raw);
    if let Ok(hour) = hour_part.parse::<u8>() {
        return Ok(TimeOfDay::Hour(hour));
    }
    choose(
        FilterField::TimeOfDay,
        raw,
        TimeOfDayBand::all(),
        TimeOfDayBand::label,
    )
    .map(TimeOfDay::Band)
}

fn parse_gender_selection(raw: &str) -> Result<PersonSex, FilterError> {
    match raw.to_ascii_uppercase().as_str() {
        "M" => Ok(PersonSex::Male),
        "F" => Ok(PersonSex::Female),
        _ => choose(FilterField::Gender, raw, PersonSex::all(), PersonSex::label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selections() -> DropdownSelections {
        DropdownSelections::default()
    }

    #[test]
    fn all_and_blank_are_unset() {
        let dropdowns = DropdownSelections {
            borough: Some("All".to_string()),
            year: Some("  ".to_string()),
            gender: Some("all".to_string()),
            ..selections()
        };
        assert!(dropdowns.to_partial().unwrap().is_empty());
    }

    #[test]
    fn matches_display_and_canonical_labels() {
        let dropdowns = DropdownSelections {
            borough: Some("staten island".to_string()),
            vehicle_type: Some("Pick-up Truck".to_string()),
            severity: Some("NO_INJURY".to_string()),
            person_type: Some("Cyclist".to_string()),
            gender: Some("f".to_string()),
            ..selections()
        };
        let partial = dropdowns.to_partial().unwrap();
        assert_eq!(partial.borough, Some(Borough::StatenIsland));
        assert_eq!(partial.vehicle_type, Some(VehicleType::PickupTruck));
        assert_eq!(partial.severity_min, Some(InjurySeverity::NoInjury));
        assert_eq!(partial.person_type, Some(PersonType::Cyclist));
        assert_eq!(partial.gender, Some(PersonSex::Female));
    }

    #[test]
    fn parses_years_months_days_and_times() {
        let dropdowns = DropdownSelections {
            year: Some("2019-2021".to_string()),
            month: Some("Jul".to_string()),
            day_of_week: Some("Weekend".to_string()),
            time_of_day: Some("17:00".to_string()),
            ..selections()
        };
        let partial = dropdowns.to_partial().unwrap();
        assert_eq!(
            partial.year_range,
            Some(YearRange {
                start: 2019,
                end: 2021
            })
        );
        assert_eq!(partial.month, Some(7));
        assert_eq!(partial.day_of_week, Some(DaySelection::Weekend));
        assert_eq!(partial.time_of_day, Some(TimeOfDay::Hour(17)));

        let band = DropdownSelections {
            time_of_day: Some("Rush hour".to_string()),
            day_of_week: Some("friday".to_string()),
            ..selections()
        }
        .to_partial()
        .unwrap();
        assert_eq!(
            band.time_of_day,
            Some(TimeOfDay::Band(TimeOfDayBand::RushHour))
        );
        assert_eq!(band.day_of_week, Some(DaySelection::Day(DayOfWeek::Friday)));
    }

    #[test]
    fn unknown_label_is_a_validation_error() {
        let dropdowns = DropdownSelections {
            borough: Some("Hoboken".to_string()),
            ..selections()
        };
        let err = dropdowns.to_partial().unwrap_err();
        assert_eq!(
            err,
            FilterError::Validation {
                field: FilterField::Borough,
                value: "Hoboken".to_string(),
                reason: "unknown borough".to_string(),
            }
        );
    }

    #[test]
    fn out_of_range_numbers_fail_in_resolve() {
        let explicit = DropdownSelections {
            month: Some("13".to_string()),
            ..selections()
        }
        .to_partial()
        .unwrap();
        assert_eq!(explicit.month, Some(13));
        assert!(crate::resolve(&PartialFilterSpec::default(), &explicit).is_err());
    }
}
