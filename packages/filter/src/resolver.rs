//! Merges text-derived constraints with explicit selections.

use crash_report_filter_models::{FilterField, FilterSpec, PartialFilterSpec, TimeOfDay};
use crash_report_lexicon::lexicon;

use crate::FilterError;

/// Combines the constraints parsed from free text with explicitly chosen
/// values into one canonical [`FilterSpec`].
///
/// Explicit values always win over text-derived values for the same field.
/// A field set in neither input stays unset.
///
/// # Errors
///
/// * [`FilterError::Validation`] if an explicit value is out of its domain:
///   a month outside 1-12, an hour above 23, or a year range that is
///   reversed or outside the plausible year bounds.
pub fn resolve(
    partial: &PartialFilterSpec,
    explicit: &PartialFilterSpec,
) -> Result<FilterSpec, FilterError> {
    validate(explicit)?;

    let merged = partial.overlaid_with(explicit);

    for field in explicit.set_fields() {
        if partial.set_fields().contains(&field) {
            log::debug!("Explicit {field} overrides the value parsed from text");
        }
    }

    Ok(FilterSpec {
        borough: merged.borough,
        year_range: merged.year_range,
        month: merged.month,
        day_of_week: merged.day_of_week,
        time_of_day: merged.time_of_day,
        vehicle_type: merged.vehicle_type,
        person_type: merged.person_type,
        severity_min: merged.severity_min,
        gender: merged.gender,
    })
}

fn validate(explicit: &PartialFilterSpec) -> Result<(), FilterError> {
    if let Some(month) = explicit.month
        && !(1..=12).contains(&month)
    {
        return Err(FilterError::validation(
            FilterField::Month,
            month,
            "month must be between 1 and 12",
        ));
    }

    if let Some(TimeOfDay::Hour(hour)) = explicit.time_of_day
        && hour > 23
    {
        return Err(FilterError::validation(
            FilterField::TimeOfDay,
            hour,
            "hour must be between 0 and 23",
        ));
    }

    if let Some(range) = explicit.year_range {
        if range.start > range.end {
            return Err(FilterError::validation(
                FilterField::YearRange,
                format!("{}-{}", range.start, range.end),
                "start year is after end year",
            ));
        }
        let bounds = lexicon().year_bounds();
        if !bounds.contains(range.start) || !bounds.contains(range.end) {
            return Err(FilterError::validation(
                FilterField::YearRange,
                range,
                format!("years must be between {} and {}", bounds.min, bounds.max),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_report_crash_models::{Borough, InjurySeverity, PersonType};
    use crash_report_filter_models::YearRange;

    use crate::parse;

    #[test]
    fn explicit_value_wins() {
        let text = parse("Brooklyn 2022 pedestrian crashes");
        let explicit = PartialFilterSpec {
            borough: Some(Borough::Queens),
            ..PartialFilterSpec::default()
        };
        let spec = resolve(&text, &explicit).unwrap();
        assert_eq!(spec.borough, Some(Borough::Queens));
        assert_eq!(spec.year_range, Some(YearRange::single(2022)));
        assert_eq!(spec.person_type, Some(PersonType::Pedestrian));
    }

    #[test]
    fn fields_from_either_side_survive() {
        let text = PartialFilterSpec {
            severity_min: Some(InjurySeverity::Fatality),
            ..PartialFilterSpec::default()
        };
        let explicit = PartialFilterSpec {
            month: Some(7),
            ..PartialFilterSpec::default()
        };
        let spec = resolve(&text, &explicit).unwrap();
        assert_eq!(spec.severity_min, Some(InjurySeverity::Fatality));
        assert_eq!(spec.month, Some(7));
        assert_eq!(spec.borough, None);
    }

    #[test]
    fn empty_inputs_are_unrestricted() {
        let spec = resolve(&PartialFilterSpec::default(), &PartialFilterSpec::default()).unwrap();
        assert!(spec.is_unrestricted());
    }

    #[test]
    fn resolving_twice_is_stable() {
        let text = parse("Queens Friday night motorcycle fatalities 2021");
        let explicit = PartialFilterSpec {
            borough: Some(Borough::Bronx),
            month: Some(3),
            ..PartialFilterSpec::default()
        };
        let once = resolve(&text, &explicit).unwrap();
        let twice = resolve(&PartialFilterSpec::from(once), &explicit).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_bad_month() {
        let explicit = PartialFilterSpec {
            month: Some(13),
            ..PartialFilterSpec::default()
        };
        let err = resolve(&PartialFilterSpec::default(), &explicit).unwrap_err();
        assert!(matches!(
            err,
            FilterError::Validation {
                field: FilterField::Month,
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_hour() {
        let explicit = PartialFilterSpec {
            time_of_day: Some(TimeOfDay::Hour(24)),
            ..PartialFilterSpec::default()
        };
        assert!(resolve(&PartialFilterSpec::default(), &explicit).is_err());
    }

    #[test]
    fn rejects_reversed_or_implausible_years() {
        for range in [
            YearRange {
                start: 2022,
                end: 2019,
            },
            YearRange::single(1899),
        ] {
            let explicit = PartialFilterSpec {
                year_range: Some(range),
                ..PartialFilterSpec::default()
            };
            let err = resolve(&PartialFilterSpec::default(), &explicit).unwrap_err();
            assert!(matches!(
                err,
                FilterError::Validation {
                    field: FilterField::YearRange,
                    ..
                }
            ));
        }
    }
}
