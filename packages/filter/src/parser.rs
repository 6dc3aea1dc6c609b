//! Free-text query parser.
//!
//! Scans normalized tokens left to right. At each position it tries, in
//! order: a year range, a single year, a clock hour, and then the lexicon
//! with the longest window first. A match consumes its tokens; anything
//! else is dropped and reported as unmatched. When several matches target
//! the same field the last one in the text wins.

use std::sync::LazyLock;

use crash_report_filter_models::{Extraction, FilterField, PartialFilterSpec, TimeOfDay, YearRange};
use crash_report_lexicon::{Lexicon, MAX_PHRASE_WORDS, Term, YearBounds, lexicon};
use regex::Regex;
use serde::Serialize;

use crate::normalize::tokenize;

/// `2019-2021` as a single token.
static YEAR_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("valid regex"));

/// `5`, `5pm`, `17:00`, `5:30pm`.
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?(am|pm)?$").expect("valid regex")
});

/// Words that join two years into a range.
const RANGE_JOINERS: &[&str] = &["to", "through", "thru", "-", "until"];

/// Result of parsing one free-text query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    /// Constraints extracted from the text.
    pub filters: PartialFilterSpec,
    /// Every match in text order, including superseded ones.
    pub trace: Vec<Extraction>,
    /// Tokens that matched nothing and were dropped.
    pub unmatched: Vec<String>,
    /// Version of the lexicon used.
    pub lexicon_version: String,
}

/// What a matched window resolved to.
#[derive(Debug, Clone, Copy)]
enum Extracted {
    Term(Term),
    Years(YearRange),
}

impl Extracted {
    const fn field(self) -> Option<FilterField> {
        match self {
            Self::Term(term) => term.field(),
            Self::Years(_) => Some(FilterField::YearRange),
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Term(term) => term.describe(),
            Self::Years(range) => range.to_string(),
        }
    }
}

#[derive(Debug)]
struct Match {
    extracted: Extracted,
    position: usize,
    width: usize,
}

/// Extracts filter constraints from free text using the embedded lexicon.
///
/// Never fails: text that matches nothing simply leaves fields unset.
#[must_use]
pub fn parse(text: &str) -> PartialFilterSpec {
    parse_with_trace(text).filters
}

/// Like [`parse`], but also returns the extraction trace and the dropped
/// tokens.
#[must_use]
pub fn parse_with_trace(text: &str) -> ParsedQuery {
    parse_with_lexicon(text, lexicon())
}

/// Parses `text` against an explicit lexicon.
#[must_use]
pub fn parse_with_lexicon(text: &str, lex: &Lexicon) -> ParsedQuery {
    let tokens = tokenize(text);
    let bounds = lex.year_bounds();

    let mut matches: Vec<Match> = Vec::new();
    let mut unmatched: Vec<String> = Vec::new();
    let mut pos = 0;

    while pos < tokens.len() {
        let found = match_year_range(&tokens, pos, bounds)
            .or_else(|| match_year(&tokens, pos, bounds))
            .or_else(|| match_clock(&tokens, pos))
            .or_else(|| match_lexicon(&tokens, pos, lex));

        if let Some(m) = found {
            pos += m.width;
            if m.extracted.field().is_some() {
                matches.push(m);
            } else {
                log::debug!(
                    "Ignoring '{}'",
                    tokens[m.position..m.position + m.width].join(" ")
                );
            }
        } else {
            unmatched.push(tokens[pos].clone());
            pos += 1;
        }
    }

    let mut filters = PartialFilterSpec::default();
    let mut trace: Vec<Extraction> = Vec::with_capacity(matches.len());

    for (i, m) in matches.iter().enumerate() {
        let Some(field) = m.extracted.field() else {
            continue;
        };
        apply(&mut filters, m.extracted);

        let superseded = matches[i + 1..]
            .iter()
            .any(|later| later.extracted.field() == Some(field));
        let phrase = tokens[m.position..m.position + m.width].join(" ");

        log::debug!(
            "Extracted {field} = {} from '{phrase}'{}",
            m.extracted.describe(),
            if superseded { " (superseded)" } else { "" }
        );

        trace.push(Extraction {
            field,
            phrase,
            value: m.extracted.describe(),
            position: m.position,
            superseded,
        });
    }

    if !unmatched.is_empty() {
        log::debug!("Dropped unmatched tokens: {}", unmatched.join(" "));
    }

    ParsedQuery {
        filters,
        trace,
        unmatched,
        lexicon_version: lex.version().to_string(),
    }
}

fn apply(filters: &mut PartialFilterSpec, extracted: Extracted) {
    match extracted {
        Extracted::Years(range) => filters.year_range = Some(range),
        Extracted::Term(term) => match term {
            Term::Borough(b) => filters.borough = Some(b),
            Term::VehicleType(v) => filters.vehicle_type = Some(v),
            Term::PersonType(p) => filters.person_type = Some(p),
            Term::Severity(s) => filters.severity_min = Some(s),
            Term::Gender(g) => filters.gender = Some(g),
            Term::Days(d) => filters.day_of_week = Some(d),
            Term::TimeBand(b) => filters.time_of_day = Some(TimeOfDay::Band(b)),
            Term::Hour(h) => filters.time_of_day = Some(TimeOfDay::Hour(h)),
            Term::Month(m) => filters.month = Some(m),
            Term::Ignored => {}
        },
    }
}

fn parse_year(token: &str, bounds: YearBounds) -> Option<i32> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok().filter(|y| bounds.contains(*y))
}

/// `2019-2021`, `2019 to 2021`, `between 2019 and 2021`, `from 2019 through 2021`.
fn match_year_range(tokens: &[String], pos: usize, bounds: YearBounds) -> Option<Match> {
    let lead = usize::from(matches!(tokens[pos].as_str(), "between" | "from"));
    let start = pos + lead;
    let first = tokens.get(start)?;

    if let Some(caps) = YEAR_SPAN_RE.captures(first) {
        let a = parse_year(&caps[1], bounds)?;
        let b = parse_year(&caps[2], bounds)?;
        return Some(Match {
            extracted: Extracted::Years(YearRange::between(a, b)),
            position: pos,
            width: lead + 1,
        });
    }

    let a = parse_year(first, bounds)?;
    let joiner = tokens.get(start + 1)?.as_str();
    let joined = RANGE_JOINERS.contains(&joiner) || (lead == 1 && joiner == "and");
    if !joined {
        return None;
    }
    let b = parse_year(tokens.get(start + 2)?, bounds)?;

    Some(Match {
        extracted: Extracted::Years(YearRange::between(a, b)),
        position: pos,
        width: lead + 3,
    })
}

fn match_year(tokens: &[String], pos: usize, bounds: YearBounds) -> Option<Match> {
    let year = parse_year(&tokens[pos], bounds)?;
    Some(Match {
        extracted: Extracted::Years(YearRange::single(year)),
        position: pos,
        width: 1,
    })
}

/// Clock hours need either a meridiem (`5pm`, `5 pm`) or minutes (`17:00`);
/// a bare number is too ambiguous to treat as a time.
fn match_clock(tokens: &[String], pos: usize) -> Option<Match> {
    let caps = CLOCK_RE.captures(&tokens[pos])?;
    let hour: u8 = caps[1].parse().ok()?;

    if let Some(minutes) = caps.get(2) {
        let minutes: u8 = minutes.as_str().parse().ok()?;
        if minutes > 59 {
            return None;
        }
    }

    let (meridiem, width) = match caps.get(3) {
        Some(m) => (Some(m.as_str()), 1),
        None => match tokens.get(pos + 1).map(String::as_str) {
            Some(m @ ("am" | "pm")) => (Some(m), 2),
            _ => (None, 1),
        },
    };

    let hour = match meridiem {
        Some(m) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (m, hour) {
                ("am", 12) => 0,
                ("am", h) | ("pm", h @ 12) => h,
                (_, h) => h + 12,
            }
        }
        None if caps.get(2).is_some() && hour <= 23 => hour,
        None => return None,
    };

    Some(Match {
        extracted: Extracted::Term(Term::Hour(hour)),
        position: pos,
        width,
    })
}

fn match_lexicon(tokens: &[String], pos: usize, lex: &Lexicon) -> Option<Match> {
    (1..=MAX_PHRASE_WORDS).rev().find_map(|width| {
        let window = tokens.get(pos..pos + width)?;
        let term = lex.lookup(&window.join(" "))?;
        Some(Match {
            extracted: Extracted::Term(term),
            position: pos,
            width,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_report_crash_models::{
        Borough, DayOfWeek, InjurySeverity, PersonSex, PersonType, TimeOfDayBand, VehicleType,
    };
    use crash_report_filter_models::DaySelection;

    #[test]
    fn finds_borough_regardless_of_case_and_context() {
        for text in [
            "brooklyn",
            "BROOKLYN",
            "crashes in Brooklyn last year",
            "show me BrOoKlYn pedestrian crashes",
            "Brooklyn.",
        ] {
            assert_eq!(parse(text).borough, Some(Borough::Brooklyn), "{text}");
        }
        assert_eq!(
            parse("crashes on staten island").borough,
            Some(Borough::StatenIsland)
        );
        assert_eq!(parse("the Bronx").borough, Some(Borough::Bronx));
    }

    #[test]
    fn scenario_brooklyn_pedestrians() {
        let filters = parse("Brooklyn 2022 pedestrian crashes");
        assert_eq!(
            filters,
            PartialFilterSpec {
                borough: Some(Borough::Brooklyn),
                year_range: Some(YearRange::single(2022)),
                person_type: Some(PersonType::Pedestrian),
                ..PartialFilterSpec::default()
            }
        );
    }

    #[test]
    fn scenario_queens_friday_night() {
        let filters = parse("Queens Friday night motorcycle fatalities");
        assert_eq!(
            filters,
            PartialFilterSpec {
                borough: Some(Borough::Queens),
                day_of_week: Some(DaySelection::Day(DayOfWeek::Friday)),
                time_of_day: Some(TimeOfDay::Band(TimeOfDayBand::Night)),
                vehicle_type: Some(VehicleType::Motorcycle),
                severity_min: Some(InjurySeverity::Fatality),
                ..PartialFilterSpec::default()
            }
        );
    }

    #[test]
    fn scenario_manhattan_weekend() {
        let filters = parse("Manhattan weekend taxi injuries");
        assert_eq!(filters.borough, Some(Borough::Manhattan));
        assert_eq!(filters.day_of_week, Some(DaySelection::Weekend));
        assert_eq!(filters.vehicle_type, Some(VehicleType::Taxi));
        assert_eq!(filters.severity_min, Some(InjurySeverity::Injury));
    }

    #[test]
    fn empty_text_sets_nothing() {
        let parsed = parse_with_trace("");
        assert!(parsed.filters.is_empty());
        assert!(parsed.trace.is_empty());
        assert!(parsed.unmatched.is_empty());
    }

    #[test]
    fn last_match_wins_and_is_traced() {
        let parsed = parse_with_trace("queens or maybe brooklyn");
        assert_eq!(parsed.filters.borough, Some(Borough::Brooklyn));
        assert_eq!(parsed.trace.len(), 2);
        assert!(parsed.trace[0].superseded);
        assert_eq!(parsed.trace[0].value, "Queens");
        assert!(!parsed.trace[1].superseded);
        assert_eq!(parsed.unmatched, vec!["or", "maybe"]);
    }

    #[test]
    fn longest_phrase_wins() {
        assert_eq!(
            parse("rush hour crashes").time_of_day,
            Some(TimeOfDay::Band(TimeOfDayBand::RushHour))
        );
        assert_eq!(parse("e bike riders").vehicle_type, Some(VehicleType::EBike));
        assert_eq!(parse("fire truck").vehicle_type, Some(VehicleType::Ambulance));
        assert_eq!(
            parse("motorcycle and moped crashes").vehicle_type,
            Some(VehicleType::Motorcycle)
        );
    }

    #[test]
    fn negated_injuries_set_no_threshold() {
        let parsed = parse_with_trace("crashes with no injuries");
        assert_eq!(parsed.filters.severity_min, None);
        assert!(parsed.trace.is_empty());
        assert_eq!(parsed.unmatched, vec!["crashes", "with"]);

        let parsed = parse_with_trace("fatal crashes with no injuries");
        assert_eq!(parsed.filters.severity_min, Some(InjurySeverity::Fatality));
        assert_eq!(parsed.trace.len(), 1);
        assert!(!parsed.trace[0].superseded);
    }

    #[test]
    fn detects_year_ranges() {
        let expected = Some(YearRange {
            start: 2019,
            end: 2021,
        });
        assert_eq!(parse("crashes 2019-2021").year_range, expected);
        assert_eq!(parse("from 2019 to 2021").year_range, expected);
        assert_eq!(parse("between 2021 and 2019").year_range, expected);
        assert_eq!(parse("2019 through 2021").year_range, expected);
        assert_eq!(
            parse("2019 and 2021").year_range,
            Some(YearRange::single(2021))
        );
    }

    #[test]
    fn ignores_implausible_years() {
        let parsed = parse_with_trace("1776 crashes 12345");
        assert_eq!(parsed.filters.year_range, None);
        assert_eq!(parsed.unmatched, vec!["1776", "crashes", "12345"]);
    }

    #[test]
    fn detects_clock_hours() {
        assert_eq!(parse("at 5pm").time_of_day, Some(TimeOfDay::Hour(17)));
        assert_eq!(parse("at 5 pm").time_of_day, Some(TimeOfDay::Hour(17)));
        assert_eq!(parse("17:30").time_of_day, Some(TimeOfDay::Hour(17)));
        assert_eq!(parse("12am").time_of_day, Some(TimeOfDay::Hour(0)));
        assert_eq!(parse("12pm").time_of_day, Some(TimeOfDay::Hour(12)));
        assert_eq!(parse("noon").time_of_day, Some(TimeOfDay::Hour(12)));
        assert_eq!(parse("5 crashes").time_of_day, None);
        assert_eq!(parse("13pm").time_of_day, None);
        assert_eq!(parse("25:00").time_of_day, None);
    }

    #[test]
    fn weekday_is_a_set() {
        assert_eq!(
            parse("weekday crashes").day_of_week,
            Some(DaySelection::Weekdays)
        );
        assert_eq!(
            parse("sat").day_of_week,
            Some(DaySelection::Day(DayOfWeek::Saturday))
        );
    }

    #[test]
    fn months_and_gender() {
        let filters = parse("women cyclists hurt in May 2023");
        assert_eq!(filters.gender, Some(PersonSex::Female));
        assert_eq!(filters.person_type, Some(PersonType::Cyclist));
        assert_eq!(filters.severity_min, Some(InjurySeverity::Injury));
        assert_eq!(filters.month, Some(5));
        assert_eq!(filters.year_range, Some(YearRange::single(2023)));
        assert_eq!(parse("it may rain").month, None);
        assert_eq!(parse("female drivers").gender, Some(PersonSex::Female));
    }

    #[test]
    fn never_fails_on_garbage() {
        let parsed = parse_with_trace("\u{1F697}\u{1F4A5} ;;; -- ::: \0 \u{0301}");
        assert!(parsed.filters.is_empty());
    }
}
