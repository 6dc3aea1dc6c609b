#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Controlled vocabularies for free-text crash queries.
//!
//! The lexicon maps lowercase surface phrases (one to three words) to
//! canonical filter values. It is defined in `lexicon.toml`, embedded at
//! compile time, and indexed once on first use. Every phrase maps to exactly
//! one [`Term`], so lookups are deterministic.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crash_report_crash_models::{
    Borough, InjurySeverity, PersonSex, PersonType, TimeOfDayBand, VehicleType,
};
use crash_report_filter_models::{DaySelection, FilterField, TimeOfDay, month_name};
use serde::Deserialize;
use thiserror::Error;

/// Longest phrase, in words, that any lexicon form may have.
pub const MAX_PHRASE_WORDS: usize = 3;

/// Embedded lexicon definition.
const LEXICON_TOML: &str = include_str!("../lexicon.toml");

static DEFAULT_LEXICON: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::from_toml(LEXICON_TOML)
        .unwrap_or_else(|e| panic!("Failed to load embedded lexicon: {e}"))
});

/// Errors raised while loading a lexicon definition.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The TOML could not be parsed into the lexicon schema.
    #[error("Lexicon parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two entries claim the same surface form.
    #[error("Surface form '{form}' is mapped more than once")]
    DuplicateForm {
        /// The repeated form.
        form: String,
    },

    /// A form is empty, not lowercase, or longer than [`MAX_PHRASE_WORDS`].
    #[error("Invalid surface form '{form}': {reason}")]
    InvalidForm {
        /// The offending form.
        form: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A month or hour value is out of range.
    #[error("Invalid {section} value {value}")]
    InvalidValue {
        /// Section containing the value.
        section: &'static str,
        /// The out-of-range value.
        value: u8,
    },
}

/// Canonical value a lexicon phrase resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    /// A borough name.
    Borough(Borough),
    /// A vehicle class.
    VehicleType(VehicleType),
    /// A person role.
    PersonType(PersonType),
    /// A severity threshold.
    Severity(InjurySeverity),
    /// A person sex.
    Gender(PersonSex),
    /// A single day or a named day set.
    Days(DaySelection),
    /// A named hour band.
    TimeBand(TimeOfDayBand),
    /// A clock word naming one hour (`noon`).
    Hour(u8),
    /// A month, 1-12.
    Month(u8),
    /// A recognized phrase that places no constraint (`no injuries`).
    Ignored,
}

impl Term {
    /// Returns the filter field this term populates, or `None` for
    /// [`Term::Ignored`].
    #[must_use]
    pub const fn field(self) -> Option<FilterField> {
        Some(match self {
            Self::Borough(_) => FilterField::Borough,
            Self::VehicleType(_) => FilterField::VehicleType,
            Self::PersonType(_) => FilterField::PersonType,
            Self::Severity(_) => FilterField::SeverityMin,
            Self::Gender(_) => FilterField::Gender,
            Self::Days(_) => FilterField::DayOfWeek,
            Self::TimeBand(_) | Self::Hour(_) => FilterField::TimeOfDay,
            Self::Month(_) => FilterField::Month,
            Self::Ignored => return None,
        })
    }

    /// Returns a display string for the canonical value.
    #[must_use]
    pub fn describe(self) -> String {
        match self {
            Self::Borough(b) => b.label().to_string(),
            Self::VehicleType(v) => v.label().to_string(),
            Self::PersonType(p) => p.label().to_string(),
            Self::Severity(s) => s.label().to_string(),
            Self::Gender(g) => g.label().to_string(),
            Self::Days(d) => d.label().to_string(),
            Self::TimeBand(b) => TimeOfDay::Band(b).to_string(),
            Self::Hour(h) => TimeOfDay::Hour(h).to_string(),
            Self::Month(m) => month_name(m).unwrap_or("?").to_string(),
            Self::Ignored => "(no constraint)".to_string(),
        }
    }
}

/// Inclusive range of years the parser treats as plausible query years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct YearBounds {
    /// Earliest accepted year.
    pub min: i32,
    /// Latest accepted year.
    pub max: i32,
}

impl YearBounds {
    /// Returns `true` if `year` is inside the bounds.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// One canonical value and its accepted surface forms.
#[derive(Debug, Clone, Deserialize)]
struct Entry<T> {
    value: T,
    forms: Vec<String>,
}

/// Forms that are recognized but set nothing.
#[derive(Debug, Clone, Default, Deserialize)]
struct IgnoredForms {
    forms: Vec<String>,
}

/// On-disk shape of `lexicon.toml`.
#[derive(Debug, Deserialize)]
struct LexiconDefinition {
    version: String,
    year_bounds: YearBounds,
    boroughs: Vec<Entry<Borough>>,
    vehicle_types: Vec<Entry<VehicleType>>,
    person_types: Vec<Entry<PersonType>>,
    severities: Vec<Entry<InjurySeverity>>,
    genders: Vec<Entry<PersonSex>>,
    days: Vec<Entry<DaySelection>>,
    time_bands: Vec<Entry<TimeOfDayBand>>,
    months: Vec<Entry<u8>>,
    clock_words: Vec<Entry<u8>>,
    #[serde(default)]
    ignored: IgnoredForms,
}

/// Number of canonical values and surface forms in one lexicon section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    /// Section name as it appears in `lexicon.toml`.
    pub name: &'static str,
    /// Number of canonical values.
    pub values: usize,
    /// Number of surface forms across those values.
    pub forms: usize,
}

/// An indexed, immutable lexicon.
#[derive(Debug)]
pub struct Lexicon {
    version: String,
    year_bounds: YearBounds,
    index: BTreeMap<String, Term>,
    sections: Vec<SectionSummary>,
}

impl Lexicon {
    /// Parses and indexes a lexicon definition.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError`] if the TOML is malformed, a form is invalid
    /// or repeated, or a month/hour value is out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self, LexiconError> {
        let def: LexiconDefinition = toml::de::from_str(toml_str)?;

        let mut builder = IndexBuilder::default();
        builder.section("boroughs", &def.boroughs, Term::Borough)?;
        builder.section("vehicle_types", &def.vehicle_types, Term::VehicleType)?;
        builder.section("person_types", &def.person_types, Term::PersonType)?;
        builder.section("severities", &def.severities, Term::Severity)?;
        builder.section("genders", &def.genders, Term::Gender)?;
        builder.section("days", &def.days, Term::Days)?;
        builder.section("time_bands", &def.time_bands, Term::TimeBand)?;

        for entry in &def.months {
            if !(1..=12).contains(&entry.value) {
                return Err(LexiconError::InvalidValue {
                    section: "months",
                    value: entry.value,
                });
            }
        }
        builder.section("months", &def.months, Term::Month)?;

        for entry in &def.clock_words {
            if entry.value > 23 {
                return Err(LexiconError::InvalidValue {
                    section: "clock_words",
                    value: entry.value,
                });
            }
        }
        builder.section("clock_words", &def.clock_words, Term::Hour)?;

        let ignored = [Entry {
            value: (),
            forms: def.ignored.forms,
        }];
        builder.section("ignored", &ignored, |()| Term::Ignored)?;

        log::debug!(
            "Indexed lexicon {} with {} surface forms",
            def.version,
            builder.index.len()
        );

        Ok(Self {
            version: def.version,
            year_bounds: def.year_bounds,
            index: builder.index,
            sections: builder.sections,
        })
    }

    /// Looks up a normalized phrase (lowercase words joined by single
    /// spaces).
    #[must_use]
    pub fn lookup(&self, phrase: &str) -> Option<Term> {
        self.index.get(phrase).copied()
    }

    /// Returns the lexicon version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the plausible year bounds for year detection.
    #[must_use]
    pub const fn year_bounds(&self) -> YearBounds {
        self.year_bounds
    }

    /// Returns per-section value and form counts, in definition order.
    #[must_use]
    pub fn sections(&self) -> &[SectionSummary] {
        &self.sections
    }

    /// Iterates every `(form, term)` pair in lexicographic form order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Term)> {
        self.index.iter().map(|(form, term)| (form.as_str(), *term))
    }
}

/// Returns the embedded lexicon, indexing it on first use.
///
/// # Panics
///
/// Panics if the embedded `lexicon.toml` is invalid. It is a compile-time
/// constant, so a failure is a development error caught by the tests below.
#[must_use]
pub fn lexicon() -> &'static Lexicon {
    &DEFAULT_LEXICON
}

#[derive(Default)]
struct IndexBuilder {
    index: BTreeMap<String, Term>,
    sections: Vec<SectionSummary>,
}

impl IndexBuilder {
    fn section<T: Copy>(
        &mut self,
        name: &'static str,
        entries: &[Entry<T>],
        to_term: impl Fn(T) -> Term,
    ) -> Result<(), LexiconError> {
        let mut forms = 0;
        for entry in entries {
            for form in &entry.forms {
                validate_form(form)?;
                if self.index.insert(form.clone(), to_term(entry.value)).is_some() {
                    return Err(LexiconError::DuplicateForm { form: form.clone() });
                }
                forms += 1;
            }
        }
        self.sections.push(SectionSummary {
            name,
            values: entries.len(),
            forms,
        });
        Ok(())
    }
}

fn validate_form(form: &str) -> Result<(), LexiconError> {
    let invalid = |reason| LexiconError::InvalidForm {
        form: form.to_string(),
        reason,
    };

    if form.trim().is_empty() {
        return Err(invalid("empty"));
    }
    if form.to_lowercase() != form {
        return Err(invalid("not lowercase"));
    }
    if form.split(' ').any(str::is_empty) {
        return Err(invalid("words must be separated by single spaces"));
    }
    if form.split(' ').count() > MAX_PHRASE_WORDS {
        return Err(invalid("too many words"));
    }
    Ok(())
}
