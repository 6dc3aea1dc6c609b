//! Read-only filtered access to loaded records.

use crash_report_crash_models::CrashRecord;
use crash_report_filter_models::FilterSpec;

use crate::Dataset;

/// A borrowed, read-only window over a set of crash records.
///
/// Cheap to copy. Built from a [`Dataset`] or, for synthetic data, any
/// record slice.
#[derive(Debug, Clone, Copy)]
pub struct DatasetView<'a> {
    records: &'a [CrashRecord],
}

impl<'a> DatasetView<'a> {
    /// Creates a view over `records`.
    #[must_use]
    pub const fn new(records: &'a [CrashRecord]) -> Self {
        Self { records }
    }

    /// Number of records visible through the view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the view has no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns every record satisfying all constraints set in `spec`, in
    /// dataset order. Unset fields never exclude a record.
    #[must_use]
    pub fn apply(&self, spec: &FilterSpec) -> FilteredRows<'a> {
        let rows: Vec<&'a CrashRecord> = self
            .records
            .iter()
            .filter(|record| matches(spec, record))
            .collect();

        log::debug!(
            "Filter [{}] matched {} of {} records",
            spec.describe(),
            rows.len(),
            self.records.len()
        );

        FilteredRows { rows }
    }
}

impl<'a> From<&'a Dataset> for DatasetView<'a> {
    fn from(dataset: &'a Dataset) -> Self {
        Self::new(dataset.records())
    }
}

/// Records that passed a filter, borrowed from the underlying dataset.
#[derive(Debug, Clone, Default)]
pub struct FilteredRows<'a> {
    rows: Vec<&'a CrashRecord>,
}

impl<'a> FilteredRows<'a> {
    /// Number of matching rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates the matching rows in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &'a CrashRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Returns the matching rows as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[&'a CrashRecord] {
        &self.rows
    }
}

/// Returns `true` if `record` satisfies every constraint set in `spec`.
///
/// Records with an unknown value for a constrained field never match it.
#[must_use]
pub fn matches(spec: &FilterSpec, record: &CrashRecord) -> bool {
    spec.borough.is_none_or(|b| record.borough == Some(b))
        && spec.matches_date(record.date)
        && spec
            .day_of_week
            .is_none_or(|days| record.day_of_week.is_some_and(|d| days.contains(d)))
        && spec
            .time_of_day
            .is_none_or(|time| record.hour.is_some_and(|h| time.contains(h)))
        && spec.vehicle_type.is_none_or(|v| record.involves_vehicle(v))
        && spec.person_type.is_none_or(|p| record.person_type == p)
        && spec
            .severity_min
            .is_none_or(|min| record.injury_severity >= min)
        && spec.gender.is_none_or(|g| record.person_sex == Some(g))
}
