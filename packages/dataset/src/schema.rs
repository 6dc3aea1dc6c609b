//! Column layout of the integrated collision CSV.

use csv::StringRecord;

use crate::DatasetError;

pub const COLLISION_ID: &str = "COLLISION_ID";
pub const CRASH_DATE: &str = "CRASH_DATE";
pub const CRASH_HOUR: &str = "CRASH_HOUR";
pub const DAY_OF_WEEK: &str = "DAY_OF_WEEK";
pub const BOROUGH: &str = "BOROUGH";
pub const LATITUDE: &str = "LATITUDE";
pub const LONGITUDE: &str = "LONGITUDE";
pub const VEHICLE_TYPE_CODE_1: &str = "VEHICLE_TYPE_CODE_1";
pub const VEHICLE_TYPE_CODE_2: &str = "VEHICLE_TYPE_CODE_2";
pub const CONTRIBUTING_FACTOR_VEHICLE_1: &str = "CONTRIBUTING_FACTOR_VEHICLE_1";
pub const CONTRIBUTING_FACTOR_VEHICLE_2: &str = "CONTRIBUTING_FACTOR_VEHICLE_2";
pub const PERSON_TYPE: &str = "PERSON_TYPE";
pub const PERSON_AGE: &str = "PERSON_AGE";
pub const PERSON_SEX: &str = "PERSON_SEX";
pub const INJURY_SEVERITY: &str = "INJURY_SEVERITY";

/// Every column the loader requires, in canonical order. Extra columns are
/// ignored.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    COLLISION_ID,
    CRASH_DATE,
    CRASH_HOUR,
    DAY_OF_WEEK,
    BOROUGH,
    LATITUDE,
    LONGITUDE,
    VEHICLE_TYPE_CODE_1,
    VEHICLE_TYPE_CODE_2,
    CONTRIBUTING_FACTOR_VEHICLE_1,
    CONTRIBUTING_FACTOR_VEHICLE_2,
    PERSON_TYPE,
    PERSON_AGE,
    PERSON_SEX,
    INJURY_SEVERITY,
];

/// Positions of the required columns within one file's header row.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnIndex {
    /// Locates every required column in `headers`. Header names are
    /// compared after trimming, case-insensitively.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::SchemaMismatch`] listing every missing column
    pub fn from_headers(headers: &StringRecord) -> Result<Self, DatasetError> {
        let mut positions = [0; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();

        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
            {
                Some(pos) => *slot = pos,
                None => missing.push(column.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            Err(DatasetError::SchemaMismatch { missing })
        }
    }

    /// Returns the trimmed cell for `column` in `record` (empty when the row
    /// is short).
    #[must_use]
    pub fn cell<'r>(&self, record: &'r StringRecord, column: &str) -> &'r str {
        REQUIRED_COLUMNS
            .iter()
            .position(|c| *c == column)
            .and_then(|i| record.get(self.positions[i]))
            .map_or("", str::trim)
    }
}
