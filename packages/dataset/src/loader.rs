//! CSV loading.
//!
//! Reads the integrated collision CSV (optionally gzip-compressed) into
//! [`CrashRecord`]s. The header row is checked against
//! [`REQUIRED_COLUMNS`](crate::schema::REQUIRED_COLUMNS) before any data row
//! is read.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crash_report_crash_models::{CrashRecord, DayOfWeek};
use csv::StringRecord;

use crate::DatasetError;
use crate::cells;
use crate::progress::ProgressCallback;
use crate::schema::{self, ColumnIndex};
use crate::vehicle_codes::classify_vehicle_code;

/// Rows between progress updates.
const PROGRESS_INTERVAL: u64 = 50_000;

/// Opens `path` for reading, transparently decompressing `.gz` files.
///
/// # Errors
///
/// * [`DatasetError::Io`] if the file cannot be opened
pub fn open(path: &Path) -> Result<Box<dyn Read>, DatasetError> {
    let file = BufReader::new(File::open(path)?);

    let is_gzipped = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if is_gzipped {
        log::debug!("Decompressing {} as gzip", path.display());
        Ok(Box::new(flate2::read::GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Parses every data row of a collision CSV.
///
/// # Errors
///
/// * [`DatasetError::SchemaMismatch`] if required columns are missing
/// * [`DatasetError::InvalidValue`] if a required cell cannot be parsed
/// * [`DatasetError::Csv`] if the CSV itself is malformed
pub fn read_records<R: Read>(
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<CrashRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    let mut raw = StringRecord::new();

    while reader.read_record(&mut raw)? {
        let line = raw
            .position()
            .map_or(records.len() as u64 + 2, csv::Position::line);

        let row = RowParser {
            line,
            record: &raw,
            columns: &columns,
        };
        records.push(row.parse()?);

        let count = records.len() as u64;
        if count % PROGRESS_INTERVAL == 0 {
            progress.set_position(count);
        }
    }

    progress.set_position(records.len() as u64);

    Ok(records)
}

/// Parses one data row against the resolved column positions.
struct RowParser<'r> {
    line: u64,
    record: &'r StringRecord,
    columns: &'r ColumnIndex,
}

impl RowParser<'_> {
    fn parse(&self) -> Result<CrashRecord, DatasetError> {
        let date = self.required(schema::CRASH_DATE, cells::parse_date)?;

        let latitude = self.optional(schema::LATITUDE, cells::parse_coordinate).flatten();
        let longitude = self.optional(schema::LONGITUDE, cells::parse_coordinate).flatten();

        Ok(CrashRecord {
            collision_id: self
                .required(schema::COLLISION_ID, |raw| Some(raw.to_string()))?,
            date,
            hour: self.optional(schema::CRASH_HOUR, cells::parse_hour),
            day_of_week: Some(
                self.optional(schema::DAY_OF_WEEK, cells::parse_day)
                    .unwrap_or_else(|| DayOfWeek::of_date(date)),
            ),
            borough: self.optional(schema::BOROUGH, cells::parse_borough).flatten(),
            latitude,
            longitude,
            vehicle_type_1: self.optional(schema::VEHICLE_TYPE_CODE_1, classify_vehicle_code),
            vehicle_type_2: self.optional(schema::VEHICLE_TYPE_CODE_2, classify_vehicle_code),
            contributing_factor_1: self
                .optional(schema::CONTRIBUTING_FACTOR_VEHICLE_1, cells::parse_factor),
            contributing_factor_2: self
                .optional(schema::CONTRIBUTING_FACTOR_VEHICLE_2, cells::parse_factor),
            person_type: self.required(schema::PERSON_TYPE, cells::parse_person_type)?,
            person_age: self.optional(schema::PERSON_AGE, cells::parse_age),
            person_sex: self.optional(schema::PERSON_SEX, cells::parse_sex).flatten(),
            injury_severity: self.required(schema::INJURY_SEVERITY, cells::parse_severity)?,
        })
    }

    fn required<T>(
        &self,
        column: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, DatasetError> {
        let raw = self.columns.cell(self.record, column);
        if raw.is_empty() {
            return Err(self.invalid(column, raw));
        }
        parse(raw).ok_or_else(|| self.invalid(column, raw))
    }

    fn optional<T>(&self, column: &'static str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.columns.cell(self.record, column);
        if raw.is_empty() {
            return None;
        }
        let value = parse(raw);
        if value.is_none() && !is_placeholder(column, raw) {
            log::warn!(
                "Line {}: ignoring unparseable {column} value '{raw}'",
                self.line
            );
        }
        value
    }

    fn invalid(&self, column: &'static str, raw: &str) -> DatasetError {
        DatasetError::InvalidValue {
            row: self.line,
            column,
            value: raw.to_string(),
        }
    }
}

/// Values the source uses for "missing" that a parser maps to `None`
/// without the cell being malformed.
fn is_placeholder(column: &str, raw: &str) -> bool {
    match column {
        schema::CONTRIBUTING_FACTOR_VEHICLE_1 | schema::CONTRIBUTING_FACTOR_VEHICLE_2 => {
            raw.eq_ignore_ascii_case("unspecified")
        }
        schema::VEHICLE_TYPE_CODE_1 | schema::VEHICLE_TYPE_CODE_2 => true,
        _ => false,
    }
}
