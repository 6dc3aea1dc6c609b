#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The integrated collision dataset.
//!
//! A [`Dataset`] is loaded once from CSV and never mutated afterwards.
//! Queries run against a borrowed [`DatasetView`], which produces
//! [`FilteredRows`] referencing the dataset's records.

pub mod cells;
pub mod loader;
pub mod progress;
pub mod schema;
pub mod vehicle_codes;
pub mod view;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crash_report_crash_models::CrashRecord;
use thiserror::Error;

use crate::progress::ProgressCallback;

pub use view::{DatasetView, FilteredRows};

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks required columns.
    #[error("Dataset is missing required columns: {}", .missing.join(", "))]
    SchemaMismatch {
        /// Required columns absent from the header.
        missing: Vec<String>,
    },

    /// A required cell could not be parsed.
    #[error("Line {row}: invalid {column} value '{value}'")]
    InvalidValue {
        /// 1-based line number in the CSV.
        row: u64,
        /// Column name.
        column: &'static str,
        /// Raw cell contents.
        value: String,
    },
}

/// All records of the integrated dataset, owned and immutable.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CrashRecord>,
}

impl Dataset {
    /// Loads a dataset from a CSV file (`.gz` files are decompressed).
    ///
    /// # Errors
    ///
    /// * [`DatasetError::Io`] if the file cannot be read
    /// * [`DatasetError::SchemaMismatch`] if required columns are missing
    /// * [`DatasetError::InvalidValue`] if a required cell is malformed
    pub fn load(path: &Path, progress: &Arc<dyn ProgressCallback>) -> Result<Self, DatasetError> {
        log::info!("Loading dataset from {}", path.display());
        progress.set_message(format!("Loading {}", path.display()));

        let dataset = Self::from_reader(loader::open(path)?, progress)?;

        progress.finish(format!("Loaded {} records", dataset.len()));
        log::info!("Loaded {} records from {}", dataset.len(), path.display());

        Ok(dataset)
    }

    /// Loads a dataset from uncompressed CSV data.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::SchemaMismatch`] if required columns are missing
    /// * [`DatasetError::InvalidValue`] if a required cell is malformed
    /// * [`DatasetError::Csv`] if the data is not valid CSV
    pub fn from_reader<R: Read>(
        reader: R,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Self, DatasetError> {
        Ok(Self {
            records: loader::read_records(reader, progress)?,
        })
    }

    /// Wraps records that were built in memory.
    #[must_use]
    pub const fn from_records(records: Vec<CrashRecord>) -> Self {
        Self { records }
    }

    /// All records, in file order.
    #[must_use]
    pub fn records(&self) -> &[CrashRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a read-only view for querying.
    #[must_use]
    pub fn view(&self) -> DatasetView<'_> {
        DatasetView::from(self)
    }
}
