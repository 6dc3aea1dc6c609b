#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns free-text queries and explicit selections into a [`FilterSpec`].
//!
//! [`parse`] extracts whatever constraints it can recognize from a query
//! and never fails. [`resolve`] merges those with explicit selections
//! (explicit wins) and validates the result.
//!
//! [`FilterSpec`]: crash_report_filter_models::FilterSpec

pub mod dropdown;
pub mod normalize;
pub mod parser;
pub mod resolver;

use crash_report_filter_models::FilterField;
use thiserror::Error;

pub use dropdown::DropdownSelections;
pub use parser::{ParsedQuery, parse, parse_with_lexicon, parse_with_trace};
pub use resolver::resolve;

/// Errors raised while resolving explicit filter selections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// An explicit value is outside its field's domain.
    #[error("Invalid {field} '{value}': {reason}")]
    Validation {
        /// Field that failed validation.
        field: FilterField,
        /// The rejected value, as given.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl FilterError {
    pub(crate) fn validation(
        field: FilterField,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
