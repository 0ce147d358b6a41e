//! Field validation rules shared by entity setters and row hydration

use crate::errors::{ExResult, HrError, Result};
use crate::lookup::ExistsById;

/// Reviews older than this year are rejected
pub const MIN_REVIEW_YEAR: i64 = 2000;

/// Validate a text field and return its trimmed form
///
/// # Errors
/// * `BlankField` - If the value is empty or whitespace-only
pub fn non_blank(entity: &'static str, field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::BlankField { entity, field });
    }
    Ok(trimmed.to_string())
}

/// Validate a review year
///
/// # Errors
/// * `YearOutOfRange` - If the year is below [`MIN_REVIEW_YEAR`]
pub fn review_year(year: i64) -> Result<i64> {
    if year < MIN_REVIEW_YEAR {
        return Err(HrError::YearOutOfRange {
            year,
            min: MIN_REVIEW_YEAR,
        });
    }
    Ok(year)
}

/// Unwrap a stored integer column
///
/// # Errors
/// * `NullField` - If the column held NULL
pub fn not_null(entity: &'static str, field: &'static str, value: Option<i64>) -> Result<i64> {
    value.ok_or(HrError::NullField { entity, field })
}

/// Validate that a foreign key points at an existing row
///
/// # Errors
/// * `DanglingReference` - If the lookup reports no such row
/// * Any error raised by the lookup itself, unchanged
pub fn existing_reference(
    entity: &'static str,
    field: &'static str,
    target: &'static str,
    id: i64,
    lookup: &dyn ExistsById,
) -> ExResult<i64> {
    if !lookup.exists_by_id(id)? {
        return Err(HrError::DanglingReference {
            entity,
            field,
            target,
            id,
        }
        .into());
    }
    Ok(id)
}
