use serde::{Deserialize, Serialize};
use std::fmt;

use super::sealed::AssignId;
use super::{DisplayId, Entity};
use crate::errors::{ExResult, Result};
use crate::lookup::ExistsById;
use crate::rules::validation::{existing_reference, non_blank, not_null, review_year};

/// Review - a yearly performance summary for one employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    id: Option<i64>,
    year: i64,
    summary: String,
    employee_id: i64,
}

/// Raw `reviews` row, in column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub id: i64,
    pub year: Option<i64>,
    pub summary: Option<String>,
    pub employee_id: Option<i64>,
}

impl Review {
    /// Create a transient Review
    ///
    /// # Errors
    /// * `YearOutOfRange` - If year is before 2000
    /// * `BlankField` - If summary is empty or whitespace-only
    /// * `DanglingReference` - If the employee does not exist
    pub fn new(
        year: i64,
        summary: &str,
        employee_id: i64,
        employees: &dyn ExistsById,
    ) -> ExResult<Self> {
        Ok(Self {
            id: None,
            year: review_year(year)?,
            summary: non_blank(Self::KIND, "summary", summary)?,
            employee_id: existing_reference(
                Self::KIND,
                "employee_id",
                "employee",
                employee_id,
                employees,
            )?,
        })
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    /// # Errors
    /// * `YearOutOfRange` - If the year is before 2000
    pub fn set_year(&mut self, value: i64) -> ExResult<()> {
        self.year = review_year(value)?;
        Ok(())
    }

    /// # Errors
    /// * `BlankField` - If the value is empty or whitespace-only
    pub fn set_summary(&mut self, value: &str) -> ExResult<()> {
        self.summary = non_blank(Self::KIND, "summary", value)?;
        Ok(())
    }

    /// # Errors
    /// * `DanglingReference` - If the employee does not exist
    /// * Any storage error raised by the lookup
    pub fn set_employee_id(&mut self, value: i64, employees: &dyn ExistsById) -> ExResult<()> {
        self.employee_id =
            existing_reference(Self::KIND, "employee_id", "employee", value, employees)?;
        Ok(())
    }
}

impl Entity for Review {
    type Row = ReviewRow;

    const KIND: &'static str = "review";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn row_id(row: &ReviewRow) -> i64 {
        row.id
    }

    fn from_row(row: ReviewRow) -> Result<Self> {
        Ok(Self {
            id: Some(row.id),
            year: review_year(not_null(Self::KIND, "year", row.year)?)?,
            summary: non_blank(Self::KIND, "summary", row.summary.as_deref().unwrap_or_default())?,
            employee_id: not_null(Self::KIND, "employee_id", row.employee_id)?,
        })
    }

    fn refresh_from_row(&mut self, row: ReviewRow) -> Result<()> {
        *self = Self::from_row(row)?;
        Ok(())
    }
}

impl AssignId for Review {
    fn assign_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Review id={} year={} summary={} employee_id={}>",
            DisplayId(self.id),
            self.year,
            self.summary,
            self.employee_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExError, ExErrorKind};

    fn employees(id: i64) -> ExResult<bool> {
        Ok(id == 1)
    }

    #[test]
    fn test_year_before_2000_is_rejected() {
        let err = Review::new(1999, "Okay", 1, &employees).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::YearOutOfRange);
        assert!(err.is_validation());
    }

    #[test]
    fn test_valid_review() {
        let review = Review::new(2023, " Solid year ", 1, &employees).unwrap();
        assert_eq!(review.year(), 2023);
        assert_eq!(review.summary(), "Solid year");
        assert_eq!(review.employee_id(), 1);
        assert_eq!(
            review.to_string(),
            "<Review id=None year=2023 summary=Solid year employee_id=1>"
        );
    }

    #[test]
    fn test_set_employee_id_checks_existence() {
        let mut review = Review::new(2023, "Solid year", 1, &employees).unwrap();
        let err = review.set_employee_id(2, &employees).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DanglingReference);
        assert_eq!(review.employee_id(), 1);
    }

    #[test]
    fn test_from_row_rejects_stale_year() {
        let result = Review::from_row(ReviewRow {
            id: 1,
            year: Some(1980),
            summary: Some("Vintage".to_string()),
            employee_id: Some(1),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_row_rejects_null_year() {
        let err = Review::from_row(ReviewRow {
            id: 1,
            year: None,
            summary: Some("Vintage".to_string()),
            employee_id: Some(1),
        })
        .unwrap_err();
        let err: ExError = err.into();
        assert_eq!(err.kind(), ExErrorKind::NullField);
        assert!(err.is_validation());
    }
}
