use serde::{Deserialize, Serialize};
use std::fmt;

use super::sealed::AssignId;
use super::{DisplayId, Entity};
use crate::errors::{ExResult, Result};
use crate::lookup::ExistsById;
use crate::rules::validation::{existing_reference, non_blank, not_null};

/// Employee - a person belonging to one department
///
/// Fields are private: every assignment goes through a validating setter,
/// so an `Employee` value never holds a blank name or job title. The
/// department reference is checked against an injected [`ExistsById`]
/// lookup at the moment it is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    id: Option<i64>,
    name: String,
    job_title: String,
    department_id: i64,
}

/// Raw `employees` row, in column order
///
/// Every column but the primary key is nullable in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub id: i64,
    pub name: Option<String>,
    pub job_title: Option<String>,
    pub department_id: Option<i64>,
}

impl Employee {
    /// Create a transient Employee
    ///
    /// # Arguments
    /// * `name` - Stored trimmed; must not be blank
    /// * `job_title` - Stored trimmed; must not be blank
    /// * `department_id` - Must exist according to `departments`
    /// * `departments` - Existence lookup for the departments table
    ///
    /// # Errors
    /// * `BlankField` - If name or job_title is empty or whitespace-only
    /// * `DanglingReference` - If the department does not exist
    pub fn new(
        name: &str,
        job_title: &str,
        department_id: i64,
        departments: &dyn ExistsById,
    ) -> ExResult<Self> {
        Ok(Self {
            id: None,
            name: non_blank(Self::KIND, "name", name)?,
            job_title: non_blank(Self::KIND, "job_title", job_title)?,
            department_id: existing_reference(
                Self::KIND,
                "department_id",
                "department",
                department_id,
                departments,
            )?,
        })
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn department_id(&self) -> i64 {
        self.department_id
    }

    /// # Errors
    /// * `BlankField` - If the value is empty or whitespace-only
    pub fn set_name(&mut self, value: &str) -> ExResult<()> {
        self.name = non_blank(Self::KIND, "name", value)?;
        Ok(())
    }

    /// # Errors
    /// * `BlankField` - If the value is empty or whitespace-only
    pub fn set_job_title(&mut self, value: &str) -> ExResult<()> {
        self.job_title = non_blank(Self::KIND, "job_title", value)?;
        Ok(())
    }

    /// # Errors
    /// * `DanglingReference` - If the department does not exist
    /// * Any storage error raised by the lookup
    pub fn set_department_id(&mut self, value: i64, departments: &dyn ExistsById) -> ExResult<()> {
        self.department_id =
            existing_reference(Self::KIND, "department_id", "department", value, departments)?;
        Ok(())
    }
}

impl Entity for Employee {
    type Row = EmployeeRow;

    const KIND: &'static str = "employee";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn row_id(row: &EmployeeRow) -> i64 {
        row.id
    }

    fn from_row(row: EmployeeRow) -> Result<Self> {
        Ok(Self {
            id: Some(row.id),
            name: non_blank(Self::KIND, "name", row.name.as_deref().unwrap_or_default())?,
            job_title: non_blank(
                Self::KIND,
                "job_title",
                row.job_title.as_deref().unwrap_or_default(),
            )?,
            department_id: not_null(Self::KIND, "department_id", row.department_id)?,
        })
    }

    fn refresh_from_row(&mut self, row: EmployeeRow) -> Result<()> {
        *self = Self::from_row(row)?;
        Ok(())
    }
}

impl AssignId for Employee {
    fn assign_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Employee id={} name={} job_title={} department_id={}>",
            DisplayId(self.id),
            self.name,
            self.job_title,
            self.department_id
        )
    }
}
