use serde::{Deserialize, Serialize};
use std::fmt;

use super::sealed::AssignId;
use super::{DisplayId, Entity};
use crate::errors::{ExResult, Result};
use crate::rules::validation::non_blank;

/// Department - the target of `Employee.department_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    id: Option<i64>,
    name: String,
    location: String,
}

/// Raw `departments` row, in column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRow {
    pub id: i64,
    pub name: Option<String>,
    pub location: Option<String>,
}

impl Department {
    /// Create a transient Department
    ///
    /// # Errors
    /// * `BlankField` - If name or location is empty or whitespace-only
    pub fn new(name: &str, location: &str) -> ExResult<Self> {
        Ok(Self {
            id: None,
            name: non_blank(Self::KIND, "name", name)?,
            location: non_blank(Self::KIND, "location", location)?,
        })
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// # Errors
    /// * `BlankField` - If the value is empty or whitespace-only
    pub fn set_name(&mut self, value: &str) -> ExResult<()> {
        self.name = non_blank(Self::KIND, "name", value)?;
        Ok(())
    }

    /// # Errors
    /// * `BlankField` - If the value is empty or whitespace-only
    pub fn set_location(&mut self, value: &str) -> ExResult<()> {
        self.location = non_blank(Self::KIND, "location", value)?;
        Ok(())
    }
}

impl Entity for Department {
    type Row = DepartmentRow;

    const KIND: &'static str = "department";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn row_id(row: &DepartmentRow) -> i64 {
        row.id
    }

    fn from_row(row: DepartmentRow) -> Result<Self> {
        Ok(Self {
            id: Some(row.id),
            name: non_blank(Self::KIND, "name", row.name.as_deref().unwrap_or_default())?,
            location: non_blank(
                Self::KIND,
                "location",
                row.location.as_deref().unwrap_or_default(),
            )?,
        })
    }

    fn refresh_from_row(&mut self, row: DepartmentRow) -> Result<()> {
        *self = Self::from_row(row)?;
        Ok(())
    }
}

impl AssignId for Department {
    fn assign_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Department id={} name={} location={}>",
            DisplayId(self.id),
            self.name,
            self.location
        )
    }
}
