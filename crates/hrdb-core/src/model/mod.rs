pub mod department;
pub mod employee;
pub mod review;

pub use department::{Department, DepartmentRow};
pub use employee::{Employee, EmployeeRow};
pub use review::{Review, ReviewRow};

use crate::errors::Result;
use std::fmt;

pub(crate) mod sealed {
    /// Primary-key slot, writable only from inside this crate
    ///
    /// The identity map assigns ids on insert, clears them on delete and
    /// restores them on unit-of-work rollback. Nothing outside the crate can
    /// name this trait, so nothing outside can give an instance an id.
    pub trait AssignId {
        fn assign_id(&mut self, id: Option<i64>);
    }
}

/// A persistable entity tracked by the identity map
///
/// `Row` is the raw column tuple read back from storage. Hydration turns a
/// row into a new instance (`from_row`) or overwrites a cached instance in
/// place (`refresh_from_row`). Nullable columns arrive as `Option` and are
/// rejected by validation.
///
/// Only the identity map can give an instance an id:
///
/// ```compile_fail
/// use hrdb_core::{Department, Entity};
///
/// let mut dept = Department::new("Payroll", "HQ").unwrap();
/// dept.assign_id(Some(1));
/// ```
pub trait Entity: sealed::AssignId + Clone + fmt::Debug {
    type Row;

    /// Singular entity name used in errors and log fields
    const KIND: &'static str;

    /// Primary key, `None` while transient
    fn id(&self) -> Option<i64>;

    /// Primary key of a raw row
    fn row_id(row: &Self::Row) -> i64;

    /// Build a persisted instance from a raw row
    ///
    /// # Errors
    /// Returns a validation error when the stored values break a field rule.
    fn from_row(row: Self::Row) -> Result<Self>;

    /// Overwrite this instance's fields with a raw row
    ///
    /// Fields are only written once the whole row has validated.
    ///
    /// # Errors
    /// Returns a validation error when the stored values break a field rule.
    fn refresh_from_row(&mut self, row: Self::Row) -> Result<()>;
}

/// Renders an optional id the way entity reprs show it
pub(crate) struct DisplayId(pub Option<i64>);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{}", id),
            None => f.write_str("None"),
        }
    }
}
