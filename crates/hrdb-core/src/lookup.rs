//! Existence lookups injected into entity constructors and setters
//!
//! Entities never resolve their collaborators themselves. A foreign-key
//! setter receives an [`ExistsById`] capability for the referenced table and
//! asks it whether the id exists.

use crate::errors::ExResult;

/// Capability answering whether a row with the given primary key exists
pub trait ExistsById {
    /// # Errors
    ///
    /// Returns whatever the backing store reports; storage failures are
    /// passed through unchanged.
    fn exists_by_id(&self, id: i64) -> ExResult<bool>;
}

impl<F> ExistsById for F
where
    F: Fn(i64) -> ExResult<bool>,
{
    fn exists_by_id(&self, id: i64) -> ExResult<bool> {
        self(id)
    }
}
