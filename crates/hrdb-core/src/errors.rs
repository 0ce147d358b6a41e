use thiserror::Error;

/// Result type alias using HrError
pub type Result<T> = std::result::Result<T, HrError>;

/// Result type alias using the structured ExError
pub type ExResult<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling and testing. Kinds fall into three families: validation
/// (bad field values), precondition (operation called on an entity in the
/// wrong lifecycle state) and integration (storage, configuration, IO).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    BlankField,
    YearOutOfRange,
    DanglingReference,
    NullField,

    // Precondition
    MissingId,
    BorrowConflict,

    // Integration/IO
    Persistence,
    Config,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::BlankField => "ERR_BLANK_FIELD",
            ExErrorKind::YearOutOfRange => "ERR_YEAR_OUT_OF_RANGE",
            ExErrorKind::DanglingReference => "ERR_DANGLING_REFERENCE",
            ExErrorKind::NullField => "ERR_NULL_FIELD",
            ExErrorKind::MissingId => "ERR_MISSING_ID",
            ExErrorKind::BorrowConflict => "ERR_BORROW_CONFLICT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds raised by field assignment (ValidationError)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExErrorKind::BlankField
                | ExErrorKind::YearOutOfRange
                | ExErrorKind::DanglingReference
                | ExErrorKind::NullField
        )
    }

    /// True for kinds raised before any SQL is issued because the entity
    /// is in the wrong lifecycle state (PreconditionError)
    pub fn is_precondition(&self) -> bool {
        matches!(self, ExErrorKind::MissingId)
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, table, row id) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    entity_id: Option<i64>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity (table) context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add row id context
    pub fn with_entity_id(mut self, id: i64) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Shorthand for `self.kind().is_validation()`
    pub fn is_validation(&self) -> bool {
        self.kind.is_validation()
    }

    /// Shorthand for `self.kind().is_precondition()`
    pub fn is_precondition(&self) -> bool {
        self.kind.is_precondition()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(id) = self.entity_id {
            write!(f, " (entity_id: {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for hrdb entities
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HrError {
    /// A text field is empty or whitespace-only
    #[error("{entity} {field} must be a non-empty string")]
    BlankField {
        entity: &'static str,
        field: &'static str,
    },

    /// A review year is below the accepted minimum
    #[error("Year must be an integer >= {min}, got {year}")]
    YearOutOfRange { year: i64, min: i64 },

    /// A foreign key names a row that does not exist
    #[error("No {target} with id {id} exists (assigning {entity}.{field})")]
    DanglingReference {
        entity: &'static str,
        field: &'static str,
        target: &'static str,
        id: i64,
    },

    /// A stored integer column holds NULL
    #[error("{entity} {field} must not be null")]
    NullField {
        entity: &'static str,
        field: &'static str,
    },

    /// The operation requires a persisted entity
    #[error("Cannot {op} {entity} without id")]
    MissingId {
        entity: &'static str,
        op: &'static str,
    },

    /// The shared instance is already borrowed elsewhere
    #[error("{entity} instance is already borrowed")]
    BorrowConflict {
        entity: &'static str,
        id: Option<i64>,
    },
}

impl From<HrError> for ExError {
    fn from(err: HrError) -> Self {
        let message = err.to_string();
        match err {
            HrError::BlankField { entity, .. } => ExError::new(ExErrorKind::BlankField)
                .with_op("validate")
                .with_entity(entity)
                .with_message(message),

            HrError::YearOutOfRange { .. } => ExError::new(ExErrorKind::YearOutOfRange)
                .with_op("validate")
                .with_entity("review")
                .with_message(message),

            HrError::DanglingReference { entity, id, .. } => {
                ExError::new(ExErrorKind::DanglingReference)
                    .with_op("validate")
                    .with_entity(entity)
                    .with_entity_id(id)
                    .with_message(message)
            }

            HrError::NullField { entity, .. } => ExError::new(ExErrorKind::NullField)
                .with_op("validate")
                .with_entity(entity)
                .with_message(message),

            HrError::MissingId { entity, op } => ExError::new(ExErrorKind::MissingId)
                .with_op(op)
                .with_entity(entity)
                .with_message(message),

            HrError::BorrowConflict { entity, id } => {
                let ex = ExError::new(ExErrorKind::BorrowConflict)
                    .with_entity(entity)
                    .with_message(message);
                match id {
                    Some(id) => ex.with_entity_id(id),
                    None => ex,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_are_stable() {
        assert_eq!(ExErrorKind::BlankField.code(), "ERR_BLANK_FIELD");
        assert_eq!(ExErrorKind::MissingId.code(), "ERR_MISSING_ID");
        assert_eq!(ExErrorKind::Persistence.code(), "ERR_PERSISTENCE");
    }

    #[test]
    fn test_validation_and_precondition_families_are_disjoint() {
        let kinds = [
            ExErrorKind::BlankField,
            ExErrorKind::YearOutOfRange,
            ExErrorKind::DanglingReference,
            ExErrorKind::NullField,
            ExErrorKind::MissingId,
            ExErrorKind::BorrowConflict,
            ExErrorKind::Persistence,
            ExErrorKind::Config,
            ExErrorKind::Io,
            ExErrorKind::Internal,
        ];
        for kind in kinds {
            assert!(!(kind.is_validation() && kind.is_precondition()));
        }
        assert!(ExErrorKind::DanglingReference.is_validation());
        assert!(ExErrorKind::NullField.is_validation());
        assert!(ExErrorKind::MissingId.is_precondition());
        assert!(!ExErrorKind::Persistence.is_validation());
    }

    #[test]
    fn test_dangling_reference_converts_with_id() {
        let ex: ExError = HrError::DanglingReference {
            entity: "employee",
            field: "department_id",
            target: "department",
            id: 42,
        }
        .into();

        assert_eq!(ex.kind(), ExErrorKind::DanglingReference);
        assert_eq!(ex.entity(), Some("employee"));
        assert_eq!(ex.entity_id(), Some(42));
        assert!(ex.message().contains("No department with id 42"));
    }

    #[test]
    fn test_display_includes_code_op_and_message() {
        let ex: ExError = HrError::MissingId {
            entity: "review",
            op: "update",
        }
        .into();
        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_MISSING_ID]"));
        assert!(rendered.contains("in operation 'update'"));
        assert!(rendered.contains("Cannot update review without id"));
    }
}
