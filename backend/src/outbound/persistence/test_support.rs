//! Shared helpers for persistence-layer unit tests.

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

struct StubErrorInformation {
    message: String,
    constraint: Option<String>,
}

impl DatabaseErrorInformation for StubErrorInformation {
    fn message(&self) -> &str {
        self.message.as_str()
    }

    fn details(&self) -> Option<&str> {
        None
    }

    fn hint(&self) -> Option<&str> {
        None
    }

    fn table_name(&self) -> Option<&str> {
        None
    }

    fn column_name(&self) -> Option<&str> {
        None
    }

    fn constraint_name(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    fn statement_position(&self) -> Option<i32> {
        None
    }
}

/// Build a Diesel database error of the given kind, carrying a constraint
/// name when one is relevant to the mapping under test.
pub(crate) fn database_error(kind: DatabaseErrorKind, constraint: &str) -> DieselError {
    let constraint = (!constraint.is_empty()).then(|| constraint.to_owned());
    DieselError::DatabaseError(
        kind,
        Box::new(StubErrorInformation {
            message: "stubbed database error".to_owned(),
            constraint,
        }),
    )
}
