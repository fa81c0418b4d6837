//! Shared classification of pool and Diesel failures.
//!
//! Every repository maps the same three database outcomes — connection
//! trouble, query trouble, unique-constraint violation — into its own port
//! error type. The classification lives here once; the per-repository
//! mapping stays a small match on [`DbFailure`].

use tracing::debug;

use super::pool::PoolError;

/// Database failure, classified for port error mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// Connection could not be established or was lost.
    Connection(String),
    /// Query or mutation failed.
    Query(String),
    /// A unique constraint was violated; carries the constraint name when
    /// the driver reports one.
    Unique {
        /// Constraint name, e.g. `users_email_key`.
        constraint: Option<String>,
    },
}

impl DbFailure {
    /// True when the violated constraint name contains `needle`.
    pub(crate) fn unique_on(&self, needle: &str) -> bool {
        match self {
            Self::Unique {
                constraint: Some(name),
            } => name.contains(needle),
            Self::Unique { constraint: None } | Self::Connection(_) | Self::Query(_) => false,
        }
    }
}

/// Classify a pool checkout failure.
pub(crate) fn classify_pool_error(error: PoolError) -> DbFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DbFailure::Connection(message)
        }
    }
}

/// Classify a Diesel execution failure.
///
/// Driver detail is logged at debug level; the classified failure carries
/// only stable, client-safe text.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> DbFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(
            error_type = %std::any::type_name_of_val(other),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => DbFailure::Unique {
            constraint: info.constraint_name().map(ToOwned::to_owned),
        },
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        _ => DbFailure::Query("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_classify_as_connection_trouble() {
        let failure = classify_pool_error(PoolError::checkout("timed out"));
        assert_eq!(failure, DbFailure::Connection("timed out".to_owned()));
    }

    #[test]
    fn unique_on_matches_constraint_substrings() {
        let failure = DbFailure::Unique {
            constraint: Some("users_email_key".to_owned()),
        };
        assert!(failure.unique_on("email"));
        assert!(!failure.unique_on("phone"));
    }

    #[test]
    fn unique_without_a_constraint_name_matches_nothing() {
        let failure = DbFailure::Unique { constraint: None };
        assert!(!failure.unique_on("email"));
    }

    #[test]
    fn not_found_classifies_as_query_trouble() {
        let failure = classify_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(failure, DbFailure::Query(_)));
    }
}
