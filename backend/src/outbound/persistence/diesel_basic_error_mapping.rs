//! Shared Diesel error mapping for the inventory repositories.
//!
//! Both repositories expose `Connection` and `Query` variants, so the mapping
//! takes one constructor per variant instead of naming the error type.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool error with the repository's connection constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map a Diesel error to a query or connection error.
///
/// The driver message is logged at debug level and forwarded; callers turn
/// it into a generic client message before it leaves the domain.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        other => query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::PartsRepositoryError;
    use rstest::rstest;

    fn map(error: diesel::result::Error) -> PartsRepositoryError {
        map_basic_diesel_error(
            error,
            PartsRepositoryError::query,
            PartsRepositoryError::connection,
        )
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert!(matches!(
            map(diesel::result::Error::NotFound),
            PartsRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn closed_connection_is_a_connection_error() {
        let error = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );

        assert_eq!(
            map(error),
            PartsRepositoryError::connection("server closed the connection")
        );
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped: PartsRepositoryError = map_basic_pool_error(
            PoolError::checkout("timed out"),
            PartsRepositoryError::connection,
        );

        assert_eq!(mapped, PartsRepositoryError::connection("timed out"));
    }
}
