//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use slotbook_domain::SlotbookError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SlotbookError);

impl From<InfraError> for SlotbookError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SlotbookError> for InfraError {
    fn from(value: SlotbookError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSlotbookError {
    fn into_slotbook(self) -> SlotbookError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SlotbookError */
/* -------------------------------------------------------------------------- */

impl IntoSlotbookError for SqlError {
    fn into_slotbook(self) -> SlotbookError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => SlotbookError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        SlotbookError::Database("database is locked".into())
                    }
                    // Unique index collisions mean the slot was taken by a
                    // concurrent booking, which is a conflict to the caller.
                    ErrorCode::ConstraintViolation if err.extended_code == 2067 => {
                        SlotbookError::Conflict("slot is already booked".into())
                    }
                    ErrorCode::ConstraintViolation => SlotbookError::Database(format!(
                        "constraint violation (code {}): {message}",
                        err.extended_code
                    )),
                    _ => SlotbookError::Database(format!(
                        "sqlite failure {:?} (code {}): {message}",
                        err.code, err.extended_code
                    )),
                }
            }
            RE::QueryReturnedNoRows => SlotbookError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                SlotbookError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                SlotbookError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => SlotbookError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                SlotbookError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => {
                SlotbookError::Database(format!("invalid database path: {}", path.to_string_lossy()))
            }
            RE::InvalidQuery => SlotbookError::Database("invalid SQL query".into()),
            other => SlotbookError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_slotbook())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → SlotbookError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(SlotbookError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SlotbookError */
/* -------------------------------------------------------------------------- */

impl IntoSlotbookError for HttpError {
    fn into_slotbook(self) -> SlotbookError {
        if self.is_timeout() {
            return SlotbookError::Network("http request timed out".into());
        }
        if self.is_connect() {
            return SlotbookError::Network(format!("connection failed: {self}"));
        }
        if self.is_decode() {
            return SlotbookError::Provider(format!("failed to decode response body: {self}"));
        }
        if self.is_builder() || self.is_request() {
            return SlotbookError::Internal(format!("failed to build http request: {self}"));
        }
        SlotbookError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_slotbook())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_constraint_maps_to_conflict() {
        let err = SqlError::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::ConstraintViolation,
                extended_code: 2067,
            },
            Some("UNIQUE constraint failed: bookings.tenant_id".into()),
        );
        assert!(matches!(
            InfraError::from(err).0,
            SlotbookError::Conflict(_)
        ));
    }

    #[test]
    fn other_constraints_stay_database_errors() {
        let err = SqlError::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::ConstraintViolation,
                extended_code: 787,
            },
            Some("FOREIGN KEY constraint failed".into()),
        );
        assert!(matches!(
            InfraError::from(err).0,
            SlotbookError::Database(_)
        ));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert!(matches!(
            InfraError::from(SqlError::QueryReturnedNoRows).0,
            SlotbookError::NotFound(_)
        ));
    }
}
