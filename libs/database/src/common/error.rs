use sea_orm::{DbErr, SqlxError};
use std::error::Error as StdError;
use std::sync::Arc;

/// Database failures, classified by what the caller can do about them.
///
/// Conversion from [`DbErr`] inspects the PostgreSQL SQLSTATE when the driver
/// provides one, so every repository reports constraint breaches the same way.
/// The most specific class always wins: a unique violation is never reported
/// as a generic integrity error.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// SQLSTATE 23505
    #[error("Unique constraint violated: {message}")]
    UniqueViolation {
        constraint: Option<String>,
        message: String,
    },

    /// SQLSTATE 23502
    #[error("Not-null constraint violated: {message}")]
    NotNullViolation {
        column: Option<String>,
        message: String,
    },

    /// Any other class 23 (integrity constraint) failure
    #[error("Integrity constraint violated: {0}")]
    IntegrityViolation(String),

    /// Class 22 (data exception) and value encode/decode failures
    #[error("Invalid data: {0}")]
    DataFormat(String),

    /// Connection, pool and server-availability failures
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Anything the classifier does not recognise
    #[error("PostgreSQL error: {0}")]
    Other(#[source] DbErr),
}

impl DatabaseError {
    /// Whether retrying the same operation later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<DbErr> for DatabaseError {
    fn from(err: DbErr) -> Self {
        classify_db_err(&err).unwrap_or(DatabaseError::Other(err))
    }
}

fn classify_db_err(err: &DbErr) -> Option<DatabaseError> {
    if let DbErr::ConnectionAcquire(_) | DbErr::Conn(_) = err {
        return Some(DatabaseError::Unavailable(err.to_string()));
    }

    match find_sqlx_error(err)? {
        SqlxError::Database(db) => {
            let code = db.code()?;
            classify_sqlstate(&code, db.constraint(), db.message())
        }
        SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed
        | SqlxError::Io(_)
        | SqlxError::Tls(_) => Some(DatabaseError::Unavailable(err.to_string())),
        SqlxError::Decode(_) | SqlxError::ColumnDecode { .. } => {
            Some(DatabaseError::DataFormat(err.to_string()))
        }
        _ => None,
    }
}

/// Walks the source chain of a SeaORM error looking for the driver error.
fn find_sqlx_error(err: &DbErr) -> Option<&SqlxError> {
    let mut source = err.source();
    while let Some(current) = source {
        if let Some(sqlx) = current.downcast_ref::<SqlxError>() {
            return Some(sqlx);
        }
        if let Some(sqlx) = current.downcast_ref::<Arc<SqlxError>>() {
            return Some(sqlx.as_ref());
        }
        source = current.source();
    }
    None
}

/// Maps a PostgreSQL SQLSTATE to a classified error.
///
/// Returns `None` for codes outside the classes the service distinguishes.
pub fn classify_sqlstate(
    code: &str,
    constraint: Option<&str>,
    message: &str,
) -> Option<DatabaseError> {
    let classified = match code {
        "23505" => DatabaseError::UniqueViolation {
            constraint: constraint.map(str::to_owned),
            message: message.to_owned(),
        },
        "23502" => DatabaseError::NotNullViolation {
            column: column_from_message(message),
            message: message.to_owned(),
        },
        c if c.starts_with("23") => DatabaseError::IntegrityViolation(message.to_owned()),
        c if c.starts_with("22") => DatabaseError::DataFormat(message.to_owned()),
        c if c.starts_with("08") || c.starts_with("53") || c.starts_with("57P") => {
            DatabaseError::Unavailable(message.to_owned())
        }
        _ => return None,
    };
    Some(classified)
}

/// Extracts `name` from `null value in column "name" of relation ...`.
fn column_from_message(message: &str) -> Option<String> {
    let start = message.find("column \"")? + "column \"".len();
    let len = message[start..].find('"')?;
    Some(message[start..start + len].to_owned())
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_unique_violation_keeps_constraint_name() {
        let err = classify_sqlstate(
            "23505",
            Some("products_sku_key"),
            "duplicate key value violates unique constraint \"products_sku_key\"",
        );

        match err {
            Some(DatabaseError::UniqueViolation { constraint, .. }) => {
                assert_eq!(constraint.as_deref(), Some("products_sku_key"));
            }
            other => panic!("expected UniqueViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_not_null_violation_extracts_column() {
        let err = classify_sqlstate(
            "23502",
            None,
            "null value in column \"price\" of relation \"products\" violates not-null constraint",
        );

        match err {
            Some(DatabaseError::NotNullViolation { column, .. }) => {
                assert_eq!(column.as_deref(), Some("price"));
            }
            other => panic!("expected NotNullViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_other_integrity_codes_fall_back_to_generic_integrity() {
        // 23514 check_violation, 23503 foreign_key_violation
        for code in ["23514", "23503", "23000"] {
            assert!(matches!(
                classify_sqlstate(code, None, "violation"),
                Some(DatabaseError::IntegrityViolation(_))
            ));
        }
    }

    #[test]
    fn test_data_exceptions_are_data_format() {
        // 22003 numeric_value_out_of_range, 22P02 invalid_text_representation
        for code in ["22003", "22P02", "22001"] {
            assert!(matches!(
                classify_sqlstate(code, None, "bad value"),
                Some(DatabaseError::DataFormat(_))
            ));
        }
    }

    #[test]
    fn test_availability_codes() {
        for code in ["08006", "53300", "57P01"] {
            let err = classify_sqlstate(code, None, "gone").unwrap();
            assert!(err.is_transient());
        }
    }

    #[test]
    fn test_unknown_sqlstate_is_unclassified() {
        assert!(classify_sqlstate("42P01", None, "relation does not exist").is_none());
    }

    #[test]
    fn test_connection_errors_are_unavailable() {
        let err: DatabaseError = DbErr::Conn(RuntimeErr::Internal("refused".into())).into();
        assert!(matches!(err, DatabaseError::Unavailable(_)));
    }

    #[test]
    fn test_unrecognised_errors_are_kept_whole() {
        let err: DatabaseError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, DatabaseError::Other(DbErr::Custom(_))));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_column_from_message() {
        assert_eq!(
            column_from_message("null value in column \"sku\" violates not-null constraint"),
            Some("sku".to_string())
        );
        assert_eq!(column_from_message("no column here"), None);
    }
}
