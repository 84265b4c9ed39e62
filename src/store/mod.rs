//! Queries against the four record kinds plus refresh tokens.
//!
//! Every function returns `sqlx::Error` untouched; handlers decide what a
//! failure means to the caller.

pub mod attendance;
pub mod holidays;
pub mod leaves;
pub mod tokens;
pub mod users;

use sqlx::error::ErrorKind;

/// Duplicate key only. MySQL shares SQLSTATE 23000 with foreign-key and
/// NOT NULL failures, so the driver's error kind decides.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(db_err.kind(), ErrorKind::UniqueViolation),
        _ => false,
    }
}

/// Stand-in for driver errors, classified by MySQL error number.
#[cfg(test)]
pub(crate) mod testing {
    use std::{borrow::Cow, error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind};

    pub const DUPLICATE_KEY: u16 = 1062;
    pub const NO_REFERENCED_ROW: u16 = 1452;
    pub const COLUMN_CANNOT_BE_NULL: u16 = 1048;

    #[derive(Debug)]
    struct MysqlFailure(u16);

    impl fmt::Display for MysqlFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "mysql error {}", self.0)
        }
    }

    impl StdError for MysqlFailure {}

    impl DatabaseError for MysqlFailure {
        fn message(&self) -> &str {
            "constraint failed"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23000"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                DUPLICATE_KEY => ErrorKind::UniqueViolation,
                NO_REFERENCED_ROW => ErrorKind::ForeignKeyViolation,
                COLUMN_CANNOT_BE_NULL => ErrorKind::NotNullViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    pub fn db_error(number: u16) -> sqlx::Error {
        sqlx::Error::Database(Box::new(MysqlFailure(number)))
    }
}
