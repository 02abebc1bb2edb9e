//! Database connection management

use std::time::Duration;

use sqlx::{
    Error, PgPool, Postgres, Row, Transaction,
    error::{DatabaseError, ErrorKind},
    migrate::MigrateError,
    postgres::{PgPoolOptions, PgRow},
    query,
};

/// SQL used to bound every statement issued inside a transaction.
pub const SET_STATEMENT_TIMEOUT_SQL: &str = "SELECT set_config('statement_timeout', $1, true)";

/// Pool sizing and timeout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseOptions {
    /// Maximum number of pooled connections.
    pub max_connections: u32,

    /// How long to wait for a free connection before giving up.
    pub acquire_timeout: Duration,

    /// Per-statement execution limit applied to every transaction.
    pub statement_timeout: Duration,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(3),
            statement_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
    statement_timeout: Duration,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction with the configured statement timeout applied.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting the timeout fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_STATEMENT_TIMEOUT_SQL)
            .bind(format!("{}ms", self.statement_timeout.as_millis()))
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    /// Close every pooled connection, waiting for checked-out ones to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, options: DatabaseOptions) -> Result<PgPool, Error> {
    PgPoolOptions::new()
        .max_connections(options.max_connections)
        .acquire_timeout(options.acquire_timeout)
        .connect(database_url)
        .await
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error if any migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Read a non-negative `BIGINT` money column.
pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Read a non-negative `INTEGER` count column.
pub(crate) fn try_get_count(row: &PgRow, col: &str) -> Result<u32, Error> {
    let count_i32: i32 = row.try_get(col)?;

    u32::try_from(count_i32).map_err(|e| Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Convert a money amount into its `BIGINT` bind value.
pub(crate) fn amount_to_db(amount: u64, col: &str) -> Result<i64, Error> {
    i64::try_from(amount).map_err(|e| Error::Encode(format!("{col}: {e}").into()))
}

/// Convert a count into its `INTEGER` bind value.
pub(crate) fn count_to_db(count: u32, col: &str) -> Result<i32, Error> {
    i32::try_from(count).map_err(|e| Error::Encode(format!("{col}: {e}").into()))
}

/// Storage failure classes shared by the service error types.
#[derive(Debug)]
pub enum StorageFailure {
    RowNotFound,
    UniqueViolation,
    ForeignKeyViolation,
    NotNullViolation,
    CheckViolation,
    Timeout(Error),
    Unavailable(Error),
    Other(Error),
}

impl StorageFailure {
    #[must_use]
    pub fn classify(error: Error) -> Self {
        match error {
            Error::RowNotFound => return Self::RowNotFound,
            Error::PoolTimedOut => return Self::Timeout(error),
            Error::Io(_) | Error::Tls(_) | Error::PoolClosed | Error::WorkerCrashed => {
                return Self::Unavailable(error);
            }
            _ => {}
        }

        let code = error
            .as_database_error()
            .and_then(DatabaseError::code)
            .map(|code| code.into_owned());

        if let Some(code) = code.as_deref() {
            if is_timeout_code(code) {
                return Self::Timeout(error);
            }

            if is_unavailable_code(code) {
                return Self::Unavailable(error);
            }
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::UniqueViolation,
            Some(ErrorKind::ForeignKeyViolation) => Self::ForeignKeyViolation,
            Some(ErrorKind::NotNullViolation) => Self::NotNullViolation,
            Some(ErrorKind::CheckViolation) => Self::CheckViolation,
            _ => Self::Other(error),
        }
    }
}

/// `query_canceled` (statement timeout) and `lock_not_available`.
fn is_timeout_code(code: &str) -> bool {
    matches!(code, "57014" | "55P03")
}

/// Connection exceptions and server shutdown codes.
fn is_unavailable_code(code: &str) -> bool {
    code.starts_with("08") || matches!(code, "57P01" | "57P02" | "57P03")
}
