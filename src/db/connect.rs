//! Pool lifecycle and connection error classification.

use crate::config::DatabaseConfig;
use crate::error::DatabaseError;
use crate::{Error, Result};
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use sqlx::mysql::MySqlDatabaseError;

use super::Database;

/// MySQL server error: access denied for user
const ER_ACCESS_DENIED_ERROR: u16 = 1045;
/// MySQL server error: unknown database
const ER_BAD_DB_ERROR: u16 = 1049;

impl Database {
    /// Connect to any sqlx-supported URL (`mysql://...`, `sqlite://...`)
    pub async fn connect(url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| Error::Database(DatabaseError::ConnectionFailed(e.to_string())))?;

        Ok(Self { pool })
    }

    /// Connect to the configured MySQL server as `config.user`.
    ///
    /// A wrong password and an unknown database are reported as
    /// [`DatabaseError::AccessDenied`] and [`DatabaseError::UnknownDatabase`].
    pub async fn connect_mysql(
        config: &DatabaseConfig,
        password: &str,
        database: &str,
    ) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let url = config.mysql_url(password, database);
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .map_err(|e| Error::Database(classify_connect_error(&e, &config.user, database)))?;

        tracing::debug!(host = %config.host, port = config.port, database, "Connected to datastore");
        Ok(Self { pool })
    }

    /// Close the pool
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

/// Map a connect failure to the operator-facing error
pub(super) fn classify_connect_error(
    err: &sqlx::Error,
    user: &str,
    database: &str,
) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = err {
        let mysql_number = db_err
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(|e| e.number());
        match mysql_number {
            Some(ER_ACCESS_DENIED_ERROR) => {
                return DatabaseError::AccessDenied {
                    user: user.to_string(),
                };
            }
            Some(ER_BAD_DB_ERROR) => {
                return DatabaseError::UnknownDatabase {
                    database: database.to_string(),
                };
            }
            _ => {}
        }
        if db_err.code().as_deref() == Some("28000") {
            return DatabaseError::AccessDenied {
                user: user.to_string(),
            };
        }
    }
    DatabaseError::ConnectionFailed(error_chain(err))
}

/// `err` followed by each of its sources, separated by `: `
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
