use log::{debug, info};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

use super::{Database, Value};
use crate::domain::DatabaseError;
use crate::pipeline::PreparedStatement;

/// SQLite-backed [`Database`]
///
/// Prepared statements live in the connection's statement cache, keyed by
/// their SQL text, until a `close_after` execution discards them.
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Open (or create) the database file at `path`
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened as an SQLite database
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|source| DatabaseError::Open { path: path.display().to_string(), source })?;
        info!("Opened database {}", path.display());
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|source| DatabaseError::Open { path: ":memory:".to_string(), source })?;
        Ok(Self { conn })
    }

    /// Read access to the underlying connection
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Database for SqliteDatabase {
    fn execute(&mut self, query: &str) -> Result<(), DatabaseError> {
        debug!("execute: {query}");
        self.conn
            .execute_batch(query)
            .map_err(|source| DatabaseError::Execute { query: query.to_string(), source })
    }

    fn execute_prepared(
        &mut self,
        statement: &PreparedStatement,
        args: &[Value],
        close_after: bool,
    ) -> Result<(), DatabaseError> {
        let sql = statement.sql();
        let mut stmt = self
            .conn
            .prepare_cached(sql)
            .map_err(|source| DatabaseError::Prepare { sql: sql.to_string(), source })?;

        let result = stmt.execute(params_from_iter(args.iter()));
        if close_after {
            stmt.discard();
        }

        result
            .map(|rows| debug!("execute_prepared: {sql} ({rows} row(s))"))
            .map_err(|source| DatabaseError::Execute { query: sql.to_string(), source })
    }
}
