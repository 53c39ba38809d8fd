//! Database execution primitives
//!
//! The dispatcher is the only caller of these methods. Both are
//! fire-and-forget from the pipeline's point of view: the result is logged
//! and counted, never consulted to decide what runs next.

pub mod sqlite;

pub use rusqlite::types::Value;
pub use sqlite::SqliteDatabase;

use crate::domain::DatabaseError;
use crate::pipeline::PreparedStatement;

/// Sink for the statements produced by the pipeline
pub trait Database: Send {
    /// Execute a non-prepared statement verbatim.
    ///
    /// # Errors
    /// Returns an error if the database rejects the statement.
    fn execute(&mut self, query: &str) -> Result<(), DatabaseError>;

    /// Execute a prepared statement with its bound arguments.
    ///
    /// When `close_after` is set the statement is released once it has run,
    /// whether or not execution succeeded.
    ///
    /// # Errors
    /// Returns an error if the statement cannot be prepared or executed.
    fn execute_prepared(
        &mut self,
        statement: &PreparedStatement,
        args: &[Value],
        close_after: bool,
    ) -> Result<(), DatabaseError>;
}
