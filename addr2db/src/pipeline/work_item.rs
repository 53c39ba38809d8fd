//! Units of deferred work carried on the queue

use std::fmt;
use std::sync::Arc;

use crate::database::Value;
use crate::domain::{Address, NO_SYMBOL};

/// One unit of work for the dispatcher
///
/// Exactly one variant is active per item, so fields belonging to the other
/// variants simply do not exist.
#[derive(Debug, Clone)]
pub enum WorkItem {
    /// Prepared statement with its bound arguments
    Prepared { statement: PreparedStatement, args: Vec<Value>, close_after: bool },
    /// Raw query executed verbatim
    Query { query: String },
    /// Raw query whose `%s` is filled with the resolved path of `address`
    Resolve { address: Address, symbol: String, template: QueryTemplate },
}

impl WorkItem {
    /// Build a raw-query item
    ///
    /// `symbol_name == "None"` selects a verbatim query; any other name asks
    /// for `address` to be resolved into `template` first.
    pub fn query(address: Address, symbol_name: &str, template: impl Into<String>) -> Self {
        if symbol_name == NO_SYMBOL {
            WorkItem::Query { query: template.into() }
        } else {
            WorkItem::Resolve {
                address,
                symbol: symbol_name.to_string(),
                template: QueryTemplate::new(template),
            }
        }
    }

    /// Build a prepared-statement item
    #[must_use]
    pub fn statement(statement: PreparedStatement, args: Vec<Value>, close_after: bool) -> Self {
        WorkItem::Prepared { statement, args, close_after }
    }

    /// Short label for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            WorkItem::Prepared { .. } => "prepared",
            WorkItem::Query { .. } => "query",
            WorkItem::Resolve { .. } => "resolve",
        }
    }
}

/// Handle to a statement the database prepares on first use
///
/// Cloning is cheap; clones refer to the same SQL text and therefore to the
/// same cached statement on the database side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreparedStatement {
    sql: Arc<str>,
}

impl PreparedStatement {
    pub fn new(sql: impl AsRef<str>) -> Self {
        Self { sql: Arc::from(sql.as_ref()) }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// Query text with a single `%s` placeholder for a source path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    text: String,
}

impl QueryTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Substitute `path` for the first `%s`
    ///
    /// `path` goes in verbatim; templates quote it themselves. `%%` becomes
    /// a literal `%` and any later `%s` is left as is.
    #[must_use]
    pub fn fill(&self, path: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + path.len());
        let mut filled = false;
        let mut chars = self.text.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('s') if !filled => {
                    chars.next();
                    out.push_str(path);
                    filled = true;
                }
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                _ => out.push('%'),
            }
        }

        out
    }
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_selects_variant_by_symbol() {
        let raw = WorkItem::query(Address(0x1000), "None", "DELETE FROM files");
        assert!(matches!(raw, WorkItem::Query { ref query } if query == "DELETE FROM files"));

        let resolve = WorkItem::query(Address(0x1000), "sym.schedule", "INSERT '%s'");
        match resolve {
            WorkItem::Resolve { address, symbol, template } => {
                assert_eq!(address, Address(0x1000));
                assert_eq!(symbol, "sym.schedule");
                assert_eq!(template.as_str(), "INSERT '%s'");
            }
            other => panic!("expected resolve item, got {other:?}"),
        }
    }

    #[test]
    fn test_sentinel_is_case_sensitive() {
        let item = WorkItem::query(Address(1), "NONE", "SELECT '%s'");
        assert_eq!(item.kind(), "resolve");
    }

    #[test]
    fn test_fill_placeholder() {
        let template = QueryTemplate::new("UPDATE symbols SET file = '%s' WHERE addr = 4096");
        assert_eq!(
            template.fill("kernel/sched.c"),
            "UPDATE symbols SET file = 'kernel/sched.c' WHERE addr = 4096"
        );
    }

    #[test]
    fn test_fill_escapes() {
        assert_eq!(QueryTemplate::new("'%s' LIKE '%%.c'").fill("a.c"), "'a.c' LIKE '%.c'");
        assert_eq!(QueryTemplate::new("%s %s %d").fill("x"), "x %s %d");
        assert_eq!(QueryTemplate::new("trailing %").fill("x"), "trailing %");
    }

    #[test]
    fn test_fill_inserts_path_verbatim() {
        assert_eq!(QueryTemplate::new("path=%s").fill("drivers/it's.c"), "path=drivers/it's.c");
        assert_eq!(QueryTemplate::new("'%s'").fill("it's.c"), "'it's.c'");
    }

    #[test]
    fn test_statement_handles_compare_by_sql() {
        let a = PreparedStatement::new("INSERT INTO t VALUES (?1)");
        let b = PreparedStatement::new(String::from("INSERT INTO t VALUES (?1)"));
        assert_eq!(a, b);
        assert_eq!(a.sql(), "INSERT INTO t VALUES (?1)");
    }
}
