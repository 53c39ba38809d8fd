//! JSON-lines request stream
//!
//! The surrounding analysis tool describes its database work one record per
//! line:
//!
//! ```text
//! {"kind":"query","address":"0xffffffff810c1a40","symbol":"sym.schedule","query":"UPDATE symbols SET file='%s' WHERE name='schedule'"}
//! {"kind":"query","query":"DELETE FROM tags"}
//! {"kind":"stmt","sql":"INSERT INTO calls VALUES (?1, ?2)","args":[1, "schedule"],"close":false}
//! ```
//!
//! `address` may be a JSON number or a hex/decimal string and defaults to 0;
//! `symbol` defaults to `"None"` (no resolution).

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::io::BufRead;

use crate::database::Value;
use crate::domain::{Address, PipelineError, RequestError, NO_SYMBOL};
use crate::pipeline::{PreparedStatement, Submitter};

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Record {
    Query {
        #[serde(default, deserialize_with = "deserialize_address")]
        address: Address,
        #[serde(default = "no_symbol")]
        symbol: String,
        query: String,
    },
    Stmt {
        sql: String,
        #[serde(default)]
        args: Vec<serde_json::Value>,
        #[serde(default)]
        close: bool,
    },
}

fn no_symbol() -> String {
    NO_SYMBOL.to_string()
}

fn deserialize_address<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(Address(n)),
        Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// A parsed request, ready to submit
#[derive(Debug, Clone)]
pub enum Request {
    Query { address: Address, symbol: String, query: String },
    Stmt { statement: PreparedStatement, args: Vec<Value>, close_after: bool },
}

impl Request {
    /// Hand the request to the pipeline
    ///
    /// # Errors
    /// Returns [`PipelineError::QueueClosed`] if the dispatcher is gone.
    pub fn submit(self, submitter: &Submitter) -> Result<(), PipelineError> {
        match self {
            Request::Query { address, symbol, query } => {
                submitter.spawn_query(address, &symbol, query)
            }
            Request::Stmt { statement, args, close_after } => {
                submitter.spawn_stmt(statement, args, close_after)
            }
        }
    }
}

/// Iterator over the requests in a JSON-lines stream
///
/// Blank lines are skipped. Records with identical SQL share one
/// [`PreparedStatement`] handle.
pub struct Requests<R> {
    reader: R,
    line: usize,
    buf: String,
    statements: HashMap<String, PreparedStatement>,
}

/// Read requests from `reader`, one JSON object per line
pub fn read_requests<R: BufRead>(reader: R) -> Requests<R> {
    Requests { reader, line: 0, buf: String::new(), statements: HashMap::new() }
}

impl<R: BufRead> Requests<R> {
    fn parse(&mut self, text: &str) -> Result<Request, RequestError> {
        let line = self.line;
        let record: Record =
            serde_json::from_str(text).map_err(|source| RequestError::Malformed { line, source })?;

        Ok(match record {
            Record::Query { address, symbol, query } => Request::Query { address, symbol, query },
            Record::Stmt { sql, args, close } => {
                let args = args
                    .into_iter()
                    .map(|arg| to_sql_value(arg, line))
                    .collect::<Result<Vec<_>, _>>()?;
                let statement = self
                    .statements
                    .entry(sql)
                    .or_insert_with_key(|sql| PreparedStatement::new(sql))
                    .clone();
                Request::Stmt { statement, args, close_after: close }
            }
        })
    }
}

impl<R: BufRead> Iterator for Requests<R> {
    type Item = Result<Request, RequestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(err.into())),
            }
            self.line += 1;

            let text = self.buf.trim().to_string();
            if !text.is_empty() {
                return Some(self.parse(&text));
            }
        }
    }
}

/// Map a JSON scalar onto an SQLite value
///
/// Booleans become 0/1, integers that fit `i64` stay integers, other numbers
/// become reals. Arrays and objects have no SQLite counterpart.
fn to_sql_value(arg: serde_json::Value, line: usize) -> Result<Value, RequestError> {
    use serde_json::Value as Json;

    match arg {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Integer(i64::from(b))),
        Json::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Value::Integer(i)),
            (None, Some(f)) => Ok(Value::Real(f)),
            (None, None) => Err(RequestError::UnsupportedArgument { line, value: n.to_string() }),
        },
        Json::String(s) => Ok(Value::Text(s)),
        other => Err(RequestError::UnsupportedArgument { line, value: other.to_string() }),
    }
}
