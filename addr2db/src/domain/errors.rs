//! Structured error types for addr2db
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to read binary {path}: {source}")]
    ReadBinary { path: String, source: std::io::Error },

    #[error("Failed to parse object file {path}: {source}")]
    ParseObject { path: String, source: object::Error },

    #[error("Failed to load DWARF debug information: {0}")]
    Dwarf(#[from] gimli::Error),

    #[error("Symbol lookup failed for {address}: {source}")]
    Lookup { address: Address, source: gimli::Error },
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to open database {path}: {source}")]
    Open { path: String, source: rusqlite::Error },

    #[error("Failed to prepare statement `{sql}`: {source}")]
    Prepare { sql: String, source: rusqlite::Error },

    #[error("Failed to execute `{query}`: {source}")]
    Execute { query: String, source: rusqlite::Error },
}

#[derive(Error, Debug)]
pub enum StripError {
    #[error("Strip tool `{0}` not found in PATH")]
    ToolNotFound(String),

    #[error("Failed to launch {tool}: {source}")]
    LaunchFailed { tool: String, source: std::io::Error },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed { tool: String, status: std::process::ExitStatus, stderr: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Work queue closed: the dispatcher is no longer running")]
    QueueClosed,

    #[error("Failed to start dispatcher thread: {0}")]
    SpawnFailed(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Failed to read request stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed request on line {line}: {source}")]
    Malformed { line: usize, source: serde_json::Error },

    #[error("Unsupported statement argument on line {line}: {value}")]
    UnsupportedArgument { line: usize, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid address `{0}` (expected 0x-prefixed hex or decimal)")]
pub struct AddressParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_error_display() {
        let err = StripError::ToolNotFound("llvm-strip-99".to_string());
        assert_eq!(err.to_string(), "Strip tool `llvm-strip-99` not found in PATH");
    }

    #[test]
    fn test_lookup_error_mentions_address() {
        let err = ResolveError::Lookup { address: Address(0xdead), source: gimli::Error::Io };
        assert!(err.to_string().contains("0xdead"));
    }
}
