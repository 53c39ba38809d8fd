//! Domain model for addr2db
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern
//! - The in-band sentinels shared by the resolver and the dispatcher
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{Address, Candidate, NO_SYMBOL, SYMBOL_PREFIX, UNRESOLVED};

pub use errors::{
    AddressParseError, DatabaseError, PipelineError, RequestError, ResolveError, StripError,
};
