//! # addr2db - Address Resolution and Single-Writer Persistence
//!
//! addr2db is one stage of a kernel source/binary analysis pipeline. It
//! translates addresses taken from a binary image into `file:line` strings
//! using the image's DWARF debug information, and routes every resulting
//! database write through one consumer so writes are never issued
//! concurrently.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │        Producers (analysis passes, request stream, ...)      │
//! │          spawn_query(addr, symbol, template)                 │
//! │          spawn_stmt(statement, args, close_after)            │
//! └───────────────────────────┬──────────────────────────────────┘
//!                             │ bounded FIFO (backpressure)
//!                             ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Dispatcher (one thread)                  │
//! │                                                              │
//! │   ┌──────────────┐         ┌──────────────┐                  │
//! │   │  Resolver    │◀────────│  Resolve     │                  │
//! │   │ (DWARF+lock) │         │  items       │                  │
//! │   └──────────────┘         └──────┬───────┘                  │
//! │                                   ▼                          │
//! │                            ┌──────────────┐                  │
//! │                            │   Database   │  sole writer     │
//! │                            └──────────────┘                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`symbolization`]: DWARF symbolizer and the lock-guarded resolver handle
//! - [`pipeline`]: work items, the bounded queue, the submission API and
//!   the dispatcher
//! - [`database`]: the execution primitives and their SQLite implementation
//! - [`strip`]: external debug-section stripping
//! - [`requests`]: JSON-lines request stream used by the binary
//! - [`preflight`]: checks run on the target binary before resolution
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core domain types and errors
//!
//! ## Sentinels
//!
//! - Symbol name `"None"`: the item is a verbatim query, nothing to resolve
//! - Path `"NONE"`: the address has no source location

pub mod cli;
pub mod database;
pub mod domain;
pub mod pipeline;
pub mod preflight;
pub mod requests;
pub mod strip;
pub mod symbolization;
