//! # Serializing Dispatcher
//!
//! The single consumer of the work queue and the only code path that writes
//! to the database.
//!
//! ## Loop
//!
//! ```text
//! recv() ──▶ Prepared  ──▶ execute_prepared(stmt, args, close_after)
//!        ──▶ Query     ──▶ execute(query)
//!        ──▶ Resolve   ──▶ lookup(address) ──▶ pick candidate ──▶ fill template ──▶ execute
//! ```
//!
//! Items are handled one at a time in queue order, so database effects
//! follow submission order and never overlap. A failed write is logged and
//! counted; the loop carries on with the next item. The loop ends only when
//! every [`Submitter`](super::Submitter) has been dropped.

use crossbeam_channel::Receiver;
use log::{debug, error, info, warn};
use std::fmt;

use super::work_item::{QueryTemplate, WorkItem};
use crate::database::Database;
use crate::domain::{Address, Candidate, UNRESOLVED};
use crate::symbolization::{clean_path, Resolution, ResolverHandle};

/// Counters kept by the dispatcher
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Items taken off the queue
    pub items: u64,
    /// Statements the database accepted
    pub executed: u64,
    /// Statements the database rejected
    pub failed: u64,
    /// Resolution requests that fell back to `NONE`
    pub unresolved: u64,
    /// Resolution requests where the symbolizer itself failed
    pub symbolizer_errors: u64,
}

impl fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "items={} executed={} failed={} unresolved={} symbolizer_errors={}",
            self.items, self.executed, self.failed, self.unresolved, self.symbolizer_errors
        )
    }
}

/// What is left once the dispatcher has drained the queue
pub struct Drained<D> {
    pub stats: DispatchStats,
    pub database: D,
}

/// Pick the candidate whose path goes into the query
///
/// The first candidate whose function is `symbol` (ignoring a `sym.`
/// prefix) wins; without such a match the LAST candidate is used.
#[must_use]
pub fn select_candidate<'a>(candidates: &'a [Candidate], symbol: &str) -> Option<&'a Candidate> {
    candidates.iter().find(|c| c.matches_symbol(symbol)).or_else(|| candidates.last())
}

/// Encapsulates the consumer loop and its state
pub struct Dispatcher<D> {
    queue: Receiver<WorkItem>,
    resolver: ResolverHandle,
    database: D,
    stats: DispatchStats,
}

impl<D: Database> Dispatcher<D> {
    #[must_use]
    pub fn new(queue: Receiver<WorkItem>, resolver: ResolverHandle, database: D) -> Self {
        Self { queue, resolver, database, stats: DispatchStats::default() }
    }

    /// Drain the queue until every producer has gone away
    pub fn run(mut self) -> Drained<D> {
        while let Ok(item) = self.queue.recv() {
            self.dispatch(item);
        }

        info!("Work queue closed: {}", self.stats);
        Drained { stats: self.stats, database: self.database }
    }

    /// Handle a single item
    pub fn dispatch(&mut self, item: WorkItem) {
        self.stats.items += 1;
        debug!("item #{}: {}", self.stats.items, item.kind());

        let result = match item {
            WorkItem::Prepared { statement, args, close_after } => {
                self.database.execute_prepared(&statement, &args, close_after)
            }
            WorkItem::Query { query } => self.database.execute(&query),
            WorkItem::Resolve { address, symbol, template } => {
                let query = self.resolved_query(address, &symbol, &template);
                self.database.execute(&query)
            }
        };

        match result {
            Ok(()) => self.stats.executed += 1,
            Err(err) => {
                self.stats.failed += 1;
                error!("item #{}: {err}", self.stats.items);
            }
        }
    }

    #[must_use]
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    fn resolved_query(&mut self, address: Address, symbol: &str, template: &QueryTemplate) -> String {
        let candidates = match self.resolver.lookup(address) {
            Resolution::Found(candidates) => candidates,
            Resolution::NotFound => Vec::new(),
            Resolution::Failed(err) => {
                self.stats.symbolizer_errors += 1;
                warn!("{symbol} at {address}: {err}");
                Vec::new()
            }
        };

        if let Some(candidate) = select_candidate(&candidates, symbol) {
            template.fill(&clean_path(&candidate.file))
        } else {
            self.stats.unresolved += 1;
            template.fill(UNRESOLVED)
        }
    }
}
