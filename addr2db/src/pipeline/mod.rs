//! Write-serialization pipeline
//!
//! ```text
//!  producer ─┐
//!  producer ─┼─▶ bounded queue (FIFO) ─▶ Dispatcher ─▶ ResolverHandle (lock)
//!  producer ─┘                               │
//!                                            ▼
//!                                         Database
//! ```
//!
//! - `work_item`: the three kinds of deferred work
//! - `queue`: the bounded channel and the `spawn_query` / `spawn_stmt`
//!   submission API
//! - `dispatcher`: the single consumer, sole writer to the database

pub mod dispatcher;
pub mod queue;
pub mod work_item;

pub use dispatcher::{select_candidate, DispatchStats, Dispatcher, Drained};
pub use queue::{spawn_query, spawn_stmt, work_queue, Submitter, DEFAULT_QUEUE_CAPACITY};
pub use work_item::{PreparedStatement, QueryTemplate, WorkItem};

use log::info;
use std::thread::{self, JoinHandle};

use crate::database::Database;
use crate::domain::PipelineError;
use crate::symbolization::ResolverHandle;

/// A running dispatcher thread together with a producer handle
pub struct Pipeline<D> {
    submitter: Submitter,
    writer: JoinHandle<Drained<D>>,
}

impl<D: Database + 'static> Pipeline<D> {
    /// Create the queue and start the dispatcher on its own thread
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned
    pub fn start(
        resolver: ResolverHandle,
        database: D,
        capacity: usize,
    ) -> Result<Self, PipelineError> {
        let (submitter, rx) = work_queue(capacity);
        let dispatcher = Dispatcher::new(rx, resolver, database);

        let writer = thread::Builder::new()
            .name("addr2db-writer".to_string())
            .spawn(move || dispatcher.run())?;

        info!("Dispatcher started (queue capacity {})", capacity.max(1));
        Ok(Self { submitter, writer })
    }

    /// Producer handle; clone it to submit from other threads
    #[must_use]
    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }

    /// Close this handle's end of the queue and wait for the dispatcher
    ///
    /// Blocks until every other [`Submitter`] clone has been dropped and the
    /// remaining items have been written.
    pub fn finish(self) -> Drained<D> {
        drop(self.submitter);
        match self.writer.join() {
            Ok(drained) => drained,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}
