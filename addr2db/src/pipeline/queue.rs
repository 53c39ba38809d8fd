//! Bounded work queue and the producer-side submission API
//!
//! Producers never execute or resolve anything themselves: they only
//! enqueue. A full queue blocks the producer until the dispatcher frees a
//! slot; items are never dropped or reordered.

use crossbeam_channel::{bounded, Receiver, Sender};

use super::work_item::{PreparedStatement, WorkItem};
use crate::database::Value;
use crate::domain::{Address, PipelineError};

/// Queue capacity used when the caller has no better idea
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Create a bounded FIFO queue with room for `capacity` pending items
///
/// A capacity of 0 is raised to 1 so that submission stays asynchronous
/// with respect to the consumer.
#[must_use]
pub fn work_queue(capacity: usize) -> (Submitter, Receiver<WorkItem>) {
    let (tx, rx) = bounded(capacity.max(1));
    (Submitter { tx }, rx)
}

/// Producer end of the work queue
///
/// Cheap to clone and safe to share between threads. The dispatcher keeps
/// running until every clone has been dropped.
#[derive(Clone)]
pub struct Submitter {
    tx: Sender<WorkItem>,
}

impl Submitter {
    /// Enqueue a raw query, resolving `address` first unless `symbol_name`
    /// is `"None"`.
    ///
    /// # Errors
    /// Returns [`PipelineError::QueueClosed`] if the dispatcher is gone.
    pub fn spawn_query(
        &self,
        address: Address,
        symbol_name: &str,
        template: impl Into<String>,
    ) -> Result<(), PipelineError> {
        self.submit(WorkItem::query(address, symbol_name, template))
    }

    /// Enqueue a prepared statement with its arguments.
    ///
    /// With `close_after` set, releasing the statement becomes the
    /// dispatcher's job once it has run.
    ///
    /// # Errors
    /// Returns [`PipelineError::QueueClosed`] if the dispatcher is gone.
    pub fn spawn_stmt(
        &self,
        statement: PreparedStatement,
        args: Vec<Value>,
        close_after: bool,
    ) -> Result<(), PipelineError> {
        self.submit(WorkItem::statement(statement, args, close_after))
    }

    /// Items waiting in the queue
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tx.len()
    }

    fn submit(&self, item: WorkItem) -> Result<(), PipelineError> {
        self.tx.send(item).map_err(|_| PipelineError::QueueClosed)
    }
}

/// Free-function form of [`Submitter::spawn_query`]
///
/// # Errors
/// Returns [`PipelineError::QueueClosed`] if the dispatcher is gone.
pub fn spawn_query(
    queue: &Submitter,
    address: Address,
    symbol_name: &str,
    template: impl Into<String>,
) -> Result<(), PipelineError> {
    queue.spawn_query(address, symbol_name, template)
}

/// Free-function form of [`Submitter::spawn_stmt`]
///
/// # Errors
/// Returns [`PipelineError::QueueClosed`] if the dispatcher is gone.
pub fn spawn_stmt(
    queue: &Submitter,
    statement: PreparedStatement,
    args: Vec<Value>,
    close_after: bool,
) -> Result<(), PipelineError> {
    queue.spawn_stmt(statement, args, close_after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_arrive_in_order() {
        let (submitter, rx) = work_queue(4);
        spawn_query(&submitter, Address(0), "None", "Q1").unwrap();
        spawn_query(&submitter, Address(0x10), "sym.f", "Q2 '%s'").unwrap();
        spawn_stmt(&submitter, PreparedStatement::new("S"), vec![Value::Integer(3)], true).unwrap();

        assert_eq!(submitter.pending(), 3);
        let kinds: Vec<_> = rx.try_iter().map(|item| item.kind()).collect();
        assert_eq!(kinds, ["query", "resolve", "prepared"]);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let (submitter, rx) = work_queue(0);
        submitter.spawn_query(Address(0), "None", "Q").unwrap();
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_submit_after_consumer_dropped() {
        let (submitter, rx) = work_queue(1);
        drop(rx);
        let err = submitter.spawn_query(Address(0), "None", "Q").unwrap_err();
        assert!(matches!(err, PipelineError::QueueClosed));
    }
}
