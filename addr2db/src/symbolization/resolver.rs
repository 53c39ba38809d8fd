//! Process-wide resolver handle
//!
//! The DWARF context is not safe to query concurrently, so the handle owns it
//! behind a single lock. Clones share the same lock: at most one resolution
//! runs at any time, whichever thread asks. A lookup that panics poisons
//! the lock; the next caller clears the poison and keeps using the same
//! symbolizer.

use log::warn;
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::paths::clean_path;
use super::symbolizer::{Symbolize, Symbolizer};
use crate::domain::{Address, Candidate, ResolveError, UNRESOLVED};

/// Outcome of a single lookup
///
/// Keeps "not covered by debug info" apart from "the symbolizer failed",
/// which [`ResolverHandle::resolve`] deliberately collapses.
#[derive(Debug)]
pub enum Resolution {
    Found(Vec<Candidate>),
    NotFound,
    Failed(ResolveError),
}

impl Resolution {
    /// The candidates, with both failure kinds mapped to an empty list
    #[must_use]
    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            Resolution::Found(candidates) => candidates,
            Resolution::NotFound | Resolution::Failed(_) => Vec::new(),
        }
    }
}

/// Shared, serialized access to a symbolizer
#[derive(Clone)]
pub struct ResolverHandle {
    symbolizer: Arc<Mutex<Box<dyn Symbolize>>>,
}

impl ResolverHandle {
    /// Wrap an already constructed symbolizer
    pub fn new<S: Symbolize + 'static>(symbolizer: S) -> Self {
        Self { symbolizer: Arc::new(Mutex::new(Box::new(symbolizer))) }
    }

    /// Open the debug information of `binary_path`
    ///
    /// # Errors
    /// Returns an error if the binary cannot be read or parsed. Callers treat
    /// this as fatal: nothing can be resolved without it.
    pub fn open<P: AsRef<Path>>(binary_path: P) -> Result<Self, ResolveError> {
        Ok(Self::new(Symbolizer::new(binary_path)?))
    }

    /// Resolve `address` under the lock, keeping failures distinct
    pub fn lookup(&self, address: Address) -> Resolution {
        let result = {
            let mut symbolizer = self.symbolizer.lock().unwrap_or_else(|poisoned| {
                warn!("Resolver lock poisoned by a panicking lookup, recovering");
                self.symbolizer.clear_poison();
                poisoned.into_inner()
            });
            symbolizer.symbolize(address)
        };

        match result {
            Ok(candidates) if candidates.is_empty() => Resolution::NotFound,
            Ok(candidates) => Resolution::Found(candidates),
            Err(err) => Resolution::Failed(err),
        }
    }

    /// Resolve `address` to its candidates, possibly none
    ///
    /// A symbolizer failure is logged and reported as no candidates, so an
    /// empty vector is the single not-found signal for callers.
    pub fn resolve(&self, address: Address) -> Vec<Candidate> {
        match self.lookup(address) {
            Resolution::Failed(err) => {
                warn!("{err}");
                Vec::new()
            }
            resolution => resolution.into_candidates(),
        }
    }

    /// Resolve `address` to `file:line`, or `NONE`
    ///
    /// When several candidates exist the LAST one wins.
    pub fn resolve_to_string(&self, address: Address) -> String {
        self.resolve(address)
            .last()
            .map_or_else(|| UNRESOLVED.to_string(), |c| format!("{}:{}", clean_path(&c.file), c.line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(address: Address) -> Result<Vec<Candidate>, ResolveError> {
        match address.0 {
            0x1000 => Ok(vec![Candidate::new("kernel/sched.c", 42, "schedule")]),
            0x2000 => Ok(vec![
                Candidate::new("include/linux/list.h", 10, "list_add"),
                Candidate::new("kernel/../mm/slab.c", 77, "kmalloc"),
            ]),
            0xbad => Err(ResolveError::Dwarf(gimli::Error::Io)),
            _ => Ok(Vec::new()),
        }
    }

    #[test]
    fn test_resolve_to_string_single_candidate() {
        let resolver = ResolverHandle::new(table);
        assert_eq!(resolver.resolve_to_string(Address(0x1000)), "kernel/sched.c:42");
    }

    #[test]
    fn test_resolve_to_string_takes_last_candidate() {
        let resolver = ResolverHandle::new(table);
        assert_eq!(resolver.resolve_to_string(Address(0x2000)), "mm/slab.c:77");
    }

    #[test]
    fn test_resolve_to_string_not_found() {
        let resolver = ResolverHandle::new(table);
        assert_eq!(resolver.resolve_to_string(Address(0x9999)), "NONE");
    }

    #[test]
    fn test_symbolizer_error_is_swallowed() {
        let resolver = ResolverHandle::new(table);
        assert!(resolver.resolve(Address(0xbad)).is_empty());
        assert_eq!(resolver.resolve_to_string(Address(0xbad)), "NONE");
    }

    #[test]
    fn test_lookup_keeps_outcomes_distinct() {
        let resolver = ResolverHandle::new(table);
        assert!(matches!(resolver.lookup(Address(0x1000)), Resolution::Found(ref c) if c.len() == 1));
        assert!(matches!(resolver.lookup(Address(0x9999)), Resolution::NotFound));
        assert!(matches!(resolver.lookup(Address(0xbad)), Resolution::Failed(_)));
    }

    #[test]
    fn test_lookups_continue_after_panicking_lookup() {
        let resolver = ResolverHandle::new(|address: Address| -> Result<Vec<Candidate>, ResolveError> {
            assert_ne!(address.0, 0xdead, "symbolizer crashed");
            table(address)
        });

        let crashing = resolver.clone();
        let crashed = std::thread::spawn(move || crashing.lookup(Address(0xdead))).join();
        assert!(crashed.is_err());

        assert!(matches!(resolver.lookup(Address(0x1000)), Resolution::Found(_)));
        assert_eq!(resolver.resolve_to_string(Address(0x1000)), "kernel/sched.c:42");
        assert!(!resolver.symbolizer.is_poisoned());
    }
}
