use addr2line::Context;
use gimli::{EndianArcSlice, RunTimeEndian};
use log::{debug, info};
use object::{Object, ObjectSection};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{Address, Candidate, ResolveError};

/// Function name used when DWARF has a location but no subprogram name
pub const UNKNOWN_FUNCTION: &str = "??";

/// Default bound on cached addresses before the cache is flushed
pub const DEFAULT_CACHE_CAPACITY: usize = 1 << 16;

type Reader = EndianArcSlice<RunTimeEndian>;

/// Maps an address to its candidate source locations
///
/// Implementations are not required to be thread-safe: every call goes
/// through [`ResolverHandle`](super::ResolverHandle), which serializes them.
/// An empty vector means the address is not covered by debug information;
/// `Err` is reserved for failures of the symbolizer itself.
pub trait Symbolize: Send {
    /// Resolve `address` to zero or more candidates.
    ///
    /// # Errors
    /// Returns an error if the debug information could not be read.
    fn symbolize(&mut self, address: Address) -> Result<Vec<Candidate>, ResolveError>;
}

impl<F> Symbolize for F
where
    F: FnMut(Address) -> Result<Vec<Candidate>, ResolveError> + Send,
{
    fn symbolize(&mut self, address: Address) -> Result<Vec<Candidate>, ResolveError> {
        self(address)
    }
}

/// DWARF symbolizer for a single binary image
///
/// Includes a cache to avoid re-resolving the same addresses repeatedly;
/// the same kernel function is typically requested once per call site.
/// The cache holds at most `cache_capacity` addresses and is flushed
/// whole when it fills up.
pub struct Symbolizer {
    ctx: Context<Reader>,
    /// Cache of resolved candidates by address
    cache: HashMap<u64, Vec<Candidate>>,
    cache_capacity: usize,
}

impl Symbolizer {
    /// Create a new symbolizer for the given binary
    ///
    /// A binary without DWARF sections still loads; every lookup then
    /// resolves to no candidates.
    ///
    /// # Errors
    /// Returns an error if the binary file cannot be read or parsed
    pub fn new<P: AsRef<Path>>(binary_path: P) -> Result<Self, ResolveError> {
        let path = binary_path.as_ref();
        let binary_data = fs::read(path)
            .map_err(|source| ResolveError::ReadBinary { path: path.display().to_string(), source })?;

        let obj_file = object::File::parse(&*binary_data).map_err(|source| {
            ResolveError::ParseObject { path: path.display().to_string(), source }
        })?;

        let endian =
            if obj_file.is_little_endian() { RunTimeEndian::Little } else { RunTimeEndian::Big };

        let load_section = |id: gimli::SectionId| -> Result<Reader, gimli::Error> {
            let data = obj_file
                .section_by_name(id.name())
                .and_then(|section| section.uncompressed_data().ok())
                .unwrap_or(Cow::Borrowed(&[][..]));
            Ok(EndianArcSlice::new(Arc::from(&*data), endian))
        };

        let dwarf = gimli::Dwarf::load(&load_section)?;
        let ctx = Context::from_dwarf(dwarf)?;

        info!("Loaded debug information from {}", path.display());

        Ok(Self { ctx, cache: HashMap::new(), cache_capacity: DEFAULT_CACHE_CAPACITY })
    }

    /// Limit the number of cached addresses; 0 disables caching
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self.cache.clear();
        self
    }

    /// Number of addresses currently cached
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Symbolize for Symbolizer {
    fn symbolize(&mut self, address: Address) -> Result<Vec<Candidate>, ResolveError> {
        if let Some(cached) = self.cache.get(&address.0) {
            return Ok(cached.clone());
        }

        let candidates = find_candidates(&self.ctx, address)?;
        debug!("{address}: {} candidate(s)", candidates.len());

        if self.cache_capacity > 0 {
            if self.cache.len() >= self.cache_capacity {
                debug!("Symbol cache full ({} addresses), flushing", self.cache.len());
                self.cache.clear();
            }
            self.cache.insert(address.0, candidates.clone());
        }
        Ok(candidates)
    }
}

/// Walk the (possibly inlined) frames at `address`, innermost first
///
/// Frames without a source file carry nothing worth recording and are
/// skipped. A missing line number is reported as 0.
fn find_candidates(ctx: &Context<Reader>, address: Address) -> Result<Vec<Candidate>, ResolveError> {
    let mut frames = ctx
        .find_frames(address.0)
        .skip_all_loads()
        .map_err(|source| ResolveError::Lookup { address, source })?;

    let mut candidates = Vec::new();
    while let Some(frame) =
        frames.next().map_err(|source| ResolveError::Lookup { address, source })?
    {
        let Some(location) = frame.location else {
            continue;
        };
        let Some(file) = location.file else {
            continue;
        };

        let function = frame
            .function
            .as_ref()
            .and_then(|f| f.demangle().ok())
            .map_or_else(|| UNKNOWN_FUNCTION.to_string(), Cow::into_owned);

        candidates.push(Candidate { file: file.to_string(), line: location.line.unwrap_or(0), function });
    }

    Ok(candidates)
}
