//! # Address Resolution
//!
//! Converts addresses taken from a binary image into source locations using
//! the image's **DWARF debug information**.
//!
//! ## Flow
//!
//! ```text
//! 1. Open the binary once at startup
//!    object  -> ELF sections
//!    gimli   -> DWARF sections (.debug_info, .debug_line, ...)
//!    addr2line -> address-to-frames context
//!
//! 2. For each address, under the resolver lock:
//!    0xffffffff810c1a40 -> [ (kernel/sched/core.c, 6512, __schedule),
//!                            (kernel/sched/core.c, 6601, schedule) ]
//!
//! 3. Clean the file path lexically and format
//!    "kernel/sched/core.c:6601"      (last candidate wins)
//!    "NONE"                          (no candidates)
//! ```
//!
//! ## Module Structure
//!
//! - **`symbolizer`**: the [`Symbolize`] seam and the DWARF [`Symbolizer`],
//!   with a per-address cache
//! - **`resolver`**: [`ResolverHandle`], the lock that serializes every
//!   resolution in the process
//! - **`paths`**: lexical path cleaning
//!
//! ## Limitations
//!
//! - **Requires debug info**: a stripped image resolves everything to `NONE`
//! - **File addresses only**: no relocation is applied, addresses must be
//!   the ones recorded in the image (kernel `vmlinux` addresses qualify)

pub mod paths;
pub mod resolver;
pub mod symbolizer;

pub use paths::clean_path;
pub use resolver::{Resolution, ResolverHandle};
pub use symbolizer::{Symbolize, Symbolizer, DEFAULT_CACHE_CAPACITY, UNKNOWN_FUNCTION};
