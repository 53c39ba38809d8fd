//! Domain types providing compile-time safety and self-documentation

use std::fmt;
use std::str::FromStr;

use super::errors::AddressParseError;

/// Symbol name marking a raw query that needs no address resolution.
pub const NO_SYMBOL: &str = "None";

/// In-band value for an address with no source location.
pub const UNRESOLVED: &str = "NONE";

/// Prefix disassemblers put in front of symbol names (`sym.schedule`).
pub const SYMBOL_PREFIX: &str = "sym.";

/// Program-counter value taken from a binary image
///
/// Displayed as `0x`-prefixed hex. Parses from either `0x`-prefixed hex or
/// plain decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub u64);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl From<u64> for Address {
    fn from(addr: u64) -> Self {
        Address(addr)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed.map(Address).map_err(|_| AddressParseError(s.to_string()))
    }
}

/// One possible source location for an address
///
/// The symbolizer returns zero or more of these per address: one for each
/// inlined frame that carries a source file, innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl Candidate {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self { file: file.into(), line, function: function.into() }
    }

    /// Returns true if this candidate belongs to the requested symbol.
    ///
    /// A leading `sym.` on the requested name is ignored.
    #[must_use]
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.function == symbol.strip_prefix(SYMBOL_PREFIX).unwrap_or(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        assert_eq!(Address(0x1000).to_string(), "0x1000");
        assert_eq!(Address(0).to_string(), "0x0");
    }

    #[test]
    fn test_address_parse() {
        assert_eq!("0x1000".parse::<Address>().unwrap(), Address(0x1000));
        assert_eq!("0XfFfF".parse::<Address>().unwrap(), Address(0xffff));
        assert_eq!("4096".parse::<Address>().unwrap(), Address(4096));
        assert_eq!(" 0x10 ".parse::<Address>().unwrap(), Address(16));
    }

    #[test]
    fn test_address_parse_rejects_garbage() {
        let err = "0xzz".parse::<Address>().unwrap_err();
        assert!(err.to_string().contains("0xzz"));
        assert!("".parse::<Address>().is_err());
        assert!("-1".parse::<Address>().is_err());
    }

    #[test]
    fn test_matches_symbol_strips_prefix() {
        let candidate = Candidate::new("kernel/sched/core.c", 42, "schedule");
        assert!(candidate.matches_symbol("schedule"));
        assert!(candidate.matches_symbol("sym.schedule"));
        assert!(!candidate.matches_symbol("sym.schedule_idle"));
        assert!(!candidate.matches_symbol("sym.sym.schedule"));
    }
}
