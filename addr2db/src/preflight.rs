//! Pre-flight checks for addr2db
//!
//! Validates the target binary before the symbolizer is built.
//! Provides clear, actionable error messages when requirements aren't met.

use anyhow::{bail, Context, Result};
use log::warn;
use object::{Object, ObjectSection};
use std::path::Path;

/// How much symbol information a binary carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugInfo {
    /// `.debug_info` present: addresses resolve to file:line
    Dwarf,
    /// Symbol table only: every address resolves to `NONE`
    SymbolsOnly,
    /// Neither
    Stripped,
}

/// Run all pre-flight checks before opening the resolver
///
/// # Errors
/// Returns an error if the binary does not exist or cannot be read
pub fn run_preflight_checks(target_path: &Path) -> Result<DebugInfo> {
    check_binary_exists(target_path)?;
    check_debug_symbols(target_path)
}

/// Check if the target binary exists and is a regular file
///
/// # Errors
/// Returns an error for a missing path or a directory
pub fn check_binary_exists(target_path: &Path) -> Result<()> {
    if !target_path.exists() {
        bail!(
            "Binary not found: {}\n\n\
             Make sure the path is correct and the binary exists.",
            target_path.display()
        );
    }
    if !target_path.is_file() {
        bail!(
            "Not a file: {}\n\n\
             --binary must point to an executable or vmlinux image, not a directory.",
            target_path.display()
        );
    }
    Ok(())
}

/// Check if the binary has debug symbols for source resolution
///
/// Files that are not object files are reported as stripped; the
/// symbolizer produces the real parse error later.
///
/// # Errors
/// Returns an error if the file cannot be read
pub fn check_debug_symbols(target_path: &Path) -> Result<DebugInfo> {
    let file_data = std::fs::read(target_path)
        .with_context(|| format!("Failed to read binary: {}", target_path.display()))?;

    let Ok(obj) = object::File::parse(&*file_data) else {
        return Ok(DebugInfo::Stripped);
    };

    let has_debug_info = obj.section_by_name(".debug_info").is_some_and(|s| s.size() > 0);
    let has_symtab = obj.section_by_name(".symtab").is_some_and(|s| s.size() > 0);

    let info = match (has_debug_info, has_symtab) {
        (true, _) => DebugInfo::Dwarf,
        (false, true) => DebugInfo::SymbolsOnly,
        (false, false) => DebugInfo::Stripped,
    };

    match info {
        DebugInfo::Dwarf => {}
        DebugInfo::SymbolsOnly => {
            warn!("{}: no DWARF debug info, every address will resolve to NONE", target_path.display());
        }
        DebugInfo::Stripped => {
            warn!("{}: binary stripped, every address will resolve to NONE", target_path.display());
        }
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_not_found() {
        let result = check_binary_exists(Path::new("/nonexistent/path/to/vmlinux"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Binary not found"));
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_binary_exists(dir.path()).unwrap_err().to_string();
        assert!(err.contains("Not a file"));
    }

    #[test]
    fn test_non_object_file_counts_as_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"just text").unwrap();
        assert_eq!(run_preflight_checks(&path).unwrap(), DebugInfo::Stripped);
    }
}
