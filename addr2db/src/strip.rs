//! Debug-section stripping via an external tool
//!
//! Stateless wrapper around `strip`/`objcopy`-style tools. Each call is
//! independent; re-running it overwrites the output file.

use log::{debug, info};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::StripError;

/// Locate an executable the way a shell would
///
/// A name containing a path separator is checked as given; otherwise every
/// `PATH` entry is probed.
#[must_use]
pub fn find_in_path(tool: &str) -> Option<PathBuf> {
    if tool.is_empty() {
        return None;
    }

    if tool.contains(std::path::MAIN_SEPARATOR) {
        let path = PathBuf::from(tool);
        return is_executable(&path).then_some(path);
    }

    let path_env = env::var_os("PATH")?;
    env::split_paths(&path_env).map(|dir| dir.join(tool)).find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Write a copy of `input` without debug sections to `output`
///
/// The tool is looked up before anything else happens, so a missing tool
/// never touches either file.
///
/// # Errors
/// - The tool is not on `PATH`
/// - The tool cannot be launched
/// - The tool exits unsuccessfully
pub fn strip(tool: &str, input: &Path, output: &Path) -> Result<(), StripError> {
    let executable = find_in_path(tool).ok_or_else(|| StripError::ToolNotFound(tool.to_string()))?;
    debug!("Using {}", executable.display());

    let result = Command::new(&executable)
        .arg("--strip-debug")
        .arg(input)
        .arg("-o")
        .arg(output)
        .output()
        .map_err(|source| StripError::LaunchFailed { tool: tool.to_string(), source })?;

    if !result.status.success() {
        return Err(StripError::ToolFailed {
            tool: tool.to_string(),
            status: result.status,
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        });
    }

    info!("Stripped {} -> {}", input.display(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_path_missing() {
        assert!(find_in_path("addr2db-no-such-tool").is_none());
        assert!(find_in_path("").is_none());
    }

    #[test]
    fn test_find_in_path_rejects_non_executable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, b"not a program").unwrap();
        assert!(find_in_path(file.to_str().unwrap()).is_none());
    }

    #[test]
    fn test_missing_tool_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("vmlinux");
        let output = dir.path().join("vmlinux.stripped");

        let err = strip("addr2db-no-such-tool", &input, &output).unwrap_err();
        assert!(matches!(err, StripError::ToolNotFound(ref t) if t == "addr2db-no-such-tool"));
        assert!(!input.exists());
        assert!(!output.exists());
    }
}
