//! Lexical path cleaning for resolved source files
//!
//! DWARF line tables often record paths relative to the compilation
//! directory (`kernel/sched/../sched/core.c`, `./include//linux/sched.h`).
//! Paths are normalized purely lexically before they reach the database:
//! the filesystem is never consulted, so symlinks are not followed.

/// Return the shortest lexically equivalent form of `path`
///
/// - Repeated separators collapse to one
/// - `.` elements are dropped
/// - `..` removes the preceding element; at the root it is dropped, in a
///   relative path with nothing left to remove it is kept
/// - A trailing separator is dropped (except for `/` itself)
/// - An empty result becomes `.`
#[must_use]
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for element in path.split('/') {
        match element {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if !rooted => parts.push(".."),
                _ => {}
            },
            name => parts.push(name),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_relative() {
        assert_eq!(clean_path("kernel/sched.c"), "kernel/sched.c");
        assert_eq!(clean_path("./kernel//sched.c"), "kernel/sched.c");
        assert_eq!(clean_path("kernel/sched/../fork.c"), "kernel/fork.c");
        assert_eq!(clean_path("include/linux/"), "include/linux");
    }

    #[test]
    fn test_clean_parent_escapes() {
        assert_eq!(clean_path("../../arch/x86"), "../../arch/x86");
        assert_eq!(clean_path("a/../../b"), "../b");
        assert_eq!(clean_path("a/.."), ".");
    }

    #[test]
    fn test_clean_rooted() {
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("//usr///src/"), "/usr/src");
        assert_eq!(clean_path("/../x"), "/x");
        assert_eq!(clean_path("/usr/src/linux/./mm/../kernel/exit.c"), "/usr/src/linux/kernel/exit.c");
    }

    #[test]
    fn test_clean_empty() {
        assert_eq!(clean_path(""), ".");
        assert_eq!(clean_path("."), ".");
        assert_eq!(clean_path("./"), ".");
    }
}
