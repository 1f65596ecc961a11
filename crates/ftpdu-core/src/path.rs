//! Helpers for slash-separated remote paths.
//!
//! Remote paths are plain strings: they are never interpreted with the local
//! platform's path rules.

/// Join a child name onto a remote directory path.
///
/// An absolute `name` replaces `base`; an empty `base` yields `name` unchanged.
pub fn join(base: &str, name: &str) -> String {
    if name.starts_with('/') || base.is_empty() {
        name.to_string()
    } else if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Last segment of a remote path.
///
/// Listings on some servers return path-qualified names; this reduces them to
/// the bare entry name. Trailing slashes are ignored.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return path;
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Resolve `path` against the directory `cwd`.
pub fn resolve(cwd: &str, path: &str) -> String {
    if path.is_empty() {
        cwd.to_string()
    } else {
        join(cwd, path)
    }
}

/// Whether a listed name is a self or parent reference.
pub fn is_dot_entry(name: &str) -> bool {
    name == "." || name == ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join("/pub", "a.txt"), "/pub/a.txt");
        assert_eq!(join("/", "pub"), "/pub");
        assert_eq!(join("", "pub"), "pub");
        assert_eq!(join("/pub", "/other/a"), "/other/a");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a.txt"), "a.txt");
        assert_eq!(base_name("/pub/sub/a.txt"), "a.txt");
        assert_eq!(base_name("pub/sub/"), "sub");
        assert_eq!(base_name("/"), "/");
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("/home/u", ""), "/home/u");
        assert_eq!(resolve("/home/u", "pub"), "/home/u/pub");
        assert_eq!(resolve("/home/u", "/srv"), "/srv");
    }

    #[test]
    fn test_dot_entries() {
        assert!(is_dot_entry("."));
        assert!(is_dot_entry(".."));
        assert!(!is_dot_entry(".hidden"));
    }
}
