// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logical path helpers shared by both backends.
//!
//! Logical paths are `/`-separated strings. A trailing `/` marks a
//! directory-like prefix: `foo/` addresses everything nested under `foo`,
//! while `foo` addresses one entry. Keeping the two apart is what stops
//! `foo` from matching `foobar` when the archive emulates directories.

use crate::error::{Error, Result};
use std::borrow::Cow;
use std::path::Path;

pub const SEPARATOR: char = '/';

/// The directory returned by lookups for entries at the top level
pub const ROOT: &str = ".";

/// True if `path` ends with the separator and so denotes a directory-like prefix
#[must_use]
pub fn is_dir_prefix(path: &str) -> bool {
    path.ends_with(SEPARATOR)
}

/// Prefix-match rule for directory emulation.
///
/// `path` is inside `prefix` iff `prefix` ends with the separator and `path`
/// starts with it, or `path` equals `prefix` exactly.
#[must_use]
pub fn is_within(path: &str, prefix: &str) -> bool {
    if is_dir_prefix(prefix) {
        path.starts_with(prefix)
    } else {
        path == prefix
    }
}

/// Substitute `to` for `from` at the front of `path`, keeping the suffix.
///
/// Returns `None` when `path` is not inside `from`.
#[must_use]
pub fn relocate(path: &str, from: &str, to: &str) -> Option<String> {
    if !is_within(path, from) {
        return None;
    }
    Some(format!("{to}{}", &path[from.len()..]))
}

/// Target prefix for moving or copying `from` to `to`.
///
/// A folder prefix always lands under a folder prefix, so `a/` to `b`
/// relocates `a/x` to `b/x`. A single entry cannot land on a folder prefix.
pub fn relocation_target<'a>(from: &str, to: &'a str) -> Result<Cow<'a, str>> {
    if is_dir_prefix(from) {
        if to.is_empty() {
            return Ok(Cow::Borrowed(to));
        }
        Ok(as_dir_prefix(to))
    } else if is_dir_prefix(to) {
        Err(Error::not_a_file(to))
    } else {
        Ok(Cow::Borrowed(to))
    }
}

/// Append the separator unless `path` already is a directory-like prefix
#[must_use]
pub fn as_dir_prefix(path: &str) -> Cow<'_, str> {
    if is_dir_prefix(path) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{path}{SEPARATOR}"))
    }
}

/// Extracts the final component of a logical path
#[must_use]
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    match trimmed.rsplit_once(SEPARATOR) {
        Some((_, name)) => name,
        None => trimmed,
    }
}

/// Extracts the directory portion of a logical path, `.` at the top level
#[must_use]
pub fn dirname(path: &str) -> String {
    match path.trim_end_matches(SEPARATOR).rsplit_once(SEPARATOR) {
        Some((dir, _)) if !dir.is_empty() => dir.to_string(),
        _ => ROOT.to_string(),
    }
}

/// Join a directory returned by a lookup with a child name
#[must_use]
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() || dir == ROOT {
        name.to_string()
    } else {
        format!("{}{SEPARATOR}{name}", dir.trim_end_matches(SEPARATOR))
    }
}

/// Every ancestor directory prefix of `path`, outermost first.
///
/// `a/b/c` yields `a/` and `a/b/`.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.trim_end_matches(SEPARATOR)
        .match_indices(SEPARATOR)
        .map(move |(index, _)| &path[..=index])
}

/// Split a folder-selection relative path into its top-level folder and the rest.
///
/// `myfolder/sub/file.txt` becomes `("myfolder", Some("sub/file.txt"))`.
/// A path with a single component has no remainder.
#[must_use]
pub fn split_top(relative: &str) -> (&str, Option<&str>) {
    match relative.split_once(SEPARATOR) {
        Some((top, rest)) if !rest.is_empty() => (top, Some(rest)),
        Some((top, _)) => (top, None),
        None => (relative, None),
    }
}

/// File name without its extension
#[must_use]
pub fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Refuse logical paths that would leave the output root
pub fn check_relative(path: &str) -> Result<()> {
    if path.starts_with(SEPARATOR) || path.split(SEPARATOR).any(|part| part == "..") {
        return Err(Error::path_escapes_root(path));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_within_respects_boundary() {
        assert!(is_within("a/x", "a/"));
        assert!(is_within("a/", "a/"));
        assert!(!is_within("ab/z", "a/"));

        // Without a trailing separator only the exact entry matches
        assert!(is_within("foo", "foo"));
        assert!(!is_within("foobar", "foo"));
        assert!(!is_within("foo/bar", "foo"));
    }

    #[test]
    fn test_relocate() {
        assert_eq!(relocate("a/x", "a/", "b/"), Some("b/x".to_string()));
        assert_eq!(relocate("a/deep/y", "a/", "b/c/"), Some("b/c/deep/y".to_string()));
        assert_eq!(relocate("file", "file", "other"), Some("other".to_string()));
        assert_eq!(relocate("ab/z", "a/", "b/"), None);
    }

    #[test]
    fn test_relocation_target() {
        assert_eq!(relocation_target("a/", "b").unwrap(), "b/");
        assert_eq!(relocation_target("a/", "b/").unwrap(), "b/");
        assert_eq!(relocation_target("a/", "").unwrap(), "");
        assert_eq!(relocation_target("one.txt", "two.txt").unwrap(), "two.txt");
        assert!(matches!(
            relocation_target("one.txt", "dir/"),
            Err(Error::NotAFile(_))
        ));
    }

    #[test]
    fn test_basename_and_dirname() {
        assert_eq!(basename("path/to/file.txt"), "file.txt");
        assert_eq!(basename("path/to/dir/"), "dir");
        assert_eq!(basename("top"), "top");

        assert_eq!(dirname("path/to/file.txt"), "path/to");
        assert_eq!(dirname("file.txt"), ".");
        assert_eq!(dirname("dir/"), ".");
    }

    #[test]
    fn test_join() {
        assert_eq!(join(".", "a"), "a");
        assert_eq!(join("", "a"), "a");
        assert_eq!(join("x/y", "a"), "x/y/a");
        assert_eq!(join("x/", "a"), "x/a");
    }

    #[test]
    fn test_ancestors() {
        let found: Vec<&str> = ancestors("a/b/c").collect();
        assert_eq!(found, vec!["a/", "a/b/"]);

        let found: Vec<&str> = ancestors("a/b/").collect();
        assert_eq!(found, vec!["a/"]);

        assert_eq!(ancestors("top").count(), 0);
    }

    #[test]
    fn test_split_top() {
        assert_eq!(
            split_top("myfolder/sub/file.txt"),
            ("myfolder", Some("sub/file.txt"))
        );
        assert_eq!(split_top("myfolder/file.txt"), ("myfolder", Some("file.txt")));
        assert_eq!(split_top("myfolder/"), ("myfolder", None));
        assert_eq!(split_top("file.txt"), ("file.txt", None));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("pack.zip"), "pack");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("README"), "README");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }

    #[test]
    fn test_check_relative() {
        assert!(check_relative("a/b").is_ok());
        assert!(check_relative("a/").is_ok());
        assert!(check_relative(".").is_ok());
        assert!(matches!(
            check_relative("/etc/passwd"),
            Err(Error::PathEscapesRoot(_))
        ));
        assert!(matches!(
            check_relative("a/../../b"),
            Err(Error::PathEscapesRoot(_))
        ));
    }
}
