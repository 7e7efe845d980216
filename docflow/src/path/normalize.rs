//! Path normalization and collapsing.
//!
//! Both operations are purely syntactic: nothing here touches a filesystem.
//!
//! Normalization:
//! - Converts `\` separators to `/`
//! - Trims surrounding whitespace
//! - Removes trailing `/` (a bare `/` is kept)
//! - Strips a leading `./` (a path that reduces to nothing becomes `.`)
//!
//! Collapsing resolves `.` and `..` segments without ever climbing above the
//! path's root.

use crate::error::{Error, Result};

use super::types::{NormalizedPath, PathKind, PathType, Provider};

/// Normalize a path literal into a directory-tagged [`NormalizedPath`].
///
/// Use [`NormalizedPath::new`] to choose the directory/file tag explicitly.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if `raw` is empty or whitespace-only and
/// [`Error::InvalidProvider`] if `provider` is present while the resolved
/// kind is relative.
///
/// # Examples
///
/// ```
/// use docflow::path::normalize::normalize;
/// use docflow::path::{PathKind, Provider};
///
/// let path = normalize("shaders\\basic", PathKind::RelativeOrAbsolute, Provider::Absent).unwrap();
/// assert_eq!(path.full_path(), "shaders/basic");
/// ```
pub fn normalize(raw: &str, kind: PathKind, provider: Provider) -> Result<NormalizedPath> {
    NormalizedPath::new(PathType::Directory, raw, kind, provider)
}

/// Normalize the text of a path literal.
///
/// The steps are repeated until nothing changes so the result is a fixed
/// point: normalizing it again returns the same string.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the literal is empty after trimming.
pub(crate) fn normalize_str(raw: &str) -> Result<String> {
    let mut path = raw.replace('\\', "/");
    if path.trim().is_empty() {
        return Err(Error::InvalidPath {
            path: raw.to_string(),
            reason: "path is empty or whitespace".to_string(),
        });
    }

    loop {
        let before = path.len();

        path = path.trim().to_string();
        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        while path.len() > 2 && path.starts_with("./") {
            path.drain(..2);
        }

        if path.len() == before {
            break;
        }
    }

    if path.is_empty() {
        path.push('.');
    }
    Ok(path)
}

/// Returns the drive prefix (`c:`) of a path such as `c:/a` or `c:`.
pub(crate) fn drive_prefix(path: &str) -> Option<&str> {
    let bytes = path.as_bytes();
    let is_drive = bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/');
    is_drive.then(|| &path[..2])
}

/// Returns true if `segment` is exactly a drive prefix such as `c:`.
pub(crate) fn is_drive(segment: &str) -> bool {
    segment.len() == 2 && drive_prefix(segment).is_some()
}

/// Returns true if normalized text denotes an absolute path.
pub(crate) fn looks_absolute(path: &str) -> bool {
    path.starts_with('/') || drive_prefix(path).is_some()
}

/// Resolve `.` and `..` segments of a path.
///
/// `..` removes the previous segment; at the root it is dropped, so an
/// absolute path never loses its root marker and a relative path never
/// gains leading `..` segments. An empty result is `.` for relative paths
/// and the bare root for absolute ones.
///
/// # Examples
///
/// ```
/// use docflow::path::normalize::collapse;
/// use docflow::path::NormalizedPath;
///
/// let path = NormalizedPath::directory("/hello/../../../../temp").unwrap();
/// assert_eq!(collapse(&path), "/temp");
///
/// let path = NormalizedPath::directory("hello/temp/test/../../world").unwrap();
/// assert_eq!(collapse(&path), "hello/world");
/// ```
#[must_use]
pub fn collapse(path: &NormalizedPath) -> String {
    let full = path.full_path();
    let (root, body) = if path.is_relative() {
        (String::new(), full)
    } else if let Some(drive) = drive_prefix(full) {
        (format!("{drive}/"), &full[drive.len()..])
    } else {
        ("/".to_string(), full)
    };

    let mut stack: Vec<&str> = Vec::new();
    for segment in body.split('/').filter(|s| !s.is_empty()) {
        match segment {
            "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    let joined = stack.join("/");
    if root.is_empty() {
        if joined.is_empty() {
            ".".to_string()
        } else {
            joined
        }
    } else {
        root + &joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(raw: &str) -> String {
        normalize_str(raw).unwrap()
    }

    fn collapse_dir(raw: &str) -> String {
        collapse(&NormalizedPath::directory(raw).unwrap())
    }

    #[test]
    fn test_empty_path_is_invalid() {
        for raw in ["", "\t ", "   "] {
            let err = normalize_str(raw).unwrap_err();
            assert!(matches!(err, Error::InvalidPath { .. }), "{raw:?}");
        }
    }

    #[test]
    fn test_current_directory_is_dot() {
        assert_eq!(full("./"), ".");
        assert_eq!(full("."), ".");
        assert_eq!(full(".\\"), ".");
    }

    #[test]
    fn test_separators_are_unified() {
        assert_eq!(full("shaders\\basic"), "shaders/basic");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(full(" shaders/basic "), "shaders/basic");
        assert_eq!(full("my awesome shaders/basic"), "my awesome shaders/basic");
    }

    #[test]
    fn test_trailing_slashes_removed() {
        let cases = [
            ("/Hello/World/", "/Hello/World"),
            ("\\Hello\\World\\", "/Hello/World"),
            ("file.txt/", "file.txt"),
            ("Temp\\file.txt\\", "Temp/file.txt"),
            ("http://www.foo.bar/", "http://www.foo.bar"),
            ("http://www.foo.bar/test/page.html/", "http://www.foo.bar/test/page.html"),
        ];
        for (raw, expected) in cases {
            assert_eq!(full(raw), expected, "{raw}");
        }
    }

    #[test]
    fn test_single_slash_is_kept() {
        assert_eq!(full("/"), "/");
        assert_eq!(full("\\"), "/");
        assert_eq!(full("//"), "/");
    }

    #[test]
    fn test_relative_prefix_removed() {
        let cases = [
            ("./Hello/World/", "Hello/World"),
            (".\\Hello/World/", "Hello/World"),
            ("./file.txt", "file.txt"),
            ("././Temp/file.txt", "Temp/file.txt"),
        ];
        for (raw, expected) in cases {
            assert_eq!(full(raw), expected, "{raw}");
        }
    }

    #[test]
    fn test_drive_detection() {
        assert_eq!(drive_prefix("c:/a"), Some("c:"));
        assert_eq!(drive_prefix("C:"), Some("C:"));
        assert_eq!(drive_prefix("c:a"), None);
        assert_eq!(drive_prefix("1:/a"), None);
        assert!(looks_absolute("/a"));
        assert!(looks_absolute("c:/a"));
        assert!(!looks_absolute("a/b"));
        assert!(!looks_absolute("C::/a"));
    }

    #[test]
    fn test_collapse_directory_paths() {
        let cases = [
            ("hello/temp/test/../../world", "hello/world"),
            ("hello/temp/../temp2/../world", "hello/world"),
            ("/hello/temp/test/../../world", "/hello/world"),
            ("/hello/../../../../../../temp", "/temp"),
            (".", "."),
            ("/.", "/"),
            ("./a", "a"),
            ("./..", "."),
            ("a/..", "."),
            ("a/../..", "."),
            ("a/./b", "a/b"),
            ("/a/./b", "/a/b"),
            ("a/b/.", "a/b"),
            ("/a/b/.", "/a/b"),
            ("/./a/b", "/a/b"),
            ("c:/hello/temp/test/../../world", "c:/hello/world"),
            ("c:/../../../../../../temp", "c:/temp"),
            ("c:", "c:/"),
        ];
        for (raw, expected) in cases {
            assert_eq!(collapse_dir(raw), expected, "{raw}");
        }
    }

    #[test]
    fn test_collapse_file_paths() {
        let path = NormalizedPath::file("/a/b/c/../d/baz.txt").unwrap();
        assert_eq!(collapse(&path), "/a/b/d/baz.txt");
        let path = NormalizedPath::file("c:/a/b/c/../d/baz.txt").unwrap();
        assert_eq!(collapse(&path), "c:/a/b/d/baz.txt");
    }

    #[test]
    fn test_collapse_explicit_absolute_keeps_root() {
        for (raw, expected) in [("a/..", "/"), ("a/b/../c", "/a/c"), ("..", "/")] {
            let path =
                NormalizedPath::new(PathType::Directory, raw, PathKind::Absolute, Provider::Absent)
                    .unwrap();
            assert_eq!(path.root().full_path(), "/");
            assert_eq!(collapse(&path), expected, "{raw}");
        }
    }

    #[test]
    fn test_normalize_operation_applies_provider_rules() {
        let path = normalize("/a", PathKind::RelativeOrAbsolute, Provider::Absent).unwrap();
        assert_eq!(path.provider(), &Provider::Default);

        let err = normalize("a", PathKind::RelativeOrAbsolute, Provider::Named("x".into()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidProvider { .. }));
    }

    // Property-based tests
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn literal_strategy() -> impl Strategy<Value = String> {
            (
                prop_oneof![Just(""), Just("/"), Just("./"), Just("c:/"), Just("\\")],
                prop::collection::vec(
                    prop_oneof![
                        Just(".".to_string()),
                        Just("..".to_string()),
                        Just(String::new()),
                        "[a-zA-Z0-9_-]{1,8}".prop_map(|s| s),
                    ],
                    1..=6,
                ),
                prop_oneof![Just("/"), Just("\\"), Just("")],
                prop_oneof![Just(""), Just(" "), Just("/")],
            )
                .prop_map(|(prefix, parts, sep, suffix)| {
                    format!("{prefix}{}{suffix}", parts.join(sep))
                })
                .prop_filter("non-empty literal", |s| !s.trim().is_empty())
        }

        proptest! {
            /// Normalizing a normalized path changes nothing
            #[test]
            fn normalize_idempotent(raw in literal_strategy()) {
                let once = NormalizedPath::directory(&raw).unwrap();
                let twice = NormalizedPath::directory(once.full_path()).unwrap();
                prop_assert_eq!(&once, &twice);
                prop_assert_eq!(once.is_relative(), twice.is_relative());
            }

            /// Collapsing twice is the same as collapsing once
            #[test]
            fn collapse_idempotent(raw in literal_strategy()) {
                let once = collapse_dir(&raw);
                let twice = collapse_dir(&once);
                prop_assert_eq!(once, twice);
            }

            /// Collapsed paths keep their root and contain no dot segments
            #[test]
            fn collapse_stays_under_root(raw in literal_strategy()) {
                let path = NormalizedPath::directory(&raw).unwrap();
                let collapsed = collapse(&path);
                let root = path.root();
                if path.is_absolute() {
                    prop_assert!(collapsed.starts_with(root.full_path()));
                }
                for segment in collapsed.split('/') {
                    prop_assert_ne!(segment, "..");
                }
            }
        }
    }
}
