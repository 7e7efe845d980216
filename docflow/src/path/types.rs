//! Core types for virtual path handling.
//!
//! A [`NormalizedPath`] is a purely syntactic value: a provider tag plus a
//! normalized `/`-separated string. Directory and file paths share one
//! representation and are told apart by their [`PathType`] tag.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

use super::normalize::{self, collapse};
use super::provider::split_provider;

/// Whether a path names a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathType {
    /// A directory path.
    Directory,
    /// A file path.
    File,
}

/// How a path literal should be interpreted.
///
/// `RelativeOrAbsolute` detects the kind from the text: a leading `/` or a
/// drive prefix such as `c:/` marks the path absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// Always relative, whatever the text looks like.
    Relative,
    /// Always absolute.
    Absolute,
    /// Detected from the path text.
    RelativeOrAbsolute,
}

/// The virtual file source a path belongs to.
///
/// Relative paths are always `Absent`. Absolute paths are never `Absent`:
/// a missing provider becomes `Default`.
///
/// # Examples
///
/// ```
/// use docflow::path::Provider;
///
/// assert_eq!(Provider::from(Some("")), Provider::Default);
/// assert_eq!(Provider::from(Some("theme")), Provider::Named("theme".to_string()));
/// assert_eq!(Provider::from(None), Provider::Absent);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    /// No provider (relative paths only).
    #[default]
    Absent,
    /// The default provider, written as an empty name.
    Default,
    /// A named provider.
    Named(String),
}

impl Provider {
    /// Returns the provider name, `""` for the default provider and `None`
    /// when absent.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::Default => Some(""),
            Self::Named(name) => Some(name),
        }
    }

    /// Returns true unless the provider is `Absent`.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

impl From<Option<&str>> for Provider {
    fn from(value: Option<&str>) -> Self {
        match value {
            None => Self::Absent,
            Some("") => Self::Default,
            Some(name) => Self::Named(name.to_string()),
        }
    }
}

/// A normalized, provider-qualified virtual path.
///
/// Equality and hashing consider exactly the provider and the normalized
/// string, both case-sensitively. The directory/file tag does not take part.
///
/// # Examples
///
/// ```
/// use docflow::path::NormalizedPath;
///
/// let path = NormalizedPath::directory("./Hello/World/").unwrap();
/// assert_eq!(path.full_path(), "Hello/World");
/// assert_eq!(path.segments(), vec!["Hello", "World"]);
/// assert!(path.is_relative());
/// ```
#[derive(Debug, Clone)]
pub struct NormalizedPath {
    path_type: PathType,
    provider: Provider,
    full_path: String,
    relative: bool,
}

impl NormalizedPath {
    /// Creates a path from its parts.
    ///
    /// An absolute path with no provider, or with an empty name, gets
    /// [`Provider::Default`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `raw` is empty after trimming and
    /// [`Error::InvalidProvider`] if a provider is given for a relative path.
    pub fn new(path_type: PathType, raw: &str, kind: PathKind, provider: Provider) -> Result<Self> {
        let full_path = normalize::normalize_str(raw)?;
        let relative = match kind {
            PathKind::Relative => true,
            PathKind::Absolute => false,
            PathKind::RelativeOrAbsolute => !normalize::looks_absolute(&full_path),
        };

        let provider = if relative {
            if let Some(name) = provider.as_str() {
                return Err(Error::InvalidProvider {
                    provider: name.to_string(),
                    path: full_path,
                });
            }
            Provider::Absent
        } else {
            match provider {
                Provider::Named(name) if !name.is_empty() => Provider::Named(name),
                _ => Provider::Default,
            }
        };

        Ok(Self {
            path_type,
            provider,
            full_path,
            relative,
        })
    }

    /// Wraps text that is already a normalized relative path.
    pub(crate) fn relative_normalized(path_type: PathType, full_path: &str) -> Self {
        Self {
            path_type,
            provider: Provider::Absent,
            full_path: full_path.to_string(),
            relative: true,
        }
    }

    /// Creates a directory path, detecting relative/absolute from the text.
    ///
    /// # Errors
    ///
    /// Returns an error if the literal is empty.
    pub fn directory(raw: &str) -> Result<Self> {
        Self::new(PathType::Directory, raw, PathKind::RelativeOrAbsolute, Provider::Absent)
    }

    /// Creates a file path, detecting relative/absolute from the text.
    ///
    /// # Errors
    ///
    /// Returns an error if the literal is empty.
    pub fn file(raw: &str) -> Result<Self> {
        Self::new(PathType::File, raw, PathKind::RelativeOrAbsolute, Provider::Absent)
    }

    /// Parses a literal that may carry a `provider::` prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the path part is empty or a provider prefixes a
    /// relative path.
    ///
    /// # Examples
    ///
    /// ```
    /// use docflow::path::{NormalizedPath, PathType, Provider};
    ///
    /// let path = NormalizedPath::parse(PathType::File, "theme::/css/site.css").unwrap();
    /// assert_eq!(path.provider(), &Provider::Named("theme".to_string()));
    /// assert_eq!(path.full_path(), "/css/site.css");
    /// ```
    pub fn parse(path_type: PathType, literal: &str) -> Result<Self> {
        let (provider, rest) = split_provider(literal);
        Self::new(path_type, rest, PathKind::RelativeOrAbsolute, provider)
    }

    /// The directory or file tag.
    #[must_use]
    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    /// The provider of this path.
    #[must_use]
    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// The normalized path string.
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// The resolved kind (`Relative` or `Absolute`).
    #[must_use]
    pub fn kind(&self) -> PathKind {
        if self.relative {
            PathKind::Relative
        } else {
            PathKind::Absolute
        }
    }

    /// Returns true if the path is relative.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.relative
    }

    /// Returns true if the path is absolute.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        !self.relative
    }

    /// The non-empty `/`-separated components, in order.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.full_path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// The root of the path: `.` for relative paths, `/` or a drive prefix
    /// such as `c:/` for absolute ones.
    #[must_use]
    pub fn root(&self) -> NormalizedPath {
        let root = if self.relative {
            ".".to_string()
        } else {
            match normalize::drive_prefix(&self.full_path) {
                Some(drive) => format!("{drive}/"),
                None => "/".to_string(),
            }
        };
        Self {
            path_type: PathType::Directory,
            provider: self.provider.clone(),
            relative: self.relative,
            full_path: root,
        }
    }

    /// Resolves `.` and `..` segments into a new path of the same type.
    #[must_use]
    pub fn collapsed(&self) -> NormalizedPath {
        Self {
            full_path: collapse(self),
            ..self.clone()
        }
    }

    /// The last segment, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments().pop().filter(|s| !normalize::is_drive(s))
    }

    /// The file name of a file path.
    ///
    /// Returns `None` for directory paths.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        match self.path_type {
            PathType::File => self.name(),
            PathType::Directory => None,
        }
    }

    /// The extension of a file path including the leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use docflow::path::NormalizedPath;
    ///
    /// let path = NormalizedPath::file("posts/hello.md").unwrap();
    /// assert_eq!(path.extension(), Some(".md"));
    /// assert_eq!(path.file_name_without_extension(), Some("hello"));
    /// ```
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let dot = name.rfind('.')?;
        (dot > 0 && dot + 1 < name.len()).then(|| &name[dot..])
    }

    /// Returns true if the file path has an extension.
    #[must_use]
    pub fn has_extension(&self) -> bool {
        self.extension().is_some()
    }

    /// The file name without its extension.
    #[must_use]
    pub fn file_name_without_extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match self.extension() {
            Some(ext) => Some(&name[..name.len() - ext.len()]),
            None => Some(name),
        }
    }

    /// Replaces (or adds) the extension of a file path.
    ///
    /// `extension` may be given with or without the leading dot; an empty
    /// extension removes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for directory paths.
    pub fn change_extension(&self, extension: &str) -> Result<NormalizedPath> {
        if self.path_type != PathType::File {
            return Err(Error::InvalidPath {
                path: self.full_path.clone(),
                reason: "cannot change the extension of a directory path".to_string(),
            });
        }
        let current = self.extension().map_or(0, str::len);
        let stem = &self.full_path[..self.full_path.len() - current];
        let ext = extension.trim_start_matches('.');
        let full_path = if ext.is_empty() {
            stem.to_string()
        } else {
            format!("{stem}.{ext}")
        };
        Ok(Self {
            full_path,
            ..self.clone()
        })
    }

    /// The directory containing this path, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<NormalizedPath> {
        let idx = self.full_path.rfind('/')?;
        let parent = match &self.full_path[..idx] {
            "" => "/",
            parent => parent,
        };
        if parent == self.full_path {
            return None;
        }
        Some(Self {
            path_type: PathType::Directory,
            full_path: parent.to_string(),
            ..self.clone()
        })
    }

    /// Appends a relative path to this directory.
    ///
    /// An absolute `other` is returned unchanged; combining with a relative
    /// path keeps this path's provider and kind and takes `other`'s type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `self` is a file path.
    ///
    /// # Examples
    ///
    /// ```
    /// use docflow::path::NormalizedPath;
    ///
    /// let dir = NormalizedPath::directory("/site").unwrap();
    /// let file = NormalizedPath::file("posts/a.md").unwrap();
    /// assert_eq!(dir.combine(&file).unwrap().full_path(), "/site/posts/a.md");
    /// ```
    pub fn combine(&self, other: &NormalizedPath) -> Result<NormalizedPath> {
        if self.path_type != PathType::Directory {
            return Err(Error::InvalidPath {
                path: self.full_path.clone(),
                reason: "only directory paths can be combined".to_string(),
            });
        }
        if other.is_absolute() {
            return Ok(other.clone());
        }
        let joined = if self.full_path == "." {
            other.full_path.clone()
        } else if other.full_path == "." {
            self.full_path.clone()
        } else if self.full_path.ends_with('/') {
            format!("{}{}", self.full_path, other.full_path)
        } else {
            format!("{}/{}", self.full_path, other.full_path)
        };
        let kind = if self.relative {
            PathKind::Relative
        } else {
            PathKind::Absolute
        };
        Self::new(other.path_type, &joined, kind, self.provider.clone())
    }

    /// Converts to a filesystem path for the default provider.
    #[must_use]
    pub fn to_std_path(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.full_path)
    }
}

impl PartialEq for NormalizedPath {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider && self.full_path == other.full_path
    }
}

impl Eq for NormalizedPath {}

impl Hash for NormalizedPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.full_path.hash(state);
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider {
            Provider::Named(name) => write!(f, "{name}::{}", self.full_path),
            Provider::Absent | Provider::Default => write!(f, "{}", self.full_path),
        }
    }
}
