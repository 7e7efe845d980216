//! Immutable documents and their content.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::metadata::{MetaValue, Metadata};
use crate::path::NormalizedPath;

/// The payload of a document.
///
/// File-backed content is read lazily: requesting a reader is the first
/// point at which the backing file is touched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    /// No content.
    #[default]
    Empty,
    /// In-memory text.
    Text(Arc<str>),
    /// In-memory bytes.
    Bytes(Arc<[u8]>),
    /// A file on disk, read on access.
    File(PathBuf),
}

impl Content {
    /// Opens a reader over the content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentUnavailable`] if a backing file can no longer
    /// be opened.
    pub fn open(&self) -> Result<Box<dyn Read + Send + '_>> {
        match self {
            Self::Empty => Ok(Box::new(io::empty())),
            Self::Text(text) => Ok(Box::new(Cursor::new(text.as_bytes()))),
            Self::Bytes(bytes) => Ok(Box::new(Cursor::new(&bytes[..]))),
            Self::File(path) => {
                let file = File::open(path).map_err(|source| Error::ContentUnavailable {
                    source_path: path.clone(),
                    source,
                })?;
                Ok(Box::new(file))
            }
        }
    }

    /// Reads the whole content into memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentUnavailable`] if a backing file cannot be read.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Empty => Ok(Vec::new()),
            Self::Text(text) => Ok(text.as_bytes().to_vec()),
            Self::Bytes(bytes) => Ok(bytes.to_vec()),
            Self::File(path) => std::fs::read(path).map_err(|source| Error::ContentUnavailable {
                source_path: path.clone(),
                source,
            }),
        }
    }

    /// Reads the whole content as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentUnavailable`] if a backing file cannot be read
    /// and [`Error::Io`] if the bytes are not valid UTF-8.
    pub fn read_string(&self) -> Result<String> {
        if let Self::Text(text) = self {
            return Ok(text.to_string());
        }
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}

impl From<Vec<u8>> for Content {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value.into())
    }
}

struct DocumentInner {
    path: NormalizedPath,
    metadata: Metadata,
    content: Content,
}

/// An immutable document: a path, layered metadata and content.
///
/// Cloning is cheap and clones share everything. Every `with_*` method
/// returns a new document and leaves the receiver untouched.
///
/// # Examples
///
/// ```
/// use docflow::{Document, NormalizedPath};
///
/// let path = NormalizedPath::file("posts/hello.md").unwrap();
/// let doc = Document::new(path, "# Hello");
/// let titled = doc.with_metadata([("Title", "Hello")]);
///
/// assert_eq!(titled.metadata().get_text("Title"), Some("Hello"));
/// assert!(doc.metadata().is_empty());
/// assert_eq!(titled.read_string().unwrap(), "# Hello");
/// ```
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Document {
    /// Creates a document with empty metadata.
    pub fn new(path: NormalizedPath, content: impl Into<Content>) -> Self {
        Self::with_parts(path, Metadata::new(), content.into())
    }

    /// Creates a document from all of its parts.
    #[must_use]
    pub fn with_parts(path: NormalizedPath, metadata: Metadata, content: Content) -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                path,
                metadata,
                content,
            }),
        }
    }

    /// Derives a document from zero or more parents.
    ///
    /// The metadata chain continues from the first parent. Later parents
    /// contribute only keys the earlier ones lack.
    pub fn from_parents(
        parents: &[Document],
        path: NormalizedPath,
        content: impl Into<Content>,
    ) -> Self {
        let mut metadata = parents
            .first()
            .map(|p| p.metadata().clone())
            .unwrap_or_default();
        for parent in parents.iter().skip(1) {
            let missing: Vec<(String, MetaValue)> = parent
                .metadata()
                .iter()
                .into_iter()
                .filter(|(key, _)| !metadata.contains_key(key))
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();
            metadata = metadata.layer(missing);
        }
        Self::with_parts(path, metadata, content.into())
    }

    /// The document's path.
    #[must_use]
    pub fn path(&self) -> &NormalizedPath {
        &self.inner.path
    }

    /// The document's metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.inner.metadata
    }

    /// Shorthand for `metadata().get(key)`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.inner.metadata.get(key)
    }

    /// The document's content.
    #[must_use]
    pub fn content(&self) -> &Content {
        &self.inner.content
    }

    /// Opens a reader over the content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentUnavailable`] if the backing file is gone.
    pub fn open_content(&self) -> Result<Box<dyn Read + Send + '_>> {
        self.inner.content.open()
    }

    /// Reads the content into memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentUnavailable`] if the backing file is gone.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        self.inner.content.read_bytes()
    }

    /// Reads the content as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be read or is not UTF-8.
    pub fn read_string(&self) -> Result<String> {
        self.inner.content.read_string()
    }

    /// Returns a document whose metadata sees `overrides` first.
    #[must_use]
    pub fn with_metadata<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetaValue>,
    {
        Self::with_parts(
            self.inner.path.clone(),
            self.inner.metadata.layer(overrides),
            self.inner.content.clone(),
        )
    }

    /// Returns a document with replaced content.
    #[must_use]
    pub fn with_content(&self, content: impl Into<Content>) -> Self {
        Self::with_parts(
            self.inner.path.clone(),
            self.inner.metadata.clone(),
            content.into(),
        )
    }

    /// Returns a document with a replaced path.
    #[must_use]
    pub fn with_path(&self, path: NormalizedPath) -> Self {
        Self::with_parts(
            path,
            self.inner.metadata.clone(),
            self.inner.content.clone(),
        )
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.path == other.inner.path
                && self.inner.content == other.inner.content
                && self.inner.metadata == other.inner.metadata)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.inner.path)
            .field("metadata", &self.inner.metadata)
            .field("content", &self.inner.content)
            .finish()
    }
}
