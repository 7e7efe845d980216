//! Virtual path addressing.
//!
//! Every document and every module names content through a
//! [`NormalizedPath`]: a provider-qualified, normalized `/`-separated path.
//! All operations are syntactic; no filesystem is consulted.
//!
//! # Key Concepts
//!
//! ## Normalization
//!
//! Construction normalizes the literal:
//! - `\` separators become `/`
//! - Surrounding whitespace is trimmed
//! - Trailing `/` is removed, except for the bare root `/`
//! - A leading `./` is stripped; a path that reduces to nothing becomes `.`
//!
//! ## Providers
//!
//! A [`Provider`] names the virtual file source an absolute path belongs to.
//! Relative paths never carry one. Literals can select a provider with a
//! `scheme::` prefix:
//!
//! ```
//! use docflow::path::{NormalizedPath, PathType, Provider};
//!
//! let themed = NormalizedPath::parse(PathType::File, "theme::/css/site.css").unwrap();
//! assert_eq!(themed.provider(), &Provider::Named("theme".to_string()));
//!
//! let plain = NormalizedPath::parse(PathType::File, "/css/site.css").unwrap();
//! assert_eq!(plain.provider(), &Provider::Default);
//! assert_ne!(themed, plain);
//! ```
//!
//! ## Collapsing
//!
//! [`collapse`] resolves `.` and `..` segments and never climbs above the
//! root:
//!
//! ```
//! use docflow::path::{collapse, NormalizedPath};
//!
//! let path = NormalizedPath::directory("/hello/../../../../temp").unwrap();
//! assert_eq!(collapse(&path), "/temp");
//! ```

pub mod normalize;
mod provider;
mod types;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types
pub use normalize::{collapse, normalize};
pub use provider::{split_provider, PROVIDER_DELIMITER};
pub use types::{NormalizedPath, PathKind, PathType, Provider};
