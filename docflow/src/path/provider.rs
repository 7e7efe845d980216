//! Provider prefix parsing for path literals.
//!
//! A literal may be written as `scheme::rest`. A leading `::` selects the
//! default provider explicitly; no `::` at all leaves the provider absent.
//! Only the first `::` is treated as the delimiter, so drive paths such as
//! `c:/a` and remainders such as `C::\a\b` pass through untouched.

use super::types::Provider;

/// The provider delimiter in a path literal.
pub const PROVIDER_DELIMITER: &str = "::";

/// Split a literal into its provider and the verbatim remainder.
///
/// The remainder is not normalized.
///
/// # Examples
///
/// ```
/// use docflow::path::{split_provider, Provider};
///
/// assert_eq!(
///     split_provider("provider::/a/b"),
///     (Provider::Named("provider".to_string()), "/a/b")
/// );
/// assert_eq!(split_provider("/a/b"), (Provider::Absent, "/a/b"));
/// assert_eq!(split_provider("::/a/b"), (Provider::Default, "/a/b"));
/// assert_eq!(split_provider("C:/a/b"), (Provider::Absent, "C:/a/b"));
/// ```
#[must_use]
pub fn split_provider(literal: &str) -> (Provider, &str) {
    match literal.find(PROVIDER_DELIMITER) {
        Some(idx) => {
            let scheme = &literal[..idx];
            let rest = &literal[idx + PROVIDER_DELIMITER.len()..];
            (Provider::from(Some(scheme)), rest)
        }
        None => (Provider::Absent, literal),
    }
}
