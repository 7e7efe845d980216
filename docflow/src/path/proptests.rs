//! Property-based tests for path equality and provider handling.
//!
//! Note: The normalize module already has property tests for normalization
//! and collapsing. This module focuses on equality, hashing and providers.

use super::{split_provider, NormalizedPath, PathKind, PathType, Provider};
use crate::error::Error;
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of(path: &NormalizedPath) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    hasher.finish()
}

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,12}"
}

fn relative_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..6).prop_map(|parts| parts.join("/"))
}

fn absolute_strategy() -> impl Strategy<Value = String> {
    relative_strategy().prop_map(|p| format!("/{p}"))
}

fn provider_strategy() -> impl Strategy<Value = String> {
    "[a-z]{0,8}"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Equal paths always hash equally
    #[test]
    fn equal_paths_hash_equal(raw in absolute_strategy(), provider in provider_strategy()) {
        let a = NormalizedPath::new(PathType::File, &raw, PathKind::RelativeOrAbsolute, Provider::from(Some(provider.as_str()))).unwrap();
        let b = NormalizedPath::new(PathType::Directory, &format!(" {raw}/"), PathKind::RelativeOrAbsolute, Provider::from(Some(provider.as_str()))).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    // Changing the case of a path always breaks equality
    #[test]
    fn case_change_breaks_equality(raw in relative_strategy()) {
        let upper = raw.to_uppercase();
        prop_assume!(upper != raw);
        let a = NormalizedPath::file(&raw).unwrap();
        let b = NormalizedPath::file(&upper).unwrap();
        prop_assert_ne!(a, b);
    }

    // Changing the case of a provider always breaks equality
    #[test]
    fn provider_case_breaks_equality(raw in absolute_strategy(), provider in "[a-z]{1,8}") {
        let upper = provider.to_uppercase();
        let a = NormalizedPath::new(PathType::File, &raw, PathKind::Absolute, Provider::Named(provider)).unwrap();
        let b = NormalizedPath::new(PathType::File, &raw, PathKind::Absolute, Provider::Named(upper)).unwrap();
        prop_assert_ne!(a, b);
    }

    // Relative paths reject any present provider
    #[test]
    fn relative_rejects_provider(raw in relative_strategy(), provider in provider_strategy()) {
        let result = NormalizedPath::new(PathType::File, &raw, PathKind::Relative, Provider::from(Some(provider.as_str())));
        prop_assert!(matches!(result, Err(Error::InvalidProvider { .. })));
    }

    // Absolute paths without a provider get the default provider
    #[test]
    fn absolute_defaults_provider(raw in absolute_strategy()) {
        let path = NormalizedPath::new(PathType::File, &raw, PathKind::RelativeOrAbsolute, Provider::Absent).unwrap();
        prop_assert_eq!(path.provider(), &Provider::Default);
    }

    // Splitting a provider literal round-trips the scheme and remainder
    #[test]
    fn split_provider_preserves_remainder(provider in "[a-z]{1,8}", raw in absolute_strategy()) {
        let literal = format!("{provider}::{raw}");
        let (parsed, rest) = split_provider(&literal);
        prop_assert_eq!(parsed, Provider::Named(provider));
        prop_assert_eq!(rest, raw.as_str());
    }
}
