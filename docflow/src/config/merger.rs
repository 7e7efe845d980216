//! Configuration merging and precedence handling.
//!
//! Scalar fields are overwritten by higher-precedence sources; the
//! `metadata` map is merged key by key.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use docflow::config::{Config, ConfigMerger};
///
/// let low = Config { output: Some("low".to_string()), ..Default::default() };
/// let high = Config { output: Some("high".to_string()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.output, Some("high".to_string()));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Metadata: key-wise union, source values win
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.root.is_some() {
            target.root.clone_from(&source.root);
        }

        if source.input.is_some() {
            target.input.clone_from(&source.input);
        }

        if source.output.is_some() {
            target.output.clone_from(&source.output);
        }

        if source.failure_policy.is_some() {
            target.failure_policy = source.failure_policy;
        }

        if source.parallel.is_some() {
            target.parallel = source.parallel;
        }

        if source.max_parallelism.is_some() {
            target.max_parallelism = source.max_parallelism;
        }

        if source.max_nesting_depth.is_some() {
            target.max_nesting_depth = source.max_nesting_depth;
        }

        if source.log_mode.is_some() {
            target.log_mode.clone_from(&source.log_mode);
        }

        if let Some(ref source_metadata) = source.metadata {
            match &mut target.metadata {
                Some(target_metadata) => {
                    for (key, value) in source_metadata {
                        target_metadata.insert(key.clone(), value.clone());
                    }
                }
                None => target.metadata.clone_from(&source.metadata),
            }
        }
    }
}
