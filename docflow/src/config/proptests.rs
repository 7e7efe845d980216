//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::{Config, FailurePolicy};
use super::settings::EngineSettings;
use proptest::prelude::*;

fn folder_strategy() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z]{1,8}(/[a-z]{1,8}){0,2}", "/[a-z]{1,8}(/[a-z]{1,8}){0,2}",]
}

fn policy_strategy() -> impl Strategy<Value = FailurePolicy> {
    prop_oneof![Just(FailurePolicy::BlockDependents), Just(FailurePolicy::Continue)]
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(folder_strategy()),
        prop::option::of(folder_strategy()),
        prop::option::of(policy_strategy()),
        prop::option::of(any::<bool>()),
        prop::option::of(1usize..128),
    )
        .prop_map(|(input, output, failure_policy, parallel, max_nesting_depth)| Config {
            input,
            output,
            failure_policy,
            parallel,
            max_nesting_depth,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Higher precedence values win, lower ones survive where high is None
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(&result.input, if high.input.is_some() { &high.input } else { &low.input });
        prop_assert_eq!(&result.output, if high.output.is_some() { &high.output } else { &low.output });
        prop_assert_eq!(result.failure_policy, high.failure_policy.or(low.failure_policy));
        prop_assert_eq!(result.parallel, high.parallel.or(low.parallel));
        prop_assert_eq!(result.max_nesting_depth, high.max_nesting_depth.or(low.max_nesting_depth));
    }

    // Merging a config into itself changes nothing
    #[test]
    fn config_merge_idempotent(config in config_strategy()) {
        let mut result = config.clone();
        ConfigMerger::merge_into(&mut result, &config);
        prop_assert_eq!(result, config);
    }

    // Merging an empty config is the identity
    #[test]
    fn config_merge_empty_identity(config in config_strategy()) {
        let mut result = config.clone();
        ConfigMerger::merge_into(&mut result, &Config::default());
        prop_assert_eq!(result, config);
    }

    // Generated configs always resolve; with the default root folders keep their text
    #[test]
    fn settings_resolve_relative_folders(config in config_strategy()) {
        let settings = EngineSettings::from_config(&config).unwrap();
        if let Some(ref input) = config.input {
            prop_assert_eq!(settings.input.full_path(), input.as_str());
            prop_assert_eq!(settings.input.is_absolute(), input.starts_with('/'));
        }
    }
}
