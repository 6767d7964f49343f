//! Property-based tests for plugin reference parsing

use bearded_core::domain::catalog::PluginRef;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_plugin_ref_display_parses_back(
        name in "[a-z][a-z0-9_-]{0,15}",
        version in "[0-9]{1,3}(\\.[0-9]{1,3}){0,2}"
    ) {
        let reference = format!("{}:{}", name, version);
        let parsed = PluginRef::parse(&reference).unwrap();

        prop_assert_eq!(&parsed.name, &name);
        prop_assert_eq!(&parsed.version, &version);
        prop_assert_eq!(parsed.to_string(), reference);
    }

    #[test]
    fn test_plugin_ref_without_separator_is_rejected(name in "[a-z0-9._-]{0,24}") {
        prop_assert!(PluginRef::parse(&name).is_err());
    }

    #[test]
    fn test_plugin_ref_with_extra_components_is_rejected(
        a in "[a-z]{1,8}",
        b in "[0-9]{1,3}",
        c in "[a-z0-9]{0,8}"
    ) {
        let reference = format!("{}:{}:{}", a, b, c);
        prop_assert!(PluginRef::parse(&reference).is_err());
    }

    #[test]
    fn test_plugin_ref_with_empty_side_is_rejected(side in "[a-z0-9.]{1,12}") {
        let leading = format!(":{}", side);
        let trailing = format!("{}:", side);
        prop_assert!(PluginRef::parse(&leading).is_err());
        prop_assert!(PluginRef::parse(&trailing).is_err());
    }
}
