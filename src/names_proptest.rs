//! Property-based tests for name resolution.
//!
//! These tests use proptest to generate random name lists and verify that
//! the resolved build list is always sorted, unique and free of excluded
//! names.

#[cfg(test)]
mod proptest_tests {
    use crate::names::resolve_names;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,12}"
    }

    proptest! {
        /// Property: the resolved list is strictly increasing (sorted, no duplicates)
        #[test]
        fn resolved_is_strictly_sorted(
            raw in prop::collection::vec(name(), 0..32),
            excluded in prop::collection::btree_set(name(), 0..4),
        ) {
            let resolved = resolve_names(&raw, &excluded);
            for pair in resolved.windows(2) {
                prop_assert!(pair[0] < pair[1], "{:?} not strictly sorted", resolved);
            }
        }

        /// Property: no excluded name survives resolution
        #[test]
        fn resolved_never_contains_excluded(
            raw in prop::collection::vec(name(), 0..32),
            excluded in prop::collection::btree_set(name(), 0..8),
        ) {
            let resolved = resolve_names(&raw, &excluded);
            for name in &resolved {
                prop_assert!(!excluded.contains(name));
            }
        }

        /// Property: every non-excluded input name is kept
        #[test]
        fn resolved_keeps_every_allowed_name(
            raw in prop::collection::vec(name(), 0..32),
            excluded in prop::collection::btree_set(name(), 0..4),
        ) {
            let resolved: BTreeSet<String> = resolve_names(&raw, &excluded).into_iter().collect();
            for name in &raw {
                prop_assert_eq!(resolved.contains(name), !excluded.contains(name));
            }
        }

        /// Property: input order does not affect the result
        #[test]
        fn resolution_ignores_input_order(
            raw in prop::collection::vec(name(), 0..32),
        ) {
            let mut reversed = raw.clone();
            reversed.reverse();
            let excluded = BTreeSet::new();
            prop_assert_eq!(resolve_names(&raw, &excluded), resolve_names(&reversed, &excluded));
        }
    }
}
