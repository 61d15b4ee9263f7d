//! Property-based tests for tag ordering.

#[cfg(test)]
mod proptest_tests {
    use crate::version::{compare_tags, parse_tag_version, TagSet};
    use proptest::prelude::*;
    use std::cmp::Ordering;

    fn version_tag() -> impl Strategy<Value = String> {
        (0u64..30, 0u64..30, 0u64..30, any::<bool>()).prop_map(|(major, minor, patch, prefixed)| {
            format!("{}{}.{}.{}", if prefixed { "v" } else { "" }, major, minor, patch)
        })
    }

    fn any_tag() -> impl Strategy<Value = String> {
        prop_oneof![version_tag(), "[a-z][a-z0-9-]{0,8}"]
    }

    proptest! {
        /// Property: the latest tag is not exceeded by any other tag
        #[test]
        fn latest_is_maximal(tags in prop::collection::vec(any_tag(), 1..20)) {
            let set = TagSet::new(tags.clone());
            let latest = set.latest().unwrap();
            for tag in &tags {
                prop_assert_ne!(compare_tags(tag, latest), Ordering::Greater);
            }
        }

        /// Property: the order does not depend on the input order
        #[test]
        fn order_is_input_independent(tags in prop::collection::vec(any_tag(), 0..20)) {
            let mut reversed = tags.clone();
            reversed.reverse();
            prop_assert_eq!(TagSet::new(tags), TagSet::new(reversed));
        }

        /// Property: a version tag always beats a non-version tag
        #[test]
        fn versions_outrank_names(version in version_tag(), name in "[a-z][a-z-]{0,8}") {
            prop_assert_eq!(compare_tags(&version, &name), Ordering::Greater);
            let set = TagSet::new([name, version.clone()]);
            prop_assert_eq!(set.latest(), Some(version.as_str()));
        }

        /// Property: tag order agrees with numeric version order
        #[test]
        fn order_follows_numeric_components(a in version_tag(), b in version_tag()) {
            let va = parse_tag_version(&a).unwrap();
            let vb = parse_tag_version(&b).unwrap();
            if va != vb {
                prop_assert_eq!(compare_tags(&a, &b), va.cmp(&vb));
            }
        }
    }
}
