//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{is_inside_project, normalize_path, url_basename};
    use proptest::prelude::*;

    // ============================================================================
    // normalize_path property tests
    // ============================================================================

    proptest! {
        /// Property: normalizing twice gives the same result as normalizing once
        #[test]
        fn normalize_path_is_idempotent(input in "[./a-z]{0,20}") {
            let once = normalize_path(&input);
            let twice = normalize_path(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: a normalized path never ends with a slash
        #[test]
        fn normalize_path_has_no_trailing_slash(input in "[./a-z]{0,20}") {
            let result = normalize_path(&input);
            prop_assert!(!result.ends_with('/'));
        }

        /// Property: a normalized path never starts with "./"
        #[test]
        fn normalize_path_has_no_leading_dot_slash(input in "[./a-z]{0,20}") {
            let result = normalize_path(&input);
            prop_assert!(!result.starts_with("./"));
        }

        /// Property: a path that climbs out through ".." is never inside the project
        #[test]
        fn parent_components_leave_the_project(
            head in "[a-z]{1,5}(/[a-z]{1,5}){0,2}",
            tail in "[a-z]{0,5}",
        ) {
            let path = format!("{}/../../{}", head, tail);
            prop_assert!(!is_inside_project(&path));
            let parent_path = format!("../{}", head);
            prop_assert!(!is_inside_project(&parent_path));
        }
    }

    // ============================================================================
    // url_basename property tests
    // ============================================================================

    proptest! {
        /// Property: the basename of an https URL is its last segment minus ".git"
        #[test]
        fn url_basename_https_last_segment(
            owner in "[a-z][a-z0-9-]{0,10}",
            name in "[a-z][a-z0-9_-]{0,15}",
            suffix in prop::bool::ANY,
        ) {
            let url = format!(
                "https://example.com/{}/{}{}",
                owner,
                name,
                if suffix { ".git" } else { "" }
            );
            prop_assert_eq!(url_basename(&url), Some(name));
        }

        /// Property: scp-like and https forms of the same repo agree
        #[test]
        fn url_basename_scp_matches_https(
            owner in "[a-z][a-z0-9-]{0,10}",
            name in "[a-z][a-z0-9_-]{0,15}",
        ) {
            let https = format!("https://example.com/{}/{}.git", owner, name);
            let scp = format!("git@example.com:{}/{}.git", owner, name);
            prop_assert_eq!(url_basename(&https), url_basename(&scp));
        }

        /// Property: a basename never contains a path separator
        #[test]
        fn url_basename_has_no_separator(input in "(git@|https://|file:///)[a-z/:.]{0,30}") {
            if let Some(name) = url_basename(&input) {
                prop_assert!(!name.contains('/'));
                prop_assert!(!name.is_empty());
            }
        }
    }
}
