//! Property-based tests for validation error rendering.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::collections::BTreeMap;

use proptest::prelude::*;

use gondor_cli::domain::error::{FieldErrors, NON_FIELD_ERRORS};

fn field_map() -> impl Strategy<Value = BTreeMap<String, Vec<String>>> {
    let field = prop_oneof![Just(NON_FIELD_ERRORS.to_string()), "[a-z_]{1,12}"];
    prop::collection::btree_map(field, prop::collection::vec("[a-zA-Z ]{1,30}", 1..4), 1..5)
}

proptest! {
    /// One rendered message per (field, message) pair.
    #[test]
    fn prop_one_message_per_pair(map in field_map()) {
        let body = serde_json::to_vec(&map).expect("serialize");
        let errors = FieldErrors::from_body(&body).expect("well-formed body");
        let pairs: usize = map.values().map(Vec::len).sum();
        prop_assert_eq!(errors.messages().len(), pairs);
    }

    /// Non-field messages never carry a field prefix; others always do.
    #[test]
    fn prop_prefix_only_for_named_fields(map in field_map()) {
        let body = serde_json::to_vec(&map).expect("serialize");
        let messages = FieldErrors::from_body(&body).expect("well-formed body").messages();
        let mut expected: Vec<String> = Vec::new();
        for (field, msgs) in &map {
            for msg in msgs {
                if field == NON_FIELD_ERRORS {
                    expected.push(msg.clone());
                } else {
                    expected.push(format!("{field}: {msg}"));
                }
            }
        }
        prop_assert_eq!(messages, expected);
    }

    /// The array form decodes to the same errors as its first element.
    #[test]
    fn prop_array_form_matches_first_element(map in field_map(), extra in field_map()) {
        let plain = serde_json::to_vec(&map).expect("serialize");
        let wrapped = serde_json::to_vec(&(map.clone(), extra)).expect("serialize");
        prop_assert_eq!(
            FieldErrors::from_body(&plain).expect("plain"),
            FieldErrors::from_body(&wrapped).expect("wrapped")
        );
    }

    /// A single pair renders without the list header.
    #[test]
    fn prop_single_pair_renders_bare(field in "[a-z]{1,8}", msg in "[a-z ]{1,20}") {
        let map = BTreeMap::from([(field.clone(), vec![msg.clone()])]);
        let body = serde_json::to_vec(&map).expect("serialize");
        let rendered = FieldErrors::from_body(&body).expect("body").to_string();
        prop_assert_eq!(rendered, format!("{field}: {msg}"));
    }
}
