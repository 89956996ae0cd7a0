//! Property-based tests for key-value parsing and document ordering.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use testmeta::core::keyvalue::parse_key_values;
use testmeta::core::types::MetaMap;
use testmeta::xml::{parse_document, to_node, to_pretty_xml};

/// Strategy for os-release style keys.
fn key() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,15}"
}

/// Strategy for values without quotes, newlines, or edge whitespace.
fn value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ._/:=()-]{0,30}[a-zA-Z0-9)]"
}

proptest! {
    #[test]
    fn parsed_values_are_trimmed_and_unquoted(
        k in key(),
        v in value(),
        quoted in any::<bool>(),
        pad in "[ \t]{0,3}",
    ) {
        let line = if quoted {
            format!("{pad}{k}{pad}={pad}\"{v}\"{pad}\n")
        } else {
            format!("{pad}{k}{pad}={pad}{v}{pad}\n")
        };

        let data = parse_key_values(&line).unwrap();
        prop_assert_eq!(data.get_str(&k.to_lowercase()), Some(v.as_str()));
    }

    #[test]
    fn every_key_is_recovered_in_file_order(
        entries in prop::collection::vec((key(), value()), 1..20)
    ) {
        let contents: String = entries
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"\n", k, v))
            .collect();
        let data = parse_key_values(&contents).unwrap();

        // Expected: first-seen order, last value wins.
        let mut expected = MetaMap::new();
        for (k, v) in &entries {
            expected.insert(k.to_lowercase(), v.as_str());
        }
        prop_assert_eq!(data, expected);
    }

    #[test]
    fn config_xml_preserves_order_and_values(
        entries in prop::collection::vec((key(), value()), 1..10)
    ) {
        let config: MetaMap = entries.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let xml = to_pretty_xml(&to_node("config", &config)).unwrap();
        let root = parse_document(&xml).unwrap();

        prop_assert_eq!(root.children().len(), config.len());
        for ((k, v), node) in config.iter().zip(root.children()) {
            prop_assert_eq!(node.tag(), "variable");
            prop_assert_eq!(node.name(), Some(k));
            prop_assert_eq!(node.text(), v.as_str());
        }
    }
}
