//! Property-based tests for configuration resolution.

use std::collections::HashSet;

use proptest::prelude::*;

use super::collector::CollectorConfigBuilder;
use super::store::{ConfigStore, StoreState};
use crate::port::MockPortProbe;

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("camA".to_string()), Just("camB".to_string()), "[a-z]{1,6}"]
}

// One object entry as YAML; fields are independently present or absent.
fn object_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of(name_strategy()),
        prop::option::of(-10i64..70000),
        prop::option::of(prop_oneof![
            Just("collect_periodically"),
            Just("bogus"),
            Just("3")
        ]),
        prop::option::of(prop_oneof![
            Just("SRT_SOURCE"),
            Just("blacklist"),
            Just("greylist")
        ]),
    )
        .prop_map(|(name, port, mode, filter)| {
            let mut entry = String::from("  - ");
            let mut fields = Vec::new();
            if let Some(name) = name {
                fields.push(format!("name: {name}"));
            }
            if let Some(port) = port {
                fields.push(format!("port: {port}"));
            }
            if mode.is_some() || filter.is_some() {
                let mut collector = String::from("collector:");
                if let Some(mode) = mode {
                    collector.push_str(&format!("\n      mode: {mode}"));
                }
                if let Some(filter) = filter {
                    collector.push_str(&format!("\n      filterMode: {filter}"));
                }
                fields.push(collector);
            }
            if fields.is_empty() {
                fields.push("ip: 127.0.0.1".to_string());
            }
            entry.push_str(&fields.join("\n    "));
            entry
        })
}

fn document_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of(1u16..=65535),
        prop::option::of(1u16..=65535),
        prop::collection::vec(object_strategy(), 0..8),
    )
        .prop_map(|(min, max, objects)| {
            let mut doc = String::new();
            if let Some(min) = min {
                doc.push_str(&format!("portMin: {min}\n"));
            }
            if let Some(max) = max {
                doc.push_str(&format!("portMax: {max}\n"));
            }
            if !objects.is_empty() {
                doc.push_str("objects:\n");
                doc.push_str(&objects.join("\n"));
                doc.push('\n');
            }
            doc
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    #[test]
    fn load_always_reaches_loaded_with_valid_state(doc in document_strategy()) {
        let mut store = ConfigStore::with_probe(MockPortProbe::empty());
        store.load_str(&doc);

        prop_assert_eq!(store.state(), StoreState::Loaded);
        prop_assert!(store.global().ports.min() <= store.global().ports.max());
        prop_assert!(!store.global().collector.variables.is_empty());

        let mut names = HashSet::new();
        for object in store.objects() {
            prop_assert!(names.insert(object.name.clone()), "duplicate {}", object.name);
            prop_assert!(!object.collector.variables.is_empty());
        }
    }

    #[test]
    fn allocated_ports_are_distinct_and_in_range(count in 1usize..20) {
        let mut doc = String::from("portMin: 9100\nportMax: 9199\nobjects:\n");
        for i in 0..count {
            doc.push_str(&format!("  - name: obj{i}\n"));
        }

        let mut store = ConfigStore::with_probe(MockPortProbe::empty());
        store.load_str(&doc);

        let ports: HashSet<_> = store.objects().iter().map(|o| o.port).collect();
        prop_assert_eq!(ports.len(), count);
        prop_assert!(ports.iter().all(|p| store.global().ports.contains(*p)));
    }

    #[test]
    fn collector_build_is_total(text in "[a-zA-Z_: \\n\\[\\]-]{0,80}") {
        if let Ok(node) = serde_yaml::from_str::<serde_yaml::Value>(&text) {
            let config = CollectorConfigBuilder::new().build(Some(&node));
            prop_assert!(!config.variables.is_empty());
        }
    }
}
