//! Property-Based Tests for Index Module
//!
//! Uses proptest to check index consistency over random operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::index::{IndexValue, IndexedStore};

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: u8,
    group: u8,
    active: bool,
}

// == Strategies ==
fn item_strategy() -> impl Strategy<Value = Item> {
    (0u8..16, 0u8..4, any::<bool>()).prop_map(|(id, group, active)| Item { id, group, active })
}

#[derive(Debug, Clone)]
enum StoreOp {
    Set(Item),
    Delete(u8),
    Load(Vec<Item>),
    Clear,
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        4 => item_strategy().prop_map(StoreOp::Set),
        2 => (0u8..16).prop_map(StoreOp::Delete),
        1 => prop::collection::vec(item_strategy(), 0..6).prop_map(StoreOp::Load),
        1 => Just(StoreOp::Clear),
    ]
}

fn indexed_store() -> IndexedStore<u8, Item> {
    let store = IndexedStore::new();
    store.add_index("group", |i: &Item| i.group as u64).unwrap();
    store.add_index("active", |i: &Item| i.active).unwrap();
    store
}

fn apply(store: &IndexedStore<u8, Item>, model: &mut HashMap<u8, Item>, op: StoreOp) {
    match op {
        StoreOp::Set(item) => {
            model.insert(item.id, item.clone());
            store.set(item.id, item);
        }
        StoreOp::Delete(id) => {
            model.remove(&id);
            store.delete(&id);
        }
        StoreOp::Load(items) => {
            for item in &items {
                model.insert(item.id, item.clone());
            }
            store.load(items, |i| i.id);
        }
        StoreOp::Clear => {
            model.clear();
            store.clear();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Index buckets agree with the primary map and no empty bucket is left
    // behind, for any sequence of mutations.
    #[test]
    fn prop_index_consistency(ops in prop::collection::vec(store_op_strategy(), 1..60)) {
        let store = indexed_store();
        let mut model = HashMap::new();

        for op in ops {
            apply(&store, &mut model, op);
            store.assert_consistent();
        }

        prop_assert_eq!(store.len(), model.len());
        for (id, item) in &model {
            let got = store.get(id);
            prop_assert_eq!(got.as_ref(), Some(item));
        }
    }

    // Find returns exactly the entries whose extractor output matches.
    #[test]
    fn prop_find_matches_filter(
        ops in prop::collection::vec(store_op_strategy(), 1..40),
        group in 0u8..4
    ) {
        let store = indexed_store();
        let mut model = HashMap::new();
        for op in ops {
            apply(&store, &mut model, op);
        }

        let mut found: Vec<u8> = store
            .find("group", group as u64)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        let mut scanned: Vec<u8> = store
            .filter(|i| i.group == group)
            .into_iter()
            .map(|i| i.id)
            .collect();
        found.sort();
        scanned.sort();

        prop_assert_eq!(found, scanned);
    }

    // An index registered after the data exists covers every entry.
    #[test]
    fn prop_reindex_completeness(items in prop::collection::vec(item_strategy(), 0..30)) {
        let store: IndexedStore<u8, Item> = IndexedStore::new();
        store.load(items.clone(), |i| i.id);

        store.add_index("group", |i: &Item| i.group as u64).unwrap();
        store.assert_consistent();

        for item in store.values() {
            let matches = store.find("group", item.group as u64).unwrap();
            prop_assert!(matches.contains(&item));
        }
    }

    // Clear empties the data but keeps every index registered and working.
    #[test]
    fn prop_clear_preserves_extractors(items in prop::collection::vec(item_strategy(), 0..30)) {
        let store = indexed_store();
        store.load(items, |i| i.id);

        store.clear();

        prop_assert_eq!(store.len(), 0);
        prop_assert_eq!(store.index_names(), vec!["active".to_string(), "group".to_string()]);
        prop_assert!(store.index_values("group").unwrap().is_empty());
        prop_assert!(store.index_values("active").unwrap().is_empty());

        store.set(1, Item { id: 1, group: 2, active: true });
        prop_assert_eq!(store.find("group", 2u64).unwrap().len(), 1);
        prop_assert_eq!(
            store.index_values("active").unwrap(),
            vec![IndexValue::Bool(true)]
        );
    }
}
