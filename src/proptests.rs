use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Narrow key range so that overwrites and hits on removal are common.
    prop_oneof![
        6 => (0u16..512, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        4 => (0u16..512).prop_map(Op::Remove),
        2 => (0u16..512).prop_map(Op::Get),
        1 => Just(Op::Clear),
    ]
}

fn assert_layout_matches(map: &AvlTreeMap<u16, u32>) {
    let mut depths = BTreeMap::new();
    for entry in map.level_order() {
        depths.insert(*entry.key, entry.depth);
    }
    assert_eq!(depths.len(), map.len());

    // Level order never goes back up a level
    let levels: Vec<usize> = map.level_order().map(|entry| entry.depth).collect();
    assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));

    // The root's height is the deepest depth reached
    assert_eq!(map.height(), levels.last().copied());
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_matches_btreemap(ops in proptest::collection::vec(op_strategy(), 0..400)) {
        let mut map = AvlTreeMap::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(map.insert(k, v), model.insert(k, v));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), model.remove(&k));
                }
                Op::Get(k) => {
                    prop_assert_eq!(map.get(&k), model.get(&k));
                }
                Op::Clear => {
                    map.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(map.len(), model.len());
            prop_assert!(map.check_consistency().is_ok());
        }

        prop_assert!(map.iter().eq(model.iter()));
        assert_layout_matches(&map);
    }

    #[test]
    fn prop_stop_at_first_rotation_keeps_structure(
        ops in proptest::collection::vec(op_strategy(), 0..400)
    ) {
        let mut map = AvlTreeMap::with_removal_rebalance(RemovalRebalance::StopAtFirstRotation);
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(map.insert(k, v), model.insert(k, v));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), model.remove(&k));
                }
                Op::Get(k) => {
                    prop_assert_eq!(map.get(&k), model.get(&k));
                }
                Op::Clear => {
                    map.clear();
                    model.clear();
                }
            }
            prop_assert!(map.check_structure().is_ok());
        }

        prop_assert!(map.iter().eq(model.iter()));
        assert_layout_matches(&map);
    }

    #[test]
    fn prop_insert_only_is_balanced(keys in proptest::collection::vec(any::<i64>(), 0..600)) {
        let mut map = AvlTreeMap::with_removal_rebalance(RemovalRebalance::StopAtFirstRotation);
        for key in &keys {
            map.insert(*key, ());
        }
        prop_assert!(map.check_consistency().is_ok());

        let len = map.len();
        if let Some(height) = map.height() {
            prop_assert!((height as f64) <= 1.4405 * ((len + 2) as f64).log2());
        }
    }
}
