use crate::{
    hash::testing::{Colliding, IdentityHashBuilder},
    Error, Map,
};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op<K> {
    Set(K, u16),
    Erase(K),
    Get(K),
}

fn ops_strategy<K: Clone + std::fmt::Debug>(
    key: impl Strategy<Value = K> + Clone,
) -> impl Strategy<Value = Vec<Op<K>>> {
    let op = prop_oneof![
        50 => (key.clone(), any::<u16>()).prop_map(|(key, value)| Op::Set(key, value)),
        30 => key.clone().prop_map(Op::Erase),
        20 => key.prop_map(Op::Get),
    ];

    prop::collection::vec(op, 0..=512)
}

// Few distinct hashes with several keys each, so that fragments are shared
// deep into the trie and full collisions are common.
fn colliding_key_strategy() -> impl Strategy<Value = Colliding> + Clone {
    (
        prop_oneof![
            Just(0u64),
            Just(1 << 60),
            Just(u64::MAX),
            Just(u64::MAX >> 1),
            0u64..64,
        ],
        0u32..4,
    )
        .prop_map(|(hash, id)| Colliding::new(hash, id))
}

fn check_against_model<K, S>(empty: Map<K, u16, S>, ops: Vec<Op<K>>)
where
    K: Clone + std::hash::Hash + Eq + std::fmt::Debug,
    S: std::hash::BuildHasher + Clone,
{
    let mut map = empty;
    let mut model = HashMap::<K, u16>::new();

    for op in ops {
        let old = map.clone();
        let old_model = model.clone();

        match op {
            Op::Set(key, value) => {
                let size = map.len();
                let found = model.insert(key.clone(), value).is_some();

                map = map.set(key.clone(), value);

                assert_eq!(map.at(&key), Ok(&value));
                assert_eq!(map.len(), if found { size } else { size + 1 });
            }
            Op::Erase(key) => match map.erase(&key) {
                Ok(other) => {
                    assert!(model.remove(&key).is_some());
                    assert_eq!(other.at(&key), Err(Error::KeyNotFound));

                    map = other;
                }
                Err(error) => {
                    assert_eq!(error, Error::KeyNotFound);
                    assert!(!model.contains_key(&key));
                }
            },
            Op::Get(key) => {
                assert_eq!(map.get(&key), model.get(&key));
            }
        }

        assert_eq!(map.len(), model.len());
        assert_eq!(map.root().entry_count(), model.len());
        assert!(map.root().is_normal());

        for (key, value) in &old_model {
            assert_eq!(old.at(key), Ok(value));
        }
    }

    assert_eq!(map.iter().len(), model.len());

    for (key, value) in &map {
        assert_eq!(model.get(key), Some(value));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ops_match_hash_map(ops in ops_strategy(any::<u16>())) {
        check_against_model(Map::new(), ops);
    }

    #[test]
    fn ops_match_hash_map_with_shared_prefixes(ops in ops_strategy(0u64..1 << 12)) {
        check_against_model(Map::with_hasher(IdentityHashBuilder::default()), ops);
    }

    #[test]
    fn ops_match_hash_map_with_collisions(ops in ops_strategy(colliding_key_strategy())) {
        check_against_model(Map::with_hasher(IdentityHashBuilder::default()), ops);
    }

    #[test]
    fn equal_regardless_of_insertion_order(
        keys in prop::collection::hash_set(colliding_key_strategy(), 0..24),
        seed in any::<u64>(),
    ) {
        let keys = keys.into_iter().collect::<Vec<_>>();
        let mut shuffled = keys.clone();
        let len = shuffled.len();

        if len > 1 {
            shuffled.rotate_left(seed as usize % len);
            shuffled.reverse();
        }

        let insert = |keys: &[Colliding]| {
            keys.iter().fold(
                Map::with_hasher(IdentityHashBuilder::default()),
                |map, key| map.set(*key, key.id),
            )
        };

        prop_assert_eq!(insert(&keys), insert(&shuffled));
    }
}
