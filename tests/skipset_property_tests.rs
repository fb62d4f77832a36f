use std::collections::BTreeSet;

use proptest::prelude::*;
use skipset::SkipSet;

proptest! {
    #[test]
    fn prop_behaves_like_btreeset(ops in prop::collection::vec(
        (0u8..3, -100i32..100), 0..300
    )) {
        let set = SkipSet::<i32>::default();
        let mut model = BTreeSet::new();

        for (op, value) in ops {
            match op {
                0 => prop_assert_eq!(set.insert(value), model.insert(value)),
                1 => prop_assert_eq!(set.remove(&value), model.remove(&value)),
                2 => prop_assert_eq!(set.contains(&value), model.contains(&value)),
                _ => unreachable!(),
            }

            prop_assert_eq!(set.len(), model.len());
        }

        prop_assert!(set.validate_invariants().is_ok());
        prop_assert_eq!(set.to_vec(), model.into_iter().collect::<Vec<_>>());
    }
}

proptest! {
    #[test]
    fn prop_index_matches_to_vec(
        values in prop::collection::vec(-1000i32..1000, 0..200),
        descending in any::<bool>(),
    ) {
        let set = SkipSet::new(descending);
        for v in &values {
            set.insert(*v);
        }

        let all = set.to_vec();
        for (i, v) in all.iter().enumerate() {
            prop_assert_eq!(set.index(i), Ok(*v));
            prop_assert_eq!(set.rank(v), Some(i));
        }
        prop_assert!(set.index(all.len()).is_err());
    }
}

proptest! {
    #[test]
    fn prop_sorted_and_unique(
        values in prop::collection::vec(-1000i32..1000, 0..200),
        descending in any::<bool>(),
    ) {
        let set = SkipSet::new(descending);
        for v in &values {
            set.insert(*v);
        }

        let mut expected: Vec<i32> = values.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if descending {
            expected.reverse();
        }

        prop_assert_eq!(set.to_vec(), expected);
    }
}

proptest! {
    #[test]
    fn prop_top_n_is_prefix(
        values in prop::collection::vec(any::<i16>(), 0..150),
        n in 0usize..200,
    ) {
        let set = SkipSet::default();
        for v in &values {
            set.insert(*v);
        }

        let all = set.to_vec();
        let top = set.top_n(n);

        prop_assert_eq!(top.len(), n.min(all.len()));
        prop_assert_eq!(&top[..], &all[..top.len()]);
    }
}
