#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skipset::{SkipSet, SkipSetError};

#[derive(Debug, Arbitrary)]
enum Op {
    Insert(i16),
    Remove(i16),
    Contains(i16),
    Index(u16),
    Rank(i16),
    TopN(u8),
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    descending: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: FuzzInput| {
    let set = SkipSet::new(input.descending);
    let mut model = BTreeSet::new();

    // Модель в порядке множества.
    let ordered = |model: &BTreeSet<i16>| -> Vec<i16> {
        if input.descending {
            model.iter().rev().copied().collect()
        } else {
            model.iter().copied().collect()
        }
    };

    for op in input.ops {
        match op {
            Op::Insert(v) => assert_eq!(set.insert(v), model.insert(v)),
            Op::Remove(v) => assert_eq!(set.remove(&v), model.remove(&v)),
            Op::Contains(v) => assert_eq!(set.contains(&v), model.contains(&v)),
            Op::Index(i) => {
                let i = i as usize;
                let expected = ordered(&model).get(i).copied().ok_or(
                    SkipSetError::IndexOutOfBounds {
                        index: i,
                        len: model.len(),
                    },
                );
                assert_eq!(set.index(i), expected);
            }
            Op::Rank(v) => {
                let expected = ordered(&model).iter().position(|x| *x == v);
                assert_eq!(set.rank(&v), expected);
            }
            Op::TopN(n) => {
                let all = ordered(&model);
                let n = (n as usize).min(all.len());
                assert_eq!(set.top_n(n), all[..n].to_vec());
            }
        }

        assert_eq!(set.len(), model.len());
    }

    assert!(set.validate_invariants().is_ok());
    assert_eq!(set.to_vec(), ordered(&model));
});
