// MIT License
//
// Copyright (c) 2020 Gregory Meyer
//
// Permission is hereby granted, free of charge, to any person
// obtaining a copy of this software and associated documentation files
// (the "Software"), to deal in the Software without restriction,
// including without limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of the Software,
// and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use super::*;

use proptest::prelude::*;

#[test]
fn three_bit_scenario() {
    let mut list = BitsList::new(3);

    list.add(5);
    list.add(1);
    list.add(7);
    list.add(12);

    assert_eq!(list.len(), 4);
    assert_eq!(list.to_vec(), vec![5, 1, 7, 4]);

    assert_eq!(list.remove_at(1), 1);
    assert_eq!(list.to_vec(), vec![5, 7, 4]);

    list.insert(0, 2);
    assert_eq!(list.to_vec(), vec![2, 5, 7, 4]);
}

#[test]
fn invalid_widths_are_rejected() {
    assert_eq!(BitsList::try_new(0).unwrap_err(), Error::InvalidBitWidth(0));
    assert_eq!(BitsList::try_new(65).unwrap_err(), Error::InvalidBitWidth(65));
    assert!(BitsList::try_new(1).is_ok());
    assert!(BitsList::try_new(64).is_ok());
}

#[test]
#[should_panic]
fn new_panics_on_zero_width() {
    BitsList::new(0);
}

#[test]
fn every_width_stores_its_mask() {
    for bits in 1..=64 {
        let mut list = BitsList::new(bits);
        let mask = list.mask();

        for i in 0..200u64 {
            list.add(if i % 2 == 0 { mask } else { i });
        }

        for i in 0..200u64 {
            let expected = if i % 2 == 0 { mask } else { i & mask };
            assert_eq!(list.get(i as usize), expected, "bits = {}, index = {}", bits, i);
        }
    }
}

#[test]
fn items_straddling_words() {
    for &bits in &[5u32, 7, 13] {
        let values: Vec<u64> = (0..100).map(|i| (i * 37 + 11) & mask_for(bits)).collect();
        let mut list = BitsList::from_values(bits, values.iter().copied());

        assert_eq!(list.to_vec(), values);

        // an item starting in the last bits of word 0 and ending in word 1
        let straddler = 64 / bits as usize;
        assert!(straddler * bits as usize + bits as usize > 64);
        assert_eq!(list.get(straddler), values[straddler]);

        let mut expected = values.clone();

        list.insert(straddler, mask_for(bits));
        expected.insert(straddler, mask_for(bits));
        assert_eq!(list.to_vec(), expected);

        assert_eq!(list.remove_at(0), expected.remove(0));
        assert_eq!(list.remove_at(straddler), expected.remove(straddler));
        assert_eq!(list.to_vec(), expected);
    }
}

#[test]
fn sixty_four_bit_items() {
    let mut list = BitsList::new(64);

    list.add(u64::MAX);
    list.add(1);
    list.insert(1, 1 << 63);

    assert_eq!(list.to_vec(), vec![u64::MAX, 1 << 63, 1]);
    assert_eq!(list.remove_at(0), u64::MAX);
    assert_eq!(list.to_vec(), vec![1 << 63, 1]);
    assert_eq!(list.as_words(), &[1 << 63, 1]);
}

#[test]
fn set_past_end_fills_with_default() {
    let mut list = BitsList::with_default(4, 9);

    list.set(3, 2);
    assert_eq!(list.to_vec(), vec![9, 9, 9, 2]);

    let mut zeros = BitsList::new(4);
    zeros.set(2, 15);
    assert_eq!(zeros.to_vec(), vec![0, 0, 15]);
}

#[test]
fn default_value_is_truncated() {
    let list = BitsList::with_default(2, 0b1110);

    assert_eq!(list.default_value(), 0b10);
}

#[test]
fn removal_leaves_trailing_bits_zero() {
    let mut list = BitsList::from_values(7, (0..50).map(|_| 0x7f));

    while list.len() > 0 {
        list.remove_at(list.len() / 2);

        let used = list.len() * 7;
        for (w, &word) in list.words.iter().enumerate() {
            let lo = w * 64;
            if lo >= used {
                assert_eq!(word, 0);
            } else if used - lo < 64 {
                assert_eq!(word >> (used - lo), 0);
            }
        }
    }

    assert!(list.as_words().is_empty());
}

#[test]
fn index_of_and_remove_value() {
    let mut list = BitsList::from_values(6, vec![3, 9, 3, 60]);

    assert_eq!(list.index_of(3), Some(0));
    assert_eq!(list.last_index_of(3), Some(2));
    assert_eq!(list.index_of(64), None);
    assert!(!list.contains(5));

    assert!(list.remove_value(3));
    assert_eq!(list.to_vec(), vec![9, 3, 60]);
    assert!(!list.remove_value(100));
}

#[test]
fn set_len_and_pop() {
    let mut list = BitsList::with_default(5, 1);

    list.set_len(3);
    assert_eq!(list.to_vec(), vec![1, 1, 1]);

    list.set(1, 31);
    list.set_len(1);
    assert_eq!(list.to_vec(), vec![1]);

    list.set_len(2);
    assert_eq!(list.to_vec(), vec![1, 1]);

    assert_eq!(list.pop(), Some(1));
    assert_eq!(list.pop(), Some(1));
    assert_eq!(list.pop(), None);
}

#[test]
fn clear_and_fit() {
    let mut list = BitsList::from_values(11, 0..1000);
    let capacity = list.capacity();

    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.capacity(), capacity);

    list.add(42);
    list.fit();
    assert_eq!(list.to_vec(), vec![42]);
    assert_eq!(list.words.len(), 1);
}

#[test]
fn equality_ignores_spare_capacity() {
    let mut a = BitsList::with_capacity(9, 1000);
    let b = BitsList::from_values(9, vec![1, 2, 3]);

    a.extend(vec![1, 2, 3, 4]);
    a.remove_at(3);

    assert_eq!(a, b);
    assert_ne!(a, BitsList::from_values(10, vec![1, 2, 3]));
}

#[test]
fn iterates_both_ways() {
    let list = BitsList::from_values(3, vec![1, 2, 3, 4]);

    assert_eq!(list.iter().rev().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
    assert_eq!(list.iter().len(), 4);
    assert_eq!(format!("{:?}", list), "[1, 2, 3, 4]");
}

#[derive(Debug, Clone)]
enum Op {
    Add(u64),
    Set(usize, u64),
    Insert(usize, u64),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u64>().prop_map(Op::Add),
        (0..80usize, any::<u64>()).prop_map(|(i, v)| Op::Set(i, v)),
        (0..80usize, any::<u64>()).prop_map(|(i, v)| Op::Insert(i, v)),
        (0..80usize).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn matches_a_vec(bits in 1u32..=64, default in any::<u64>(), ops in prop::collection::vec(op(), 0..200)) {
        let mask = mask_for(bits);
        let mut list = BitsList::with_default(bits, default);
        let mut reference: Vec<u64> = Vec::new();

        for op in ops {
            match op {
                Op::Add(v) => {
                    list.add(v);
                    reference.push(v & mask);
                }
                Op::Set(i, v) => {
                    list.set(i, v);
                    if i >= reference.len() {
                        reference.resize(i + 1, default & mask);
                    }
                    reference[i] = v & mask;
                }
                Op::Insert(i, v) => {
                    list.insert(i, v);
                    if i >= reference.len() {
                        reference.resize(i + 1, default & mask);
                        reference[i] = v & mask;
                    } else {
                        reference.insert(i, v & mask);
                    }
                }
                Op::Remove(i) => {
                    if i < reference.len() {
                        prop_assert_eq!(list.remove_at(i), reference.remove(i));
                    }
                }
            }

            prop_assert_eq!(list.len(), reference.len());
        }

        prop_assert_eq!(list.to_vec(), reference);
    }
}
