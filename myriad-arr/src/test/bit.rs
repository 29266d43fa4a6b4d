use crate::test::lcg_rand_step;
use crate::{ArrRead, ArrWrite, BitArr, BitRead, BitWrite};
use myriad_base::{packed, ErrorKind};
use test_log::test;

fn random_bools(n: usize, state: &mut u32) -> Vec<bool> {
    (0..n)
        .map(|_| {
            lcg_rand_step(state);
            *state & 1 != 0
        })
        .collect()
}

#[test]
fn test_word_count_invariant() {
    for len in [0i64, 1, 63, 64, 65, 128, 1000] {
        let a = BitArr::new(len).unwrap();
        assert_eq!(a.words().len(), packed::word_len(len as u64));
    }
}

#[test]
fn test_get_matches_bulk_read() {
    let mut state = 11;
    let bools = random_bools(300, &mut state);
    let a = BitArr::from_bools(&bools);
    assert_eq!(a.len(), 300);
    let mut buf = [false; 1];
    for i in 0..300 {
        assert_eq!(a.get(i).unwrap(), bools[i as usize]);
        a.read_at(i, &mut buf).unwrap();
        assert_eq!(buf[0], bools[i as usize]);
    }
}

#[test]
fn test_word_readback_matches_bits() {
    let mut state = 22;
    let bools = random_bools(200, &mut state);
    let a = BitArr::from_bools(&bools);
    let mut w = vec![0u64; packed::word_len(200)];
    a.read_bits(0, &mut w, 0, 200).unwrap();
    for i in 0..200u64 {
        assert_eq!(packed::get_bit(&w, i), bools[i as usize]);
    }
}

#[test]
fn test_write_bits_offsets() {
    let mut a = BitArr::new(200).unwrap();
    let src = vec![u64::MAX; 2];
    a.write_bits(70, &src, 3, 40).unwrap();
    for i in 0..200 {
        assert_eq!(a.get_bit(i).unwrap(), (70..110).contains(&i), "bit {i}");
    }
}

#[test]
fn test_fill_and_cardinality() {
    let mut a = BitArr::new(500).unwrap();
    a.fill(100, 300, true).unwrap();
    assert_eq!(a.cardinality(0, 500).unwrap(), 300);
    assert_eq!(a.cardinality(0, 100).unwrap(), 0);
    assert_eq!(a.cardinality(150, 160).unwrap(), 10);
    assert_eq!(a.cardinality(399, 401).unwrap(), 1);
}

#[test]
fn test_index_of() {
    let mut a = BitArr::new(150).unwrap();
    a.set_bit(80, true).unwrap();
    a.set_bit(120, true).unwrap();
    assert_eq!(a.index_of(0, 150, true).unwrap(), Some(80));
    assert_eq!(a.index_of(81, 150, true).unwrap(), Some(120));
    assert_eq!(a.last_index_of(0, 150, true).unwrap(), Some(120));
    assert_eq!(a.index_of(0, 150, false).unwrap(), Some(0));
    assert_eq!(a.index_of(80, 81, false).unwrap(), None);
}

#[test]
fn test_push_and_resize() {
    let mut a = BitArr::new_growable();
    let mut state = 33;
    let bools = random_bools(130, &mut state);
    for b in &bools {
        a.push(*b).unwrap();
    }
    assert_eq!(a.len(), 130);
    for (i, b) in bools.iter().enumerate() {
        assert_eq!(a.get_bit(i as i64).unwrap(), *b);
    }
    // Shrinking then growing must not resurrect old tail content.
    a.resize(70).unwrap();
    a.resize(130).unwrap();
    for i in 70..130 {
        assert_eq!(a.get_bit(i).unwrap(), false, "bit {i}");
    }

    let mut fixed = BitArr::new(3).unwrap();
    assert_eq!(fixed.push(true).unwrap_err().kind(), ErrorKind::IllegalArgument);
}

#[test]
fn test_read_only() {
    let mut a = BitArr::from_bools(&[true, false]).freeze();
    assert_eq!(a.set_bit(0, false).unwrap_err().kind(), ErrorKind::ReadOnlyViolation);
    assert!(a.words_mut().is_err());
    assert_eq!(a.get_bit(0).unwrap(), true);
}

#[test]
fn test_copy_of_bit_views() {
    use crate::ShiftArr;
    use std::sync::Arc;
    let bools: Vec<bool> = (0..100).map(|i| i % 7 == 0).collect();
    let base = Arc::new(BitArr::from_bools(&bools));
    let shifted = ShiftArr::new(base, 13).unwrap();
    let copy = BitArr::copy_of(&shifted).unwrap();
    assert_eq!(copy.len(), 100);
    for i in 0..100i64 {
        assert_eq!(copy.get_bit(i).unwrap(), bools[((i - 13 + 100) % 100) as usize]);
    }
}

#[test]
fn test_sub_word_write_preserves_neighbors() {
    let mut a = BitArr::new(128).unwrap();
    a.fill(0, 128, true).unwrap();
    a.write_at(60, &[false; 8]).unwrap();
    for i in 0..128 {
        assert_eq!(a.get_bit(i).unwrap(), !(60..68).contains(&i));
    }
}
