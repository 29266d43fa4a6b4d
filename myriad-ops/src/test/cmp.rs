use crate::{default_comparator, object_comparator};
use myriad_arr::{AnyArr, BitArr, ObjArr, PrimArr};
use myriad_base::ErrorKind;
use test_log::test;

#[test]
fn test_numeric_comparator() {
    let arr = AnyArr::from(PrimArr::from_vec(vec![5i32, -2, 9]));
    let less = default_comparator(&arr, false).unwrap();
    assert!(less(1, 0));
    assert!(less(0, 2));
    assert!(!less(2, 1));
    assert!(!less(0, 0));
    let more = default_comparator(&arr, true).unwrap();
    assert!(more(0, 1));
    assert!(!more(1, 0));
}

#[test]
fn test_float_comparator_total_order() {
    let arr = AnyArr::from(PrimArr::from_vec(vec![f64::NAN, f64::INFINITY, -0.0, 0.0, 1.0]));
    let less = default_comparator(&arr, false).unwrap();
    // NaN sorts above +infinity.
    assert!(less(1, 0));
    assert!(!less(0, 1));
    // -0.0 and +0.0 tie, in both directions, consistently.
    assert!(!less(2, 3));
    assert!(!less(3, 2));
    assert!(less(2, 4));
}

#[test]
fn test_bit_comparator_false_before_true() {
    let arr = AnyArr::from(BitArr::from_bools(&[true, false, true, false]));
    let less = default_comparator(&arr, false).unwrap();
    assert!(less(1, 0));
    assert!(!less(0, 1));
    assert!(!less(1, 3));
    assert!(!less(0, 2));
}

#[test]
fn test_comparator_requires_writable() {
    let arr = AnyArr::from(PrimArr::from_vec(vec![1i32]).freeze());
    assert_eq!(
        default_comparator(&arr, false).err().unwrap().kind(),
        ErrorKind::ReadOnlyViolation
    );
}

#[test]
fn test_object_comparator() {
    let arr = ObjArr::from_vec(vec!["pear".to_string(), "apple".to_string(), "fig".to_string()]);
    let less = object_comparator(&arr, |a, b| a.cmp(b), false).unwrap();
    assert!(less(1, 0));
    assert!(less(2, 0));
    assert!(!less(0, 2));
    let more = object_comparator(&arr, |a, b| a.cmp(b), true).unwrap();
    assert!(more(0, 1));
}

#[test]
fn test_comparator_sorts_indices() {
    let arr = AnyArr::from(PrimArr::from_vec(vec![30i64, 10, 20, 10]));
    let less = default_comparator(&arr, false).unwrap();
    let mut idx: Vec<i64> = (0..4).collect();
    idx.sort_by(|a, b| {
        if less(*a, *b) {
            std::cmp::Ordering::Less
        } else if less(*b, *a) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    });
    let sorted: Vec<i64> = idx.iter().map(|i| arr.get_f64(*i).unwrap() as i64).collect();
    assert_eq!(sorted, [10, 10, 20, 30]);
}
