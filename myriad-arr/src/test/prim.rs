use crate::{ArrRead, ArrWrite, PrimArr};
use myriad_base::{ElementKind, ErrorKind};
use test_log::test;

#[test]
fn test_new_is_zeroed() {
    let a = PrimArr::<i32>::new(10).unwrap();
    assert_eq!(a.len(), 10);
    assert_eq!(a.kind(), ElementKind::I32);
    assert!(a.is_mutable());
    assert!(!a.is_growable());
    for i in 0..10 {
        assert_eq!(a.get(i).unwrap(), 0);
    }
}

#[test]
fn test_get_matches_bulk_read() {
    let a = PrimArr::from_vec((0..50i64).map(|x| x * 3).collect());
    let mut buf = [0i64; 1];
    for i in 0..50 {
        a.read_at(i, &mut buf).unwrap();
        assert_eq!(a.get(i).unwrap(), buf[0]);
    }
}

#[test]
fn test_write_and_fill() {
    let mut a = PrimArr::<u8>::new(20).unwrap();
    a.write_at(5, &[1, 2, 3]).unwrap();
    a.fill(10, 4, 9).unwrap();
    a.set(19, 77).unwrap();
    let mut out = vec![0u8; 20];
    a.read_at(0, &mut out).unwrap();
    assert_eq!(out[5..8], [1, 2, 3]);
    assert_eq!(out[10..14], [9, 9, 9, 9]);
    assert_eq!(out[19], 77);
    assert_eq!(out[0], 0);
}

#[test]
fn test_bounds_errors() {
    let mut a = PrimArr::<i32>::new(5).unwrap();
    assert_eq!(a.get(5).unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
    assert_eq!(a.get(-1).unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
    assert_eq!(
        a.write_at(3, &[1, 2, 3]).unwrap_err().kind(),
        ErrorKind::IndexOutOfBounds
    );
    assert_eq!(a.fill(0, -1, 0).unwrap_err().kind(), ErrorKind::IllegalArgument);
    // A failed bulk write must not have touched the destination.
    for i in 0..5 {
        assert_eq!(a.get(i).unwrap(), 0);
    }
}

#[test]
fn test_read_only() {
    let mut a = PrimArr::from_vec(vec![1i32, 2, 3]).freeze();
    assert!(!a.is_mutable());
    assert_eq!(a.set(0, 9).unwrap_err().kind(), ErrorKind::ReadOnlyViolation);
    assert_eq!(a.fill(0, 1, 9).unwrap_err().kind(), ErrorKind::ReadOnlyViolation);
    assert_eq!(a.get(0).unwrap(), 1);
}

#[test]
fn test_growable() {
    let mut a = PrimArr::<u16>::new_growable();
    assert!(a.is_growable());
    for i in 0..100u16 {
        a.push(i).unwrap();
    }
    a.append(&[500, 501]).unwrap();
    assert_eq!(a.len(), 102);
    assert_eq!(a.get(101).unwrap(), 501);
    a.resize(10).unwrap();
    assert_eq!(a.len(), 10);
    a.resize(12).unwrap();
    assert_eq!(a.get(11).unwrap(), 0);

    let mut fixed = PrimArr::<u16>::new(3).unwrap();
    assert_eq!(fixed.push(1).unwrap_err().kind(), ErrorKind::IllegalArgument);
}

#[test]
fn test_c16_tagging() {
    let a = PrimArr::from_vec(vec![104u16, 105]).with_kind(ElementKind::C16).unwrap();
    assert_eq!(a.kind(), ElementKind::C16);
    assert!(PrimArr::from_vec(vec![1u16]).with_kind(ElementKind::I32).is_err());
    assert!(PrimArr::from_vec(vec![1u8]).with_kind(ElementKind::C16).is_err());
}

#[test]
fn test_copy_of_materializes_views() {
    use crate::{ShiftArr, SubArr};
    use std::sync::Arc;
    let base = Arc::new(PrimArr::from_vec((0..10i64).collect()));
    let shifted = ShiftArr::new(base.clone(), 3).unwrap();
    let copy = PrimArr::copy_of(&shifted).unwrap();
    assert_eq!(copy.as_slice(), &[7, 8, 9, 0, 1, 2, 3, 4, 5, 6]);
    assert!(!copy.is_growable());
    let sub = SubArr::new(base, 2, 4).unwrap();
    let copy = PrimArr::copy_of(&sub).unwrap();
    assert_eq!(copy.as_slice(), &[2, 3, 4, 5]);
}

#[test]
fn test_copy_of_keeps_kind_tag() {
    let c16 = PrimArr::from_vec(vec![65u16, 66]).with_kind(ElementKind::C16).unwrap();
    let copy = PrimArr::copy_of(&c16).unwrap();
    assert_eq!(copy.kind(), ElementKind::C16);
}

#[test]
fn test_with_capacity_is_growable() {
    let mut a = PrimArr::<i64>::with_capacity(100).unwrap();
    assert_eq!(a.len(), 0);
    assert!(a.is_growable());
    a.push(5).unwrap();
    assert_eq!(a.get(0).unwrap(), 5);
    assert!(PrimArr::<i64>::with_capacity(-1).is_err());
}

#[test]
fn test_direct_access() {
    use crate::{Frozen, ShiftArr, SubArr};
    use std::sync::Arc;
    let base = Arc::new(PrimArr::from_vec((0..10i32).collect()));
    assert_eq!(base.as_direct().unwrap(), base.as_slice());
    let sub = SubArr::new(base.clone(), 3, 4).unwrap();
    assert_eq!(sub.as_direct().unwrap(), &[3, 4, 5, 6]);
    let frozen = Frozen::new(base.clone());
    assert_eq!(<Frozen<_> as ArrRead<i32>>::as_direct(&frozen).unwrap().len(), 10);
    // Lazy views have no contiguous host buffer.
    let shifted = ShiftArr::new(base, 1).unwrap();
    assert!(<ShiftArr<_> as ArrRead<i32>>::as_direct(&shifted).is_none());
}

#[test]
fn test_index_of() {
    let a = PrimArr::from_vec(vec![5u8, 9, 9, 5, 0, 9]);
    assert_eq!(a.index_of(0, 6, 9).unwrap(), Some(1));
    assert_eq!(a.index_of(2, 6, 9).unwrap(), Some(2));
    assert_eq!(a.index_of(3, 5, 9).unwrap(), None);
    assert_eq!(a.last_index_of(0, 6, 9).unwrap(), Some(5));
    assert_eq!(a.last_index_of(0, 5, 9).unwrap(), Some(2));
    assert_eq!(a.index_of(0, 6, 77).unwrap(), None);
}
