use crate::test::{lcg_rand_step, policies};
use crate::{comparing_copy, comparing_copy_any, comparing_copy_bits, CopyAlgorithm};
use myriad_arr::{AnyArr, ArrRead, BitArr, PrimArr, ShiftArr};
use myriad_base::{ElementKind, ErrorKind};
use std::sync::Arc;
use test_log::test;

#[test]
fn test_copy_reports_changed() {
    for policy in policies() {
        let src = PrimArr::from_vec((0..10_000i32).collect());
        let mut dst = PrimArr::<i32>::new(10_000).unwrap();
        let r = comparing_copy(&policy, &mut dst, &src).unwrap();
        assert!(r.changed);
        assert_eq!(dst.as_slice(), src.as_slice());
        // Copying again over identical content reports no change.
        let r = comparing_copy(&policy, &mut dst, &src).unwrap();
        assert!(!r.changed);
        assert_eq!(r.strict, policy.strict);
    }
}

#[test]
fn test_copy_algorithm_reflects_tasks() {
    let src = PrimArr::from_vec(vec![1i32; 200_000]);
    let mut dst = PrimArr::<i32>::new(200_000).unwrap();
    let single = crate::ExecPolicy::single_task();
    let r = comparing_copy(&single, &mut dst, &src).unwrap();
    assert_eq!(r.algorithm, CopyAlgorithm::Linear);
    let multi = crate::ExecPolicy { available_cores: 4, strict: false, profiling: false };
    let r = comparing_copy(&multi, &mut dst, &src).unwrap();
    assert_eq!(r.algorithm, CopyAlgorithm::Blocked);
}

#[test]
fn test_copy_from_view() {
    let base = Arc::new(PrimArr::from_vec((0..1000i64).collect()));
    let view = ShiftArr::new(base.clone(), 250).unwrap();
    let mut dst = PrimArr::<i64>::new(1000).unwrap();
    comparing_copy(&crate::ExecPolicy::default(), &mut dst, &view).unwrap();
    for i in 0..1000 {
        assert_eq!(dst.get(i).unwrap(), view.get(i).unwrap());
    }
}

#[test]
fn test_copy_validation() {
    let policy = crate::ExecPolicy::default();
    let src = PrimArr::from_vec(vec![1u16, 2]);
    let mut dst = PrimArr::<u16>::new(3).unwrap();
    assert_eq!(
        comparing_copy(&policy, &mut dst, &src).unwrap_err().kind(),
        ErrorKind::IllegalArgument
    );
    let c16 = PrimArr::from_vec(vec![1u16, 2, 3]).with_kind(ElementKind::C16).unwrap();
    assert_eq!(
        comparing_copy(&policy, &mut dst, &c16).unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_copy_bits() {
    let mut state = 99;
    let bools: Vec<bool> = (0..300_000)
        .map(|_| {
            lcg_rand_step(&mut state);
            state & 1 != 0
        })
        .collect();
    let src = BitArr::from_bools(&bools);
    for policy in policies() {
        let mut dst = BitArr::new(300_000).unwrap();
        let r = comparing_copy_bits(&policy, &mut dst, &src).unwrap();
        assert!(r.changed);
        for (i, b) in bools.iter().enumerate() {
            assert_eq!(dst.get_bit(i as i64).unwrap(), *b, "bit {i}");
        }
        let r = comparing_copy_bits(&policy, &mut dst, &src).unwrap();
        assert!(!r.changed);
    }
}

#[test]
fn test_copy_any_dispatch() {
    let policy = crate::ExecPolicy::default();
    let mut dst = AnyArr::from(PrimArr::<u8>::new(3).unwrap());
    let src = AnyArr::from(PrimArr::from_vec(vec![7u8, 8, 9]));
    let r = comparing_copy_any(&policy, &mut dst, &src).unwrap();
    assert!(r.changed);

    let src16 = AnyArr::from(PrimArr::from_vec(vec![7u16, 8, 9]));
    assert_eq!(
        comparing_copy_any(&policy, &mut dst, &src16).unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );
}
