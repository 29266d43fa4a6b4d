// End-to-end exercises across the whole stack.

use crate::*;
use std::sync::Arc;
use test_log::test;

#[test]
fn test_window_feeds_reduction() {
    // A constant-continued window over a matrix, consumed as a view by
    // the summation operator.
    let base = Arc::new(PrimArr::from_vec((0..20i32).collect()));
    let shape = MatShape::new(&[5, 4]).unwrap();
    let w = Window::new(&shape, &[-1, -1], &[7, 6], Continuation::Constant).unwrap();
    let va = WindowArr::new(w, base, 0).unwrap();
    let policy = ExecPolicy::default();
    // The window adds only zero padding, so the sums agree.
    assert_eq!(sum(&policy, &va).unwrap(), (0..20).sum::<i32>() as f64);
    let r = min_max(&policy, &va).unwrap().unwrap();
    assert_eq!(r.min, 0);
    assert_eq!(r.max, 19);
}

#[test]
fn test_concat_of_shift_flattens() {
    let a = Arc::new(PrimArr::from_vec((0..100i64).collect()));
    let s = Arc::new(ShiftArr::new(a.clone(), 40).unwrap());
    let c = ConcatArr::new(vec![s.clone(), s]).unwrap();
    assert_eq!(c.len(), 200);
    for i in 0..200 {
        let expect = (i % 100 + 60) % 100;
        assert_eq!(c.get(i).unwrap(), expect, "index {i}");
    }
    assert_eq!(sum(&ExecPolicy::default(), &c).unwrap(), 2.0 * (0..100).sum::<i64>() as f64);
}

#[test]
fn test_pack_window_unpack_pipeline() {
    // Mirror-window a small ramp, pack it against a threshold, then
    // unpack the mask back into numbers.
    let base = Arc::new(PrimArr::from_vec(vec![1i32, 5, 9]));
    let shape = MatShape::new(&[3]).unwrap();
    let w = Window::new(&shape, &[-2], &[10], Continuation::MirrorCyclic).unwrap();
    let va = WindowArr::new(w, base, 0).unwrap();
    // Window content: 5,1,1,5,9,9,5,1,1,5.
    let policy = ExecPolicy::default();
    let mut mask = BitArr::new(10).unwrap();
    pack_gt(&policy, &mut mask, 0, &va, 0, 10, 4.0).unwrap();
    let mut out = PrimArr::<i32>::new(10).unwrap();
    unpack_bits(&policy, &mut out, 0, &mask, 0, 10, 0, 1).unwrap();
    assert_eq!(out.as_slice(), &[1, 0, 0, 1, 1, 1, 1, 0, 0, 1]);
}

#[test]
fn test_error_kinds_surface_through_facade() {
    let arr = PrimArr::from_vec(vec![1i32, 2]);
    assert_eq!(arr.get(5).unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
    let shape = MatShape::new(&[2]).unwrap();
    let w = Window::new(&shape, &[0], &[2], Continuation::MirrorCyclic).unwrap();
    assert_eq!(
        w.index_of(&arr, 0, 0, 2, 1).unwrap_err().kind(),
        ErrorKind::Unsupported
    );
}
