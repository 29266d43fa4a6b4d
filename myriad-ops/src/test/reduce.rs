use crate::test::{lcg_rand_step, policies};
use crate::{
    histogram, histogram_bits, index_of, last_index_of, min_max, min_max_any, min_max_bits,
    precise_sum, sum, sum_bits,
};
use myriad_arr::{AnyArr, BitArr, PrimArr, ShiftArr};
use myriad_base::ErrorKind;
use std::sync::Arc;
use test_log::test;

#[test]
fn test_float_sum_deterministic() {
    // The classic cancellation case: only strict left-to-right
    // reduction gives 0.0, and it must not depend on the policy.
    let arr = PrimArr::from_vec(vec![1e20f64, 1.0, -1e20]);
    for policy in policies() {
        let s = sum(&policy, &arr).unwrap();
        assert_eq!(s.to_bits(), 0.0f64.to_bits());
    }
    // A longer pattern, bit-identical across all configurations.
    let vals: Vec<f64> = (0..100_000).map(|i| (i as f64) * 0.1 - 3333.3).collect();
    let arr = PrimArr::from_vec(vals);
    let reference = sum(&crate::ExecPolicy::single_task(), &arr).unwrap();
    for policy in policies() {
        assert_eq!(sum(&policy, &arr).unwrap().to_bits(), reference.to_bits());
    }
}

#[test]
fn test_sum_small_kinds() {
    let arr = PrimArr::from_vec(vec![200u8, 100, 55]);
    for policy in policies() {
        assert_eq!(sum(&policy, &arr).unwrap(), 355.0);
    }
    let arr = PrimArr::from_vec(vec![-5i32, 10, -5]);
    assert_eq!(sum(&crate::ExecPolicy::default(), &arr).unwrap(), 0.0);
}

#[test]
fn test_sum_bits_is_cardinality() {
    let mut arr = BitArr::new(100_000).unwrap();
    let mut state = 42;
    let mut expect = 0u64;
    for i in 0..100_000 {
        lcg_rand_step(&mut state);
        if state % 5 == 0 {
            arr.set_bit(i, true).unwrap();
            expect += 1;
        }
    }
    for policy in policies() {
        assert_eq!(sum_bits(&policy, &arr).unwrap(), expect);
    }
}

#[test]
fn test_precise_sum() {
    let vals: Vec<i64> = (0..50_000).map(|i| i - 25_000).collect();
    let arr = PrimArr::from_vec(vals.clone());
    let expect: i64 = vals.iter().sum();
    for policy in policies() {
        assert_eq!(precise_sum(&policy, &arr, true).unwrap(), expect);
    }
}

#[test]
fn test_precise_sum_overflow() {
    let arr = PrimArr::from_vec(vec![i64::MAX, i64::MAX, 10]);
    for policy in policies() {
        let e = precise_sum(&policy, &arr, true).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::ArithmeticOverflow);
        // With detection off the sum wraps instead of failing.
        assert!(precise_sum(&policy, &arr, false).is_ok());
    }
}

#[test]
fn test_precise_sum_rejects_floats() {
    let arr = PrimArr::from_vec(vec![1.0f64]);
    assert_eq!(
        precise_sum(&crate::ExecPolicy::default(), &arr, true).unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_min_max_values_and_indices() {
    let arr = PrimArr::from_vec(vec![5i32, -2, 9, -2, 9, 0]);
    for policy in policies() {
        let r = min_max(&policy, &arr).unwrap().unwrap();
        assert_eq!((r.min, r.min_index), (-2, 1));
        assert_eq!((r.max, r.max_index), (9, 2));
    }
    let empty = PrimArr::<i32>::new(0).unwrap();
    assert!(min_max(&crate::ExecPolicy::default(), &empty).unwrap().is_none());
}

#[test]
fn test_min_max_ties_break_to_lowest_index() {
    // Large constant array across many blocks: every block ties, the
    // winner must still be index 0 under any task count.
    let arr = PrimArr::from_vec(vec![7i64; 300_000]);
    for policy in policies() {
        let r = min_max(&policy, &arr).unwrap().unwrap();
        assert_eq!(r.min_index, 0);
        assert_eq!(r.max_index, 0);
    }
}

#[test]
fn test_min_max_float_total_order() {
    let arr = PrimArr::from_vec(vec![1.0f64, f64::NAN, f64::INFINITY, -0.0]);
    let r = min_max(&crate::ExecPolicy::default(), &arr).unwrap().unwrap();
    assert_eq!(r.min, -0.0);
    assert_eq!(r.min_index, 3);
    // NaN sorts above positive infinity in the total order.
    assert!(r.max.is_nan());
    assert_eq!(r.max_index, 1);
}

#[test]
fn test_min_max_bits_scenarios() {
    let all_ones = BitArr::from_bools(&[true; 8]);
    let r = min_max_bits(&all_ones).unwrap().unwrap();
    assert_eq!((r.min, r.min_index, r.max, r.max_index), (true, 0, true, 0));

    // 11110111: first zero at index 4.
    let bools = [true, true, true, true, false, true, true, true];
    let r = min_max_bits(&BitArr::from_bools(&bools)).unwrap().unwrap();
    assert_eq!((r.min, r.min_index), (false, 4));
    assert_eq!((r.max, r.max_index), (true, 0));

    // 00010000: first one at index 3.
    let bools = [false, false, false, true, false, false, false, false];
    let r = min_max_bits(&BitArr::from_bools(&bools)).unwrap().unwrap();
    assert_eq!((r.min, r.min_index), (false, 0));
    assert_eq!((r.max, r.max_index), (true, 3));

    assert!(min_max_bits(&BitArr::new(0).unwrap()).unwrap().is_none());
}

#[test]
fn test_min_max_any_widens() {
    let arr = AnyArr::from(PrimArr::from_vec(vec![200u8, 3]));
    let r = min_max_any(&crate::ExecPolicy::default(), &arr).unwrap().unwrap();
    assert_eq!((r.min, r.max), (3.0, 200.0));
}

#[test]
fn test_histogram_mapping() {
    let arr = PrimArr::from_vec(vec![0i32, 1, 4, 5, 9, 10, -1]);
    for policy in policies() {
        let h = histogram(&policy, &arr, 0.0, 10.0, 2).unwrap();
        // [0,5) and [5,10); 10 and -1 are outside.
        assert_eq!(h.bins, vec![3, 2]);
        assert!(!h.all_inside);
    }
    let arr = PrimArr::from_vec(vec![0.0f64, 2.5, 4.999]);
    let h = histogram(&crate::ExecPolicy::default(), &arr, 0.0, 5.0, 5).unwrap();
    assert_eq!(h.bins, vec![1, 0, 1, 0, 1]);
    assert!(h.all_inside);
}

#[test]
fn test_histogram_nan_is_outside() {
    let arr = PrimArr::from_vec(vec![f64::NAN, 1.0]);
    let h = histogram(&crate::ExecPolicy::default(), &arr, 0.0, 2.0, 2).unwrap();
    assert_eq!(h.bins, vec![0, 1]);
    assert!(!h.all_inside);
}

#[test]
fn test_histogram_bits() {
    let bools: Vec<bool> = (0..1000).map(|i| i % 4 == 0).collect();
    let arr = BitArr::from_bools(&bools);
    for policy in policies() {
        // Identity mapping: two bins, zeros then ones.
        let h = histogram_bits(&policy, &arr, 0.0, 2.0, 2).unwrap();
        assert_eq!(h.bins, vec![750, 250]);
        assert!(h.all_inside);
        // General mapping pushing both values into one bin.
        let h = histogram_bits(&policy, &arr, -10.0, 10.0, 2).unwrap();
        assert_eq!(h.bins, vec![1000, 0]);
        assert!(h.all_inside);
        // Ones land outside the range.
        let h = histogram_bits(&policy, &arr, 0.0, 1.0, 1).unwrap();
        assert_eq!(h.bins, vec![750]);
        assert!(!h.all_inside);
    }
}

#[test]
fn test_index_of_direct_and_view_paths() {
    // Direct storage path (memchr for bytes).
    let arr = PrimArr::from_vec(vec![3u8, 7, 7, 3, 0, 7]);
    assert_eq!(index_of(&arr, 0, 6, 7).unwrap(), Some(1));
    assert_eq!(index_of(&arr, 2, 6, 7).unwrap(), Some(2));
    assert_eq!(index_of(&arr, 3, 5, 7).unwrap(), None);
    assert_eq!(last_index_of(&arr, 0, 6, 7).unwrap(), Some(5));
    assert_eq!(last_index_of(&arr, 0, 5, 7).unwrap(), Some(2));

    // Lazy-view path: no direct buffer, chunked reads.
    let base = Arc::new(PrimArr::from_vec((0..200_000i64).collect()));
    let view = ShiftArr::new(base, 100).unwrap();
    assert_eq!(index_of(&view, 0, 200_000, 0).unwrap(), Some(100));
    assert_eq!(index_of(&view, 0, 200_000, 199_900).unwrap(), Some(0));
    assert_eq!(last_index_of(&view, 0, 200_000, 50).unwrap(), Some(150));
    assert_eq!(index_of(&view, 0, 200_000, -1).unwrap(), None);
}

#[test]
fn test_sum_uses_direct_and_view_paths_identically() {
    let vals: Vec<f64> = (0..70_000).map(|i| i as f64 * 0.25).collect();
    let direct = PrimArr::from_vec(vals.clone());
    let base = Arc::new(PrimArr::from_vec(vals));
    let view = ShiftArr::new(base, 0).unwrap();
    let p = crate::ExecPolicy::default();
    assert_eq!(sum(&p, &direct).unwrap().to_bits(), sum(&p, &view).unwrap().to_bits());
}

#[test]
fn test_histogram_validation() {
    let arr = PrimArr::from_vec(vec![1i32]);
    let p = crate::ExecPolicy::default();
    assert_eq!(histogram(&p, &arr, 0.0, 1.0, 0).unwrap_err().kind(), ErrorKind::IllegalArgument);
    assert_eq!(histogram(&p, &arr, 1.0, 1.0, 4).unwrap_err().kind(), ErrorKind::IllegalArgument);
}
