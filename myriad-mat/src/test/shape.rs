use crate::{MatShape, Matrix};
use myriad_arr::PrimArr;
use myriad_base::ErrorKind;
use test_log::test;

#[test]
fn test_strides() {
    let s = MatShape::new(&[4, 3, 2]).unwrap();
    assert_eq!(s.dim_count(), 3);
    assert_eq!(s.size(), 24);
    assert_eq!(s.strides(), &[1, 4, 12]);
    assert_eq!(s.dim(1), 3);
}

#[test]
fn test_index_and_coords_roundtrip() {
    let s = MatShape::new(&[4, 3, 2]).unwrap();
    let mut c = [0i64; 3];
    for i in 0..24 {
        s.coords(i, &mut c).unwrap();
        assert_eq!(s.index(&c).unwrap(), i);
    }
    assert_eq!(s.index(&[3, 2, 1]).unwrap(), 23);
    assert_eq!(s.index(&[1, 1, 1]).unwrap(), 1 + 4 + 12);
}

#[test]
fn test_validation() {
    assert_eq!(MatShape::new(&[]).unwrap_err().kind(), ErrorKind::IllegalArgument);
    assert_eq!(MatShape::new(&[2, -1]).unwrap_err().kind(), ErrorKind::IllegalArgument);
    assert_eq!(
        MatShape::new(&[i64::MAX, 2]).unwrap_err().kind(),
        ErrorKind::TooLargeArray
    );
    let s = MatShape::new(&[4, 3]).unwrap();
    assert_eq!(s.index(&[4, 0]).unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
    assert_eq!(s.index(&[0]).unwrap_err().kind(), ErrorKind::IllegalArgument);
    assert!(!s.in_bounds(&[0, 3]));
    assert!(s.in_bounds(&[3, 2]));
}

#[test]
fn test_zero_dimension() {
    let s = MatShape::new(&[5, 0, 2]).unwrap();
    assert_eq!(s.size(), 0);
    assert_eq!(s.coords(0, &mut [0; 3]).unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
}

#[test]
fn test_matrix_binding() {
    let arr = PrimArr::from_vec((0..12i32).collect());
    let m = Matrix::new(arr, &[4, 3]).unwrap();
    assert_eq!(m.shape().size(), 12);
    let bad = PrimArr::from_vec((0..10i32).collect());
    assert_eq!(
        Matrix::new(bad, &[4, 3]).err().unwrap().kind(),
        ErrorKind::IllegalArgument
    );
}

#[test]
fn test_matrix_coordinate_access() {
    let arr = PrimArr::from_vec((0..12i32).collect());
    let mut m = Matrix::new(arr, &[4, 3]).unwrap();
    assert_eq!(m.get(&[1, 2]).unwrap(), 1 + 4 * 2);
    m.set(&[3, 0], -9).unwrap();
    assert_eq!(m.get(&[3, 0]).unwrap(), -9);
    assert_eq!(m.get(&[4, 0]).unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
}
