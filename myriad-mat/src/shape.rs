use myriad_base::{illegal, oob, too_large, Result};
use serde::{Deserialize, Serialize};

/// A d-dimensional shape: dimension vector plus precomputed strides.
///
/// The linear offset of coordinate `c` is `sum(c[k] * stride[k])` with
/// `stride[0] = 1` and `stride[k] = stride[k-1] * dim[k-1]`.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct MatShape {
    dim: Vec<i64>,
    stride: Vec<i64>,
    size: i64,
}

impl MatShape {
    pub fn new(dim: &[i64]) -> Result<Self> {
        if dim.is_empty() {
            return Err(illegal("shape needs at least one dimension"));
        }
        let mut stride = Vec::with_capacity(dim.len());
        let mut acc = 1i64;
        for (k, d) in dim.iter().enumerate() {
            if *d < 0 {
                return Err(illegal(format!("negative dimension {d} at axis {k}")));
            }
            stride.push(acc);
            acc = acc
                .checked_mul(*d)
                .ok_or_else(|| too_large("shape size exceeds 2^63 - 1"))?;
        }
        Ok(MatShape { dim: dim.to_vec(), stride, size: acc })
    }

    pub fn dim_count(&self) -> usize {
        self.dim.len()
    }

    pub fn dim(&self, k: usize) -> i64 {
        self.dim[k]
    }

    pub fn dims(&self) -> &[i64] {
        &self.dim
    }

    pub fn stride(&self, k: usize) -> i64 {
        self.stride[k]
    }

    pub fn strides(&self) -> &[i64] {
        &self.stride
    }

    /// Total number of elements, the product of all dimensions.
    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn in_bounds(&self, c: &[i64]) -> bool {
        c.len() == self.dim.len() && c.iter().zip(&self.dim).all(|(x, d)| *x >= 0 && x < d)
    }

    /// Linear offset of a coordinate vector.
    pub fn index(&self, c: &[i64]) -> Result<i64> {
        if c.len() != self.dim.len() {
            return Err(illegal(format!(
                "coordinate count {} does not match dimension count {}",
                c.len(),
                self.dim.len()
            )));
        }
        let mut acc = 0i64;
        for (k, x) in c.iter().enumerate() {
            if *x < 0 || *x >= self.dim[k] {
                return Err(oob(format!(
                    "coordinate {x} out of range 0..{} at axis {k}",
                    self.dim[k]
                )));
            }
            acc += x * self.stride[k];
        }
        Ok(acc)
    }

    /// Inverse of [`MatShape::index`]: coordinates of a linear offset.
    pub fn coords(&self, index: i64, out: &mut [i64]) -> Result<()> {
        if out.len() != self.dim.len() {
            return Err(illegal(format!(
                "coordinate count {} does not match dimension count {}",
                out.len(),
                self.dim.len()
            )));
        }
        if index < 0 || index >= self.size {
            return Err(oob(format!("index {index} out of range 0..{}", self.size)));
        }
        let mut rest = index;
        for (k, o) in out.iter_mut().enumerate() {
            if k + 1 < self.dim.len() {
                *o = rest % self.dim[k];
                rest /= self.dim[k];
            } else {
                *o = rest;
            }
        }
        Ok(())
    }
}
