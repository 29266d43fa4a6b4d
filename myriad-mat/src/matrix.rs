use crate::shape::MatShape;
use crate::window::{Continuation, Window};
use myriad_base::{illegal, Result};
use myriad_arr::{ArrRead, ArrWrite};

/// An array bound to a shape of equal size.
pub struct Matrix<A> {
    arr: A,
    shape: MatShape,
}

impl<A> Matrix<A> {
    pub fn new<T>(arr: A, dim: &[i64]) -> Result<Self>
    where
        A: ArrRead<T>,
    {
        let shape = MatShape::new(dim)?;
        if shape.size() != arr.len() {
            return Err(illegal(format!(
                "shape size {} does not match array length {}",
                shape.size(),
                arr.len()
            )));
        }
        Ok(Matrix { arr, shape })
    }

    pub fn shape(&self) -> &MatShape {
        &self.shape
    }

    pub fn arr(&self) -> &A {
        &self.arr
    }

    pub fn arr_mut(&mut self) -> &mut A {
        &mut self.arr
    }

    pub fn into_arr(self) -> A {
        self.arr
    }

    /// Element at a coordinate vector.
    pub fn get<T>(&self, c: &[i64]) -> Result<T>
    where
        A: ArrRead<T>,
    {
        let i = self.shape.index(c)?;
        self.arr.get(i)
    }

    /// Write the element at a coordinate vector.
    pub fn set<T>(&mut self, c: &[i64], v: T) -> Result<()>
    where
        A: ArrWrite<T>,
    {
        let i = self.shape.index(c)?;
        self.arr.set(i, v)
    }

    /// Geometry of a window of shape `dim` at origin `pos` over this
    /// matrix.
    pub fn window(&self, pos: &[i64], dim: &[i64], mode: Continuation) -> Result<Window> {
        Window::new(&self.shape, pos, dim, mode)
    }
}
