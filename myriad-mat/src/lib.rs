// Multi-dimensional addressing over linear arrays.
//
// A MatShape maps coordinate vectors to linear offsets (column-major
// style: axis 0 is the fastest-varying "inner" axis). A Matrix binds a
// shape to an array of matching length. A Window is a virtual
// d-dimensional rectangle positioned anywhere relative to a base shape,
// including partly or wholly outside it; its continuation mode decides
// what the outside looks like (a constant, or the base reflected with
// period 2*dim per axis).
//
// The window is pure geometry: it owns no elements and is handed the
// backing storage on every read or write call. Bulk calls never
// translate element-by-element; they decompose the request into runs
// along the inner axis that live in a single base line, and handle each
// run with one or a few base-array bulk calls.

mod matrix;
mod shape;
mod window;

pub use matrix::Matrix;
pub use shape::MatShape;
pub use window::{Continuation, Translated, Window, WindowArr};

#[cfg(test)]
mod test;
