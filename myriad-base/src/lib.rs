mod error;
mod kind;
pub mod packed;

pub use error::{
    err, illegal, mismatch, oob, overflow, read_only, too_large, unsupported, violated, Error,
    ErrorKind, Result,
};
pub use kind::{Element, ElementKind, Prim};
