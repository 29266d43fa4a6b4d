// We want a few things here:
// 1. A way to create a new error with a backtrace
// 2. A closed set of error kinds that callers can match on at the API
//    boundary, without caring about the message text
// 3. A way to centralize logging / emitting error messages into the
//    tracing system as soon as an error is created

use backtrace_error::DynBacktraceError;
use std::borrow::Cow;
use tracing::error;

/// The closed taxonomy of failures visible at the library boundary.
/// There are no I/O errors: this library owns no files or sockets.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// An index or range fell outside the addressed array.
    IndexOutOfBounds,
    /// A negative count, mismatched argument lengths, or similar.
    IllegalArgument,
    /// Element kinds of two arrays in one bulk call disagree.
    TypeMismatch,
    /// A write reached a read-only array or view.
    ReadOnlyViolation,
    /// A constructed view or window would exceed 2^63 - 1 elements.
    TooLargeArray,
    /// Integer overflow detected by a checked reduction.
    ArithmeticOverflow,
    /// The operation is not defined for this configuration.
    Unsupported,
    /// An internal invariant broke; a bug in this library, not the caller.
    AssertionViolation,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::IndexOutOfBounds => "index out of bounds",
            ErrorKind::IllegalArgument => "illegal argument",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::ReadOnlyViolation => "read-only violation",
            ErrorKind::TooLargeArray => "too large array",
            ErrorKind::ArithmeticOverflow => "arithmetic overflow",
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::AssertionViolation => "assertion violation",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    #[allow(dead_code)]
    inner: DynBacktraceError,
}

pub type Result<T> = std::result::Result<T, Error>;

struct KindedErr {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl std::fmt::Debug for KindedErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.msg)
    }
}

impl std::fmt::Display for KindedErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.msg)
    }
}

impl std::error::Error for KindedErr {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Error {
    pub fn new<E: std::error::Error + Send + Sync + 'static>(kind: ErrorKind, err: E) -> Error {
        error!(target: "myriad", "{:?}", err);
        let inner = DynBacktraceError::from(err);
        Error { kind, inner }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub fn err(kind: ErrorKind, msg: impl Into<Cow<'static, str>>) -> Error {
    let msg = msg.into();
    Error::new(kind, KindedErr { kind, msg })
}

pub fn oob(msg: impl Into<Cow<'static, str>>) -> Error {
    err(ErrorKind::IndexOutOfBounds, msg)
}

pub fn illegal(msg: impl Into<Cow<'static, str>>) -> Error {
    err(ErrorKind::IllegalArgument, msg)
}

pub fn mismatch(msg: impl Into<Cow<'static, str>>) -> Error {
    err(ErrorKind::TypeMismatch, msg)
}

pub fn read_only(msg: impl Into<Cow<'static, str>>) -> Error {
    err(ErrorKind::ReadOnlyViolation, msg)
}

pub fn too_large(msg: impl Into<Cow<'static, str>>) -> Error {
    err(ErrorKind::TooLargeArray, msg)
}

pub fn overflow(msg: impl Into<Cow<'static, str>>) -> Error {
    err(ErrorKind::ArithmeticOverflow, msg)
}

pub fn unsupported(msg: impl Into<Cow<'static, str>>) -> Error {
    err(ErrorKind::Unsupported, msg)
}

pub fn violated(msg: impl Into<Cow<'static, str>>) -> Error {
    err(ErrorKind::AssertionViolation, msg)
}

#[cfg(test)]
use test_log::test;

#[test]
fn test_error_kind() {
    let e = oob("index 10 out of range 0..5");
    assert_eq!(e.kind(), ErrorKind::IndexOutOfBounds);
    let e = err(ErrorKind::Unsupported, "index-of in mirror mode");
    assert_eq!(e.kind(), ErrorKind::Unsupported);
}
