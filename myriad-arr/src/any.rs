use crate::arr::{ArrRead, ArrWrite};
use crate::bit::BitArr;
use crate::prim::PrimArr;
use myriad_base::{ElementKind, Prim, Result};

/// A typed array behind a runtime kind tag, for the operators that
/// dispatch per kind instead of monomorphizing at the call site.
/// Object arrays stay outside this enum: the library cannot widen or
/// compare opaque elements, so they only travel the generic paths.
pub enum AnyArr {
    Bit(BitArr),
    U8(PrimArr<u8>),
    C16(PrimArr<u16>),
    U16(PrimArr<u16>),
    I32(PrimArr<i32>),
    I64(PrimArr<i64>),
    F32(PrimArr<f32>),
    F64(PrimArr<f64>),
}

impl AnyArr {
    pub fn kind(&self) -> ElementKind {
        match self {
            AnyArr::Bit(_) => ElementKind::Bit,
            AnyArr::U8(_) => ElementKind::U8,
            AnyArr::C16(_) => ElementKind::C16,
            AnyArr::U16(_) => ElementKind::U16,
            AnyArr::I32(_) => ElementKind::I32,
            AnyArr::I64(_) => ElementKind::I64,
            AnyArr::F32(_) => ElementKind::F32,
            AnyArr::F64(_) => ElementKind::F64,
        }
    }

    pub fn len(&self) -> i64 {
        match self {
            AnyArr::Bit(a) => a.len(),
            AnyArr::U8(a) => a.len(),
            AnyArr::C16(a) | AnyArr::U16(a) => a.len(),
            AnyArr::I32(a) => a.len(),
            AnyArr::I64(a) => a.len(),
            AnyArr::F32(a) => a.len(),
            AnyArr::F64(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_mutable(&self) -> bool {
        match self {
            AnyArr::Bit(a) => a.is_mutable(),
            AnyArr::U8(a) => a.is_mutable(),
            AnyArr::C16(a) | AnyArr::U16(a) => a.is_mutable(),
            AnyArr::I32(a) => a.is_mutable(),
            AnyArr::I64(a) => a.is_mutable(),
            AnyArr::F32(a) => a.is_mutable(),
            AnyArr::F64(a) => a.is_mutable(),
        }
    }

    /// Element widened to `f64`; a bit reads as 0.0 or 1.0.
    pub fn get_f64(&self, i: i64) -> Result<f64> {
        Ok(match self {
            AnyArr::Bit(a) => {
                if a.get_bit(i)? {
                    1.0
                } else {
                    0.0
                }
            }
            AnyArr::U8(a) => a.get(i)?.widen_f64(),
            AnyArr::C16(a) | AnyArr::U16(a) => a.get(i)?.widen_f64(),
            AnyArr::I32(a) => a.get(i)?.widen_f64(),
            AnyArr::I64(a) => a.get(i)?.widen_f64(),
            AnyArr::F32(a) => a.get(i)?.widen_f64(),
            AnyArr::F64(a) => a.get(i)?,
        })
    }

    /// Saturating write of a widened value; a bit is set when `v != 0`.
    pub fn set_f64(&mut self, i: i64, v: f64) -> Result<()> {
        match self {
            AnyArr::Bit(a) => a.set_bit(i, v != 0.0),
            AnyArr::U8(a) => a.set(i, u8::from_f64(v)),
            AnyArr::C16(a) | AnyArr::U16(a) => a.set(i, u16::from_f64(v)),
            AnyArr::I32(a) => a.set(i, i32::from_f64(v)),
            AnyArr::I64(a) => a.set(i, i64::from_f64(v)),
            AnyArr::F32(a) => a.set(i, f32::from_f64(v)),
            AnyArr::F64(a) => a.set(i, v),
        }
    }
}

impl From<BitArr> for AnyArr {
    fn from(a: BitArr) -> Self {
        AnyArr::Bit(a)
    }
}

impl From<PrimArr<u8>> for AnyArr {
    fn from(a: PrimArr<u8>) -> Self {
        AnyArr::U8(a)
    }
}

impl From<PrimArr<u16>> for AnyArr {
    fn from(a: PrimArr<u16>) -> Self {
        // The runtime tag decides between the two u16-backed kinds.
        if a.kind() == ElementKind::C16 {
            AnyArr::C16(a)
        } else {
            AnyArr::U16(a)
        }
    }
}

impl From<PrimArr<i32>> for AnyArr {
    fn from(a: PrimArr<i32>) -> Self {
        AnyArr::I32(a)
    }
}

impl From<PrimArr<i64>> for AnyArr {
    fn from(a: PrimArr<i64>) -> Self {
        AnyArr::I64(a)
    }
}

impl From<PrimArr<f32>> for AnyArr {
    fn from(a: PrimArr<f32>) -> Self {
        AnyArr::F32(a)
    }
}

impl From<PrimArr<f64>> for AnyArr {
    fn from(a: PrimArr<f64>) -> Self {
        AnyArr::F64(a)
    }
}
