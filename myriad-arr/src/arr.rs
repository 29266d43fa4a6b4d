use std::sync::Arc;

use myriad_base::{illegal, oob, packed, ElementKind, Result};

/// Bounds check for a single element index.
pub fn check_index(len: i64, i: i64) -> Result<()> {
    if i < 0 || i >= len {
        return Err(oob(format!("index {i} out of range 0..{len}")));
    }
    Ok(())
}

/// Argument check for a count that must be non-negative.
pub fn check_count(count: i64) -> Result<()> {
    if count < 0 {
        return Err(illegal(format!("negative count {count}")));
    }
    Ok(())
}

/// Bounds check for a bulk range `[pos, pos + count)`.
pub fn check_range(len: i64, pos: i64, count: i64) -> Result<()> {
    check_count(count)?;
    if pos < 0 {
        return Err(oob(format!("position {pos} is negative")));
    }
    match pos.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(oob(format!("range {pos}..{pos}+{count} out of range 0..{len}"))),
    }
}

/// Shared read access to a linear array of `T` elements.
///
/// Implemented by the storage types and by every lazy view, so bulk
/// operators can be written once against this contract.
pub trait ArrRead<T>: Send + Sync {
    fn len(&self) -> i64;

    fn kind(&self) -> ElementKind;

    /// Whether writes are possible at all through some access path.
    /// Views and frozen arrays report false.
    fn is_mutable(&self) -> bool {
        false
    }

    /// Whether the array can change length. Views require this to be
    /// false for every source.
    fn is_growable(&self) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, i: i64) -> Result<T>;

    /// Bulk read of `dst.len()` elements starting at `pos`. Fails
    /// before touching `dst` if the range is invalid.
    fn read_at(&self, pos: i64, dst: &mut [T]) -> Result<()>;

    /// Direct access: the whole array as one host slice, when the
    /// backing storage is contiguous. Bulk operators use this to skip
    /// a copy; lazy views return `None`.
    fn as_direct(&self) -> Option<&[T]> {
        None
    }
}

/// Exclusive write access to a linear array of `T` elements.
pub trait ArrWrite<T>: ArrRead<T> {
    fn set(&mut self, i: i64, v: T) -> Result<()>;

    /// Bulk write of `src.len()` elements starting at `pos`. Fails
    /// before touching the destination if the range is invalid.
    fn write_at(&mut self, pos: i64, src: &[T]) -> Result<()>;

    fn fill(&mut self, from: i64, count: i64, v: T) -> Result<()>;
}

/// Word-bulk read access to a bit array. The default implementation
/// funnels through element reads; packed storage overrides it with
/// word-level copies.
pub trait BitRead: ArrRead<bool> {
    /// Read `count` bits starting at array position `pos` into `dst`
    /// at bit offset `d_off`.
    fn read_bits(&self, pos: i64, dst: &mut [u64], d_off: u64, count: i64) -> Result<()> {
        check_range(self.len(), pos, count)?;
        let mut buf = [false; 1024];
        let mut done = 0i64;
        while done < count {
            let m = ((count - done) as usize).min(1024);
            self.read_at(pos + done, &mut buf[..m])?;
            packed::pack_bits_by(dst, d_off + done as u64, &buf[..m], |b| *b);
            done += m as i64;
        }
        Ok(())
    }
}

/// Word-bulk write access to a bit array.
pub trait BitWrite: ArrWrite<bool> + BitRead {
    /// Write `count` bits read from `src` at bit offset `s_off` into
    /// the array starting at position `pos`.
    fn write_bits(&mut self, pos: i64, src: &[u64], s_off: u64, count: i64) -> Result<()>;
}

/// A non-owning window over a sub-range of another array.
pub struct SubArr<A: ?Sized> {
    base: Arc<A>,
    off: i64,
    len: i64,
}

impl<A: ?Sized> SubArr<A> {
    /// Window of `count` elements starting at `pos`.
    pub fn new<T>(base: Arc<A>, pos: i64, count: i64) -> Result<Self>
    where
        A: ArrRead<T>,
    {
        check_range(base.len(), pos, count)?;
        if base.is_growable() {
            return Err(illegal("cannot take a sub-array of a growable array"));
        }
        Ok(SubArr { base, off: pos, len: count })
    }

    /// Window of the half-open range `[from, to)`.
    pub fn range<T>(base: Arc<A>, from: i64, to: i64) -> Result<Self>
    where
        A: ArrRead<T>,
    {
        if to < from {
            return Err(illegal(format!("range end {to} below start {from}")));
        }
        Self::new(base, from, to - from)
    }

    pub fn base(&self) -> &Arc<A> {
        &self.base
    }

    pub fn offset(&self) -> i64 {
        self.off
    }
}

impl<T, A: ArrRead<T> + ?Sized> ArrRead<T> for SubArr<A> {
    fn len(&self) -> i64 {
        self.len
    }

    fn kind(&self) -> ElementKind {
        self.base.kind()
    }

    fn get(&self, i: i64) -> Result<T> {
        check_index(self.len, i)?;
        self.base.get(self.off + i)
    }

    fn read_at(&self, pos: i64, dst: &mut [T]) -> Result<()> {
        check_range(self.len, pos, dst.len() as i64)?;
        self.base.read_at(self.off + pos, dst)
    }

    fn as_direct(&self) -> Option<&[T]> {
        self.base
            .as_direct()
            .map(|s| &s[self.off as usize..(self.off + self.len) as usize])
    }
}

impl<A: BitRead + ?Sized> BitRead for SubArr<A> {
    fn read_bits(&self, pos: i64, dst: &mut [u64], d_off: u64, count: i64) -> Result<()> {
        check_range(self.len, pos, count)?;
        self.base.read_bits(self.off + pos, dst, d_off, count)
    }
}

/// A read-only wrapper: the write traits are simply absent, and
/// `is_mutable` reports false no matter what it wraps.
pub struct Frozen<A: ?Sized> {
    base: Arc<A>,
}

impl<A: ?Sized> Frozen<A> {
    pub fn new(base: Arc<A>) -> Self {
        Frozen { base }
    }
}

impl<T, A: ArrRead<T> + ?Sized> ArrRead<T> for Frozen<A> {
    fn len(&self) -> i64 {
        self.base.len()
    }

    fn kind(&self) -> ElementKind {
        self.base.kind()
    }

    fn get(&self, i: i64) -> Result<T> {
        self.base.get(i)
    }

    fn read_at(&self, pos: i64, dst: &mut [T]) -> Result<()> {
        self.base.read_at(pos, dst)
    }

    fn as_direct(&self) -> Option<&[T]> {
        self.base.as_direct()
    }
}

impl<A: BitRead + ?Sized> BitRead for Frozen<A> {
    fn read_bits(&self, pos: i64, dst: &mut [u64], d_off: u64, count: i64) -> Result<()> {
        self.base.read_bits(pos, dst, d_off, count)
    }
}
