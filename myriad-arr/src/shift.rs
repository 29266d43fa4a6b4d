use crate::arr::{check_index, check_range, ArrRead, BitRead};
use crate::concat::ConcatArr;
use myriad_base::{illegal, Result};
use myriad_base::ElementKind;
use std::sync::Arc;

/// Lazy cyclic shift: view element `i` reads source element
/// `(i - shift + len) mod len`. The shift is canonicalized into
/// `[0, len)` at construction.
pub struct ShiftArr<A: ?Sized> {
    base: Arc<A>,
    len: i64,
    shift: i64,
}

impl<A: ?Sized> ShiftArr<A> {
    pub fn new<T>(base: Arc<A>, shift: i64) -> Result<Self>
    where
        A: ArrRead<T>,
    {
        if base.is_growable() {
            return Err(illegal("cannot shift a growable array"));
        }
        let len = base.len();
        let shift = if len == 0 { 0 } else { shift.rem_euclid(len) };
        Ok(ShiftArr { base, len, shift })
    }

    /// The canonicalized shift in `[0, len)`.
    pub fn shift(&self) -> i64 {
        self.shift
    }

    /// Source position of view element `i`.
    fn source_pos(&self, i: i64) -> i64 {
        let p = i - self.shift;
        if p < 0 {
            p + self.len
        } else {
            p
        }
    }

    /// Sub-range view `[from, to)`, expressed over the source: one
    /// contiguous source piece when the image does not wrap, otherwise
    /// the tail piece followed by the head piece.
    pub fn range<T>(&self, from: i64, to: i64) -> Result<ConcatArr<A>>
    where
        A: ArrRead<T>,
    {
        check_range(self.len, from, to.checked_sub(from).unwrap_or(-1))?;
        let count = to - from;
        if count == 0 {
            return ConcatArr::from_clips::<T>(vec![(self.base.clone(), 0, 0)]);
        }
        let src_pos = self.source_pos(from);
        if src_pos + count <= self.len {
            ConcatArr::from_clips::<T>(vec![(self.base.clone(), src_pos, count)])
        } else {
            let first = self.len - src_pos;
            ConcatArr::from_clips::<T>(vec![
                (self.base.clone(), src_pos, first),
                (self.base.clone(), 0, count - first),
            ])
        }
    }
}

impl<T, A: ArrRead<T> + ?Sized> ArrRead<T> for ShiftArr<A> {
    fn len(&self) -> i64 {
        self.len
    }

    fn kind(&self) -> ElementKind {
        self.base.kind()
    }

    fn get(&self, i: i64) -> Result<T> {
        check_index(self.len, i)?;
        self.base.get(self.source_pos(i))
    }

    fn read_at(&self, pos: i64, dst: &mut [T]) -> Result<()> {
        check_range(self.len, pos, dst.len() as i64)?;
        if dst.is_empty() {
            return Ok(());
        }
        let src_pos = self.source_pos(pos);
        let first = ((self.len - src_pos) as usize).min(dst.len());
        self.base.read_at(src_pos, &mut dst[..first])?;
        if first < dst.len() {
            self.base.read_at(0, &mut dst[first..])?;
        }
        Ok(())
    }
}

impl<A: BitRead + ?Sized> BitRead for ShiftArr<A> {
    fn read_bits(&self, pos: i64, dst: &mut [u64], d_off: u64, count: i64) -> Result<()> {
        check_range(self.len, pos, count)?;
        if count == 0 {
            return Ok(());
        }
        let src_pos = self.source_pos(pos);
        let first = (self.len - src_pos).min(count);
        self.base.read_bits(src_pos, dst, d_off, first)?;
        if first < count {
            self.base.read_bits(0, dst, d_off + first as u64, count - first)?;
        }
        Ok(())
    }
}
