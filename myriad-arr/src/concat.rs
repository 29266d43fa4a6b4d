use crate::arr::{check_index, check_range, ArrRead, BitRead};
use myriad_base::{illegal, mismatch, too_large, ElementKind, Result};
use std::sync::Arc;

/// Lazy concatenation of same-kind arrays.
///
/// Holds one clipped piece per component plus the prefix-sum table
/// `starts[j]` of component start positions. Element `i` lives in the
/// component with the *largest* `j` such that `starts[j] <= i`; when
/// empty components create ties the last tied index wins, so lookups
/// never land in a zero-length piece.
pub struct ConcatArr<A: ?Sized> {
    pieces: Vec<Piece<A>>,
    starts: Vec<i64>,
    len: i64,
    kind: ElementKind,
}

struct Piece<A: ?Sized> {
    base: Arc<A>,
    off: i64,
    len: i64,
}

impl<A: ?Sized> Clone for Piece<A> {
    fn clone(&self) -> Self {
        Piece { base: self.base.clone(), off: self.off, len: self.len }
    }
}

impl<A: ?Sized> ConcatArr<A> {
    pub fn new<T>(parts: Vec<Arc<A>>) -> Result<Self>
    where
        A: ArrRead<T>,
    {
        if parts.is_empty() {
            return Err(illegal("concatenation of zero arrays"));
        }
        let kind = parts[0].kind();
        let mut pieces = Vec::with_capacity(parts.len());
        let mut starts = Vec::with_capacity(parts.len());
        let mut total = 0i64;
        for p in parts {
            if p.kind() != kind {
                return Err(mismatch(format!(
                    "cannot concatenate {} array with {} array",
                    kind.name(),
                    p.kind().name()
                )));
            }
            if p.is_growable() {
                return Err(illegal("cannot concatenate a growable array"));
            }
            starts.push(total);
            let len = p.len();
            total = total
                .checked_add(len)
                .ok_or_else(|| too_large("concatenated length exceeds 2^63 - 1"))?;
            pieces.push(Piece { base: p, off: 0, len });
        }
        Ok(ConcatArr { pieces, starts, len: total, kind })
    }

    /// Concatenation of explicit `(base, offset, len)` clips. Used by
    /// views whose sub-ranges decompose into base pieces.
    pub(crate) fn from_clips<T>(parts: Vec<(Arc<A>, i64, i64)>) -> Result<Self>
    where
        A: ArrRead<T>,
    {
        if parts.is_empty() {
            return Err(illegal("concatenation of zero arrays"));
        }
        let kind = parts[0].0.kind();
        let mut pieces = Vec::with_capacity(parts.len());
        let mut starts = Vec::with_capacity(parts.len());
        let mut total = 0i64;
        for (base, off, len) in parts {
            check_range(base.len(), off, len)?;
            starts.push(total);
            total = total
                .checked_add(len)
                .ok_or_else(|| too_large("concatenated length exceeds 2^63 - 1"))?;
            pieces.push(Piece { base, off, len });
        }
        Ok(ConcatArr { pieces, starts, len: total, kind })
    }

    /// Component index and local offset for element `i`: the last `j`
    /// with `starts[j] <= i`.
    pub fn locate(&self, i: i64) -> (usize, i64) {
        let j = self.starts.partition_point(|s| *s <= i) - 1;
        (j, i - self.starts[j])
    }

    pub fn component_count(&self) -> usize {
        self.pieces.len()
    }

    /// Sub-range view `[from, to)` that preserves the concatenation
    /// structure: pieces fully inside stay whole, boundary pieces are
    /// clipped, and a range inside a single component yields just that
    /// component's clipped piece.
    pub fn range(&self, from: i64, to: i64) -> Result<ConcatArr<A>> {
        check_range(self.len, from, to.checked_sub(from).unwrap_or(-1))?;
        if from == to {
            // Keep one empty piece so the table stays non-empty.
            let p = self.pieces[0].clone();
            return Ok(ConcatArr {
                pieces: vec![Piece { base: p.base, off: p.off, len: 0 }],
                starts: vec![0],
                len: 0,
                kind: self.kind,
            });
        }
        let mut pieces = Vec::new();
        let mut starts = Vec::new();
        let mut total = 0i64;
        let (mut j, mut local) = self.locate(from);
        let mut rem = to - from;
        while rem > 0 {
            let p = &self.pieces[j];
            let take = (p.len - local).min(rem);
            if take > 0 {
                starts.push(total);
                pieces.push(Piece { base: p.base.clone(), off: p.off + local, len: take });
                total += take;
                rem -= take;
            }
            j += 1;
            local = 0;
        }
        Ok(ConcatArr { pieces, starts, len: total, kind: self.kind })
    }
}

impl<T, A: ArrRead<T> + ?Sized> ArrRead<T> for ConcatArr<A> {
    fn len(&self) -> i64 {
        self.len
    }

    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn get(&self, i: i64) -> Result<T> {
        check_index(self.len, i)?;
        let (j, local) = self.locate(i);
        self.pieces[j].base.get(self.pieces[j].off + local)
    }

    fn read_at(&self, pos: i64, dst: &mut [T]) -> Result<()> {
        check_range(self.len, pos, dst.len() as i64)?;
        if dst.is_empty() {
            return Ok(());
        }
        let (mut j, mut local) = self.locate(pos);
        let mut done = 0usize;
        while done < dst.len() {
            let p = &self.pieces[j];
            let take = ((p.len - local) as usize).min(dst.len() - done);
            if take > 0 {
                p.base.read_at(p.off + local, &mut dst[done..done + take])?;
                done += take;
            }
            j += 1;
            local = 0;
        }
        Ok(())
    }
}

impl<A: BitRead + ?Sized> BitRead for ConcatArr<A> {
    fn read_bits(&self, pos: i64, dst: &mut [u64], d_off: u64, count: i64) -> Result<()> {
        check_range(self.len, pos, count)?;
        if count == 0 {
            return Ok(());
        }
        let (mut j, mut local) = self.locate(pos);
        let mut done = 0i64;
        while done < count {
            let p = &self.pieces[j];
            let take = (p.len - local).min(count - done);
            if take > 0 {
                p.base.read_bits(p.off + local, dst, d_off + done as u64, take)?;
                done += take;
            }
            j += 1;
            local = 0;
        }
        Ok(())
    }
}
