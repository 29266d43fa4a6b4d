use crate::arr::{check_index, check_range, ArrRead, ArrWrite, BitRead, BitWrite};
use crate::raw::RawBits;
use myriad_base::{illegal, packed, read_only, ElementKind, Result};
use std::sync::atomic::AtomicU64;

/// Bit array packed into `u64` words: bit `i` at word `i / 64`,
/// position `i % 64`. The word count is always `ceil(len / 64)`;
/// readers treat unused high bits of the last word as don't-care, and
/// every sub-word writer preserves them.
pub struct BitArr {
    words: Vec<u64>,
    len: i64,
    read_only: bool,
    growable: bool,
}

impl BitArr {
    /// Fixed-length array of `len` zero bits.
    pub fn new(len: i64) -> Result<Self> {
        if len < 0 {
            return Err(illegal(format!("negative length {len}")));
        }
        Ok(BitArr {
            words: vec![0; packed::word_len(len as u64)],
            len,
            read_only: false,
            growable: false,
        })
    }

    /// Empty growable array.
    pub fn new_growable() -> Self {
        BitArr { words: Vec::new(), len: 0, read_only: false, growable: true }
    }

    pub fn from_bools(bits: &[bool]) -> Self {
        let mut words = vec![0; packed::word_len(bits.len() as u64)];
        packed::pack_bits_by(&mut words, 0, bits, |b| *b);
        BitArr { words, len: bits.len() as i64, read_only: false, growable: false }
    }

    /// Materialize an independent fixed-length copy of any readable
    /// bit view.
    pub fn copy_of(src: &(impl BitRead + ?Sized)) -> Result<Self> {
        let len = src.len();
        let mut words = vec![0; packed::word_len(len as u64)];
        src.read_bits(0, &mut words, 0, len)?;
        Ok(BitArr { words, len, read_only: false, growable: false })
    }

    /// Fixed-length array over existing words; `words.len()` must be
    /// exactly `ceil(len / 64)`.
    pub fn from_words(words: Vec<u64>, len: i64) -> Result<Self> {
        if len < 0 {
            return Err(illegal(format!("negative length {len}")));
        }
        if words.len() != packed::word_len(len as u64) {
            return Err(illegal(format!(
                "{} words cannot hold exactly {len} bits",
                words.len()
            )));
        }
        Ok(BitArr { words, len, read_only: false, growable: false })
    }

    pub fn freeze(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(read_only("write to read-only bit array"));
        }
        Ok(())
    }

    fn check_growable(&self) -> Result<()> {
        self.check_writable()?;
        if !self.growable {
            return Err(illegal("resize of fixed-length bit array"));
        }
        Ok(())
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn words_mut(&mut self) -> Result<&mut [u64]> {
        self.check_writable()?;
        Ok(&mut self.words)
    }

    /// Atomic view of the words, for writers that synchronize single
    /// bits instead of partitioning on word boundaries.
    pub fn atomic_words(&mut self) -> Result<&[AtomicU64]> {
        self.check_writable()?;
        Ok(packed::as_atomic(&mut self.words))
    }

    pub fn get_bit(&self, i: i64) -> Result<bool> {
        check_index(self.len, i)?;
        Ok(packed::get_bit(&self.words, i as u64))
    }

    pub fn set_bit(&mut self, i: i64, v: bool) -> Result<()> {
        self.check_writable()?;
        check_index(self.len, i)?;
        packed::set_bit(&mut self.words, i as u64, v);
        Ok(())
    }

    /// Number of one bits in `[from, to)`.
    pub fn cardinality(&self, from: i64, to: i64) -> Result<u64> {
        check_range(self.len, from, to.checked_sub(from).unwrap_or(-1))?;
        Ok(packed::cardinality(&self.words, from as u64, to as u64))
    }

    /// First index of a bit equal to `v` in `[from, to)`.
    pub fn index_of(&self, from: i64, to: i64, v: bool) -> Result<Option<i64>> {
        check_range(self.len, from, to.checked_sub(from).unwrap_or(-1))?;
        Ok(packed::index_of_bit(&self.words, from as u64, to as u64, v).map(|i| i as i64))
    }

    /// Last index of a bit equal to `v` in `[from, to)`.
    pub fn last_index_of(&self, from: i64, to: i64, v: bool) -> Result<Option<i64>> {
        check_range(self.len, from, to.checked_sub(from).unwrap_or(-1))?;
        Ok(packed::last_index_of_bit(&self.words, from as u64, to as u64, v).map(|i| i as i64))
    }

    pub fn push(&mut self, v: bool) -> Result<()> {
        self.check_growable()?;
        if self.len as u64 & 63 == 0 {
            self.words.push(0);
        }
        packed::set_bit(&mut self.words, self.len as u64, v);
        self.len += 1;
        Ok(())
    }

    /// Grow (zero-filling) or shrink to `new_len`.
    pub fn resize(&mut self, new_len: i64) -> Result<()> {
        self.check_growable()?;
        if new_len < 0 {
            return Err(illegal(format!("negative length {new_len}")));
        }
        let new_words = packed::word_len(new_len as u64);
        if new_len > self.len {
            // Clear the don't-care tail before exposing it as content.
            let old = self.len as u64;
            if self.words.len() as u64 * 64 > old {
                let limit = (self.words.len() as u64 * 64).min(new_len as u64);
                packed::fill_bits(&mut self.words, old, limit - old, false);
            }
        }
        self.words.resize(new_words, 0);
        self.len = new_len;
        Ok(())
    }

    pub fn trim(&mut self) {
        self.words.shrink_to_fit();
    }

    /// Raw shared-mutation view for multi-threaded bulk writers. See
    /// [`RawBits`] for the safety contract.
    pub fn raw(&mut self) -> Result<RawBits> {
        self.check_writable()?;
        let len = self.len;
        Ok(RawBits::new(&mut self.words, len))
    }
}

impl ArrRead<bool> for BitArr {
    fn len(&self) -> i64 {
        self.len
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Bit
    }

    fn is_mutable(&self) -> bool {
        !self.read_only
    }

    fn is_growable(&self) -> bool {
        self.growable
    }

    fn get(&self, i: i64) -> Result<bool> {
        self.get_bit(i)
    }

    fn read_at(&self, pos: i64, dst: &mut [bool]) -> Result<()> {
        check_range(self.len, pos, dst.len() as i64)?;
        let mut done = 0usize;
        while done < dst.len() {
            let m = (dst.len() - done).min(64);
            let bits =
                packed::get_bits64(&self.words, pos as u64 + done as u64, m as u32);
            for (j, d) in dst[done..done + m].iter_mut().enumerate() {
                *d = bits & (1u64 << j) != 0;
            }
            done += m;
        }
        Ok(())
    }
}

impl ArrWrite<bool> for BitArr {
    fn set(&mut self, i: i64, v: bool) -> Result<()> {
        self.set_bit(i, v)
    }

    fn write_at(&mut self, pos: i64, src: &[bool]) -> Result<()> {
        self.check_writable()?;
        check_range(self.len, pos, src.len() as i64)?;
        packed::pack_bits_by(&mut self.words, pos as u64, src, |b| *b);
        Ok(())
    }

    fn fill(&mut self, from: i64, count: i64, v: bool) -> Result<()> {
        self.check_writable()?;
        check_range(self.len, from, count)?;
        packed::fill_bits(&mut self.words, from as u64, count as u64, v);
        Ok(())
    }
}

impl BitRead for BitArr {
    fn read_bits(&self, pos: i64, dst: &mut [u64], d_off: u64, count: i64) -> Result<()> {
        check_range(self.len, pos, count)?;
        packed::copy_bits(dst, d_off, &self.words, pos as u64, count as u64);
        Ok(())
    }
}

impl BitWrite for BitArr {
    fn write_bits(&mut self, pos: i64, src: &[u64], s_off: u64, count: i64) -> Result<()> {
        self.check_writable()?;
        check_range(self.len, pos, count)?;
        packed::copy_bits(&mut self.words, pos as u64, src, s_off, count as u64);
        Ok(())
    }
}
