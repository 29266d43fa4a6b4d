use crate::arr::{check_index, check_range, ArrRead, ArrWrite};
use crate::raw::RawSlice;
use myriad_base::{illegal, mismatch, read_only, ElementKind, Prim, Result};

/// Fixed-width numeric array. The element kind is a runtime tag over
/// the storage type: `u16` storage may be tagged `U16` or `C16`, every
/// other type has exactly one tag.
pub struct PrimArr<T: Prim> {
    data: Vec<T>,
    kind: ElementKind,
    read_only: bool,
    growable: bool,
}

impl<T: Prim> PrimArr<T> {
    /// Fixed-length array of `len` zero elements.
    pub fn new(len: i64) -> Result<Self> {
        if len < 0 {
            return Err(illegal(format!("negative length {len}")));
        }
        Ok(PrimArr {
            data: vec![T::default(); len as usize],
            kind: T::KINDS[0],
            read_only: false,
            growable: false,
        })
    }

    /// Empty growable array.
    pub fn new_growable() -> Self {
        PrimArr {
            data: Vec::new(),
            kind: T::KINDS[0],
            read_only: false,
            growable: true,
        }
    }

    /// Fixed-length array taking ownership of `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        PrimArr { data, kind: T::KINDS[0], read_only: false, growable: false }
    }

    /// Growable array with room for `cap` elements before reallocating.
    pub fn with_capacity(cap: i64) -> Result<Self> {
        if cap < 0 {
            return Err(illegal(format!("negative capacity {cap}")));
        }
        Ok(PrimArr {
            data: Vec::with_capacity(cap as usize),
            kind: T::KINDS[0],
            read_only: false,
            growable: true,
        })
    }

    /// Materialize an independent fixed-length copy of any readable
    /// view of a compatible kind, including its kind tag.
    pub fn copy_of(src: &(impl ArrRead<T> + ?Sized)) -> Result<Self> {
        if !T::KINDS.contains(&src.kind()) {
            return Err(mismatch(format!(
                "kind {} is not valid for this storage type",
                src.kind().name()
            )));
        }
        let mut data = vec![T::default(); src.len() as usize];
        src.read_at(0, &mut data)?;
        Ok(PrimArr { data, kind: src.kind(), read_only: false, growable: false })
    }

    /// Re-tag the array with another kind valid for this storage type
    /// (e.g. tag `u16` storage as `C16`).
    pub fn with_kind(mut self, kind: ElementKind) -> Result<Self> {
        if !T::KINDS.contains(&kind) {
            return Err(mismatch(format!(
                "kind {} is not valid for this storage type",
                kind.name()
            )));
        }
        self.kind = kind;
        Ok(self)
    }

    /// Mark the array read-only; all later writes fail.
    pub fn freeze(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> {
        self.check_writable()?;
        Ok(&mut self.data)
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(read_only("write to read-only array"));
        }
        Ok(())
    }

    fn check_growable(&self) -> Result<()> {
        self.check_writable()?;
        if !self.growable {
            return Err(illegal("resize of fixed-length array"));
        }
        Ok(())
    }

    pub fn push(&mut self, v: T) -> Result<()> {
        self.check_growable()?;
        self.data.push(v);
        Ok(())
    }

    pub fn append(&mut self, src: &[T]) -> Result<()> {
        self.check_growable()?;
        self.data.extend_from_slice(src);
        Ok(())
    }

    /// Grow (zero-filling) or shrink to `new_len`.
    pub fn resize(&mut self, new_len: i64) -> Result<()> {
        self.check_growable()?;
        if new_len < 0 {
            return Err(illegal(format!("negative length {new_len}")));
        }
        self.data.resize(new_len as usize, T::default());
        Ok(())
    }

    pub fn trim(&mut self) {
        self.data.shrink_to_fit();
    }

    /// First index of `v` in `[from, to)`.
    pub fn index_of(&self, from: i64, to: i64, v: T) -> Result<Option<i64>> {
        check_range(self.len(), from, to.checked_sub(from).unwrap_or(-1))?;
        let hay = &self.data[from as usize..to as usize];
        Ok(T::position(hay, v).map(|p| from + p as i64))
    }

    /// Last index of `v` in `[from, to)`.
    pub fn last_index_of(&self, from: i64, to: i64, v: T) -> Result<Option<i64>> {
        check_range(self.len(), from, to.checked_sub(from).unwrap_or(-1))?;
        let hay = &self.data[from as usize..to as usize];
        Ok(T::rposition(hay, v).map(|p| from + p as i64))
    }

    /// Raw shared-mutation view for multi-threaded bulk writers. See
    /// [`RawSlice`] for the safety contract.
    pub fn raw(&mut self) -> Result<RawSlice<T>> {
        self.check_writable()?;
        Ok(RawSlice::new(&mut self.data))
    }
}

impl<T: Prim> ArrRead<T> for PrimArr<T> {
    fn len(&self) -> i64 {
        self.data.len() as i64
    }

    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn is_mutable(&self) -> bool {
        !self.read_only
    }

    fn is_growable(&self) -> bool {
        self.growable
    }

    fn get(&self, i: i64) -> Result<T> {
        check_index(self.len(), i)?;
        Ok(self.data[i as usize])
    }

    fn read_at(&self, pos: i64, dst: &mut [T]) -> Result<()> {
        check_range(self.len(), pos, dst.len() as i64)?;
        let pos = pos as usize;
        dst.copy_from_slice(&self.data[pos..pos + dst.len()]);
        Ok(())
    }

    fn as_direct(&self) -> Option<&[T]> {
        Some(&self.data)
    }
}

impl<T: Prim> ArrWrite<T> for PrimArr<T> {
    fn set(&mut self, i: i64, v: T) -> Result<()> {
        self.check_writable()?;
        check_index(self.len(), i)?;
        self.data[i as usize] = v;
        Ok(())
    }

    fn write_at(&mut self, pos: i64, src: &[T]) -> Result<()> {
        self.check_writable()?;
        check_range(self.len(), pos, src.len() as i64)?;
        let pos = pos as usize;
        self.data[pos..pos + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn fill(&mut self, from: i64, count: i64, v: T) -> Result<()> {
        self.check_writable()?;
        check_range(self.len(), from, count)?;
        let from = from as usize;
        for x in &mut self.data[from..from + count as usize] {
            *x = v;
        }
        Ok(())
    }
}
