use crate::arr::{check_index, check_range, ArrRead, ArrWrite};
use myriad_base::{illegal, read_only, ElementKind, Result};

/// Array of opaque elements. The library never inspects the values; it
/// only moves and clones them, and ordering comes from the caller.
pub struct ObjArr<T> {
    data: Vec<T>,
    read_only: bool,
    growable: bool,
}

impl<T: Clone + Send + Sync + 'static> ObjArr<T> {
    /// Fixed-length array of `len` clones of `fill`.
    pub fn new(len: i64, fill: T) -> Result<Self> {
        if len < 0 {
            return Err(illegal(format!("negative length {len}")));
        }
        Ok(ObjArr { data: vec![fill; len as usize], read_only: false, growable: false })
    }

    pub fn new_growable() -> Self {
        ObjArr { data: Vec::new(), read_only: false, growable: true }
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        ObjArr { data, read_only: false, growable: false }
    }

    /// Materialize an independent fixed-length copy of any readable
    /// view of objects.
    pub fn copy_of(src: &(impl ArrRead<T> + ?Sized)) -> Result<Self> {
        let n = src.len();
        if n == 0 {
            return Ok(ObjArr::from_vec(Vec::new()));
        }
        let mut data = vec![src.get(0)?; n as usize];
        src.read_at(0, &mut data)?;
        Ok(ObjArr::from_vec(data))
    }

    pub fn freeze(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(read_only("write to read-only object array"));
        }
        Ok(())
    }

    pub fn push(&mut self, v: T) -> Result<()> {
        self.check_writable()?;
        if !self.growable {
            return Err(illegal("resize of fixed-length object array"));
        }
        self.data.push(v);
        Ok(())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// In-place access without cloning.
    pub fn get_ref(&self, i: i64) -> Result<&T> {
        check_index(self.data.len() as i64, i)?;
        Ok(&self.data[i as usize])
    }
}

impl<T: Clone + Send + Sync + 'static> ArrRead<T> for ObjArr<T> {
    fn len(&self) -> i64 {
        self.data.len() as i64
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Object
    }

    fn is_mutable(&self) -> bool {
        !self.read_only
    }

    fn is_growable(&self) -> bool {
        self.growable
    }

    fn get(&self, i: i64) -> Result<T> {
        check_index(self.data.len() as i64, i)?;
        Ok(self.data[i as usize].clone())
    }

    fn read_at(&self, pos: i64, dst: &mut [T]) -> Result<()> {
        check_range(self.data.len() as i64, pos, dst.len() as i64)?;
        let pos = pos as usize;
        dst.clone_from_slice(&self.data[pos..pos + dst.len()]);
        Ok(())
    }

    fn as_direct(&self) -> Option<&[T]> {
        Some(&self.data)
    }
}

impl<T: Clone + Send + Sync + 'static> ArrWrite<T> for ObjArr<T> {
    fn set(&mut self, i: i64, v: T) -> Result<()> {
        self.check_writable()?;
        check_index(self.data.len() as i64, i)?;
        self.data[i as usize] = v;
        Ok(())
    }

    fn write_at(&mut self, pos: i64, src: &[T]) -> Result<()> {
        self.check_writable()?;
        check_range(self.data.len() as i64, pos, src.len() as i64)?;
        let pos = pos as usize;
        self.data[pos..pos + src.len()].clone_from_slice(src);
        Ok(())
    }

    fn fill(&mut self, from: i64, count: i64, v: T) -> Result<()> {
        self.check_writable()?;
        check_range(self.data.len() as i64, from, count)?;
        let from = from as usize;
        for x in &mut self.data[from..from + count as usize] {
            *x = v.clone();
        }
        Ok(())
    }
}
