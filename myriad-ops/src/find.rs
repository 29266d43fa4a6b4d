use myriad_arr::{check_range, ArrRead};
use myriad_base::{Prim, Result};

const FIND_BLOCK: usize = 65536;

/// First index in `[from, to)` whose element equals `v`, over any
/// readable view. Direct storage is scanned in place (memchr for
/// bytes); lazy views are pulled in block-sized chunks.
pub fn index_of<T: Prim>(
    arr: &(impl ArrRead<T> + ?Sized),
    from: i64,
    to: i64,
    v: T,
) -> Result<Option<i64>> {
    check_range(arr.len(), from, to.checked_sub(from).unwrap_or(-1))?;
    if let Some(s) = arr.as_direct() {
        return Ok(T::position(&s[from as usize..to as usize], v).map(|p| from + p as i64));
    }
    let mut buf = Vec::new();
    let mut pos = from;
    while pos < to {
        let m = ((to - pos) as usize).min(FIND_BLOCK);
        buf.resize(m, T::default());
        arr.read_at(pos, &mut buf[..m])?;
        if let Some(p) = T::position(&buf[..m], v) {
            return Ok(Some(pos + p as i64));
        }
        pos += m as i64;
    }
    Ok(None)
}

/// Last index in `[from, to)` whose element equals `v`; the backward
/// dual of [`index_of`].
pub fn last_index_of<T: Prim>(
    arr: &(impl ArrRead<T> + ?Sized),
    from: i64,
    to: i64,
    v: T,
) -> Result<Option<i64>> {
    check_range(arr.len(), from, to.checked_sub(from).unwrap_or(-1))?;
    if let Some(s) = arr.as_direct() {
        return Ok(T::rposition(&s[from as usize..to as usize], v).map(|p| from + p as i64));
    }
    let mut buf = Vec::new();
    let mut pos = to;
    while pos > from {
        let m = ((pos - from) as usize).min(FIND_BLOCK);
        let start = pos - m as i64;
        buf.resize(m, T::default());
        arr.read_at(start, &mut buf[..m])?;
        if let Some(p) = T::rposition(&buf[..m], v) {
            return Ok(Some(start + p as i64));
        }
        pos = start;
    }
    Ok(None)
}
