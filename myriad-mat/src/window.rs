use crate::shape::MatShape;
use myriad_arr::{check_range, ArrRead, ArrWrite, BitRead, BitWrite};
use myriad_base::{illegal, oob, packed, too_large, unsupported, violated, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a window element whose base coordinate falls outside the base
/// looks like.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Continuation {
    /// Reads outside the base return a constant; writes there vanish.
    Constant,
    /// The base reflected across each axis with period `2 * dim[k]`;
    /// every window element has a real base image.
    MirrorCyclic,
}

/// Result of translating a window index into the base.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Translated {
    Inside(i64),
    Outside,
}

/// Mirrored write chunks stage through a scratch buffer of at most this
/// many elements (or this many 64-bit words for bit arrays).
const SCRATCH: usize = 8192;

/// A virtual d-dimensional rectangle of shape `dim` at origin `pos`
/// relative to a base shape, addressed by its own linear index. Pure
/// geometry: element storage is passed to each access call.
///
/// In constant mode, leading axes that exactly cover the base
/// (`pos[k] == 0 && dim[k] == base_dim[k]`) are collapsed into one flat
/// inner axis at construction, shortening every per-line loop. Mirror
/// mode never collapses; reflection is per-axis.
pub struct Window {
    mode: Continuation,
    orig_pos: Vec<i64>,
    orig_dim: Vec<i64>,
    // Post-collapse working geometry. base_stride[0] is always 1.
    pos: Vec<i64>,
    dim: Vec<i64>,
    base_dim: Vec<i64>,
    base_stride: Vec<i64>,
    size: i64,
    base_size: i64,
    debug_checks: bool,
}

/// Reflection of coordinate `bc` about a base extent `d` with period
/// `2 * d`; total for any signed 64-bit input.
fn reflect(bc: i64, d: i64) -> i64 {
    let period = 2i128 * d as i128;
    let t = (bc as i128).rem_euclid(period);
    if t < d as i128 {
        t as i64
    } else {
        (period - 1 - t) as i64
    }
}

impl Window {
    pub fn new(base: &MatShape, pos: &[i64], dim: &[i64], mode: Continuation) -> Result<Self> {
        let d = base.dim_count();
        if pos.len() != d || dim.len() != d {
            return Err(illegal(format!(
                "window pos/dim counts {}/{} do not match base dimension count {d}",
                pos.len(),
                dim.len()
            )));
        }
        let mut size = 1i64;
        for k in 0..d {
            if dim[k] < 0 {
                return Err(illegal(format!("negative window dimension {} at axis {k}", dim[k])));
            }
            if pos[k].checked_add(dim[k]).is_none() {
                return Err(illegal(format!(
                    "window end overflows at axis {k}: pos {} + dim {}",
                    pos[k], dim[k]
                )));
            }
            size = size
                .checked_mul(dim[k])
                .ok_or_else(|| too_large("window size exceeds 2^63 - 1"))?;
        }
        if mode == Continuation::MirrorCyclic && size > 0 {
            for k in 0..d {
                if base.dim(k) == 0 {
                    return Err(illegal(
                        "mirror-cyclic continuation over an empty base dimension",
                    ));
                }
            }
        }

        // Collapse the leading trivial axes in constant mode.
        let mut c = 0;
        if mode == Continuation::Constant {
            while c < d && pos[c] == 0 && dim[c] == base.dim(c) {
                c += 1;
            }
            if c < 2 {
                c = 0;
            }
        }
        let (w_pos, w_dim, w_bdim, w_stride) = if c >= 2 {
            let fat: i64 = dim[..c].iter().product();
            let mut w_pos = vec![0];
            let mut w_dim = vec![fat];
            let mut w_bdim = vec![fat];
            let mut w_stride = vec![1];
            w_pos.extend_from_slice(&pos[c..]);
            w_dim.extend_from_slice(&dim[c..]);
            w_bdim.extend_from_slice(&base.dims()[c..]);
            w_stride.extend_from_slice(&base.strides()[c..]);
            (w_pos, w_dim, w_bdim, w_stride)
        } else {
            (pos.to_vec(), dim.to_vec(), base.dims().to_vec(), base.strides().to_vec())
        };

        Ok(Window {
            mode,
            orig_pos: pos.to_vec(),
            orig_dim: dim.to_vec(),
            pos: w_pos,
            dim: w_dim,
            base_dim: w_bdim,
            base_stride: w_stride,
            size,
            base_size: base.size(),
            debug_checks: false,
        })
    }

    /// Re-derive the incremental walk state by division on every line
    /// and chunk, asserting agreement. Slower; meant for test runs.
    pub fn with_debug_checks(mut self, on: bool) -> Self {
        self.debug_checks = on;
        self
    }

    pub fn mode(&self) -> Continuation {
        self.mode
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn pos(&self) -> &[i64] {
        &self.orig_pos
    }

    pub fn dim(&self) -> &[i64] {
        &self.orig_dim
    }

    fn check_base_len(&self, len: i64) -> Result<()> {
        if len != self.base_size {
            return Err(illegal(format!(
                "base array length {len} does not match base shape size {}",
                self.base_size
            )));
        }
        Ok(())
    }

    /// Base index of window element `index`, or [`Translated::Outside`]
    /// in constant mode when any base coordinate leaves the base.
    pub fn translate(&self, index: i64) -> Result<Translated> {
        if index < 0 || index >= self.size {
            return Err(oob(format!("window index {index} out of range 0..{}", self.size)));
        }
        let d = self.dim.len();
        let mut rest = index;
        let mut acc = 0i64;
        for k in 0..d {
            let sub = if k + 1 < d { rest % self.dim[k] } else { rest };
            rest = if k + 1 < d { rest / self.dim[k] } else { 0 };
            let bc = self.pos[k] + sub;
            match self.mode {
                Continuation::Constant => {
                    if bc < 0 || bc >= self.base_dim[k] {
                        return Ok(Translated::Outside);
                    }
                    acc += bc * self.base_stride[k];
                }
                Continuation::MirrorCyclic => {
                    acc += reflect(bc, self.base_dim[k]) * self.base_stride[k];
                }
            }
        }
        Ok(Translated::Inside(acc))
    }

    /// Outer (axis >= 1) window coordinates of a line, by division.
    fn outer_coords(&self, line: i64) -> Vec<i64> {
        let d = self.dim.len();
        let mut out = vec![0i64; d.saturating_sub(1)];
        let mut rest = line;
        for k in 1..d {
            if k + 1 < d {
                out[k - 1] = rest % self.dim[k];
                rest /= self.dim[k];
            } else {
                out[k - 1] = rest;
            }
        }
        out
    }

    /// Base offset of a line (axes >= 1 translated), or `None` when the
    /// whole line lies outside in constant mode.
    fn line_base(&self, outer: &[i64]) -> Option<i64> {
        let d = self.dim.len();
        let mut acc = 0i64;
        for k in 1..d {
            let bc = self.pos[k] + outer[k - 1];
            match self.mode {
                Continuation::Constant => {
                    if bc < 0 || bc >= self.base_dim[k] {
                        return None;
                    }
                    acc += bc * self.base_stride[k];
                }
                Continuation::MirrorCyclic => {
                    acc += reflect(bc, self.base_dim[k]) * self.base_stride[k];
                }
            }
        }
        Some(acc)
    }

    /// Walk the window range `[pos, pos + count)` line by line, calling
    /// `f(line_start, a, b, base_line)` for the in-line range `[a, b)`.
    /// Outer coordinates advance incrementally with carry; the
    /// debug-checks toggle re-derives them by division and asserts.
    fn walk<R>(
        &self,
        pos: i64,
        count: i64,
        f: &mut dyn FnMut(i64, i64, i64, Option<i64>) -> Result<Option<R>>,
    ) -> Result<Option<R>> {
        if count == 0 {
            return Ok(None);
        }
        let d = self.dim.len();
        let dim0 = self.dim[0];
        let mut line = pos / dim0;
        let mut a = pos % dim0;
        let mut outer = self.outer_coords(line);
        let mut remaining = count;
        loop {
            if self.debug_checks && self.outer_coords(line) != outer {
                return Err(violated("window walk state diverged from division"));
            }
            let b = a.saturating_add(remaining).min(dim0);
            let base_line = self.line_base(&outer);
            if let Some(r) = f(line * dim0, a, b, base_line)? {
                return Ok(Some(r));
            }
            remaining -= b - a;
            if remaining == 0 {
                return Ok(None);
            }
            a = 0;
            line += 1;
            for k in 1..d {
                outer[k - 1] += 1;
                if outer[k - 1] < self.dim[k] {
                    break;
                }
                outer[k - 1] = 0;
            }
        }
    }

    /// As [`Window::walk`] but visiting lines from last to first, for
    /// backward searches. Within a line, `[a, b)` is still ascending.
    fn walk_rev<R>(
        &self,
        pos: i64,
        count: i64,
        f: &mut dyn FnMut(i64, i64, i64, Option<i64>) -> Result<Option<R>>,
    ) -> Result<Option<R>> {
        if count == 0 {
            return Ok(None);
        }
        let d = self.dim.len();
        let dim0 = self.dim[0];
        let end = pos + count;
        let mut line = (end - 1) / dim0;
        let mut b = (end - 1) % dim0 + 1;
        let mut outer = self.outer_coords(line);
        let mut remaining = count;
        loop {
            if self.debug_checks && self.outer_coords(line) != outer {
                return Err(violated("window walk state diverged from division"));
            }
            let a = (b - remaining).max(0);
            let base_line = self.line_base(&outer);
            if let Some(r) = f(line * dim0, a, b, base_line)? {
                return Ok(Some(r));
            }
            remaining -= b - a;
            if remaining == 0 {
                return Ok(None);
            }
            b = dim0;
            line -= 1;
            for k in 1..d {
                if outer[k - 1] > 0 {
                    outer[k - 1] -= 1;
                    break;
                }
                outer[k - 1] = self.dim[k] - 1;
            }
        }
    }

    /// In-line split for constant mode: window coordinates `[a, b)`
    /// become leading-outside `[a, lead)`, in-base `[lead, fin)` and
    /// trailing-outside `[fin, b)`.
    fn const_split(&self, a: i64, b: i64) -> (i64, i64) {
        let pos0 = self.pos[0];
        let lead = pos0.checked_neg().unwrap_or(i64::MAX).clamp(a, b);
        let fin = self.base_dim[0].saturating_sub(pos0).clamp(lead, b);
        (lead, fin)
    }

    pub fn get<T: Clone>(
        &self,
        base: &(impl ArrRead<T> + ?Sized),
        outside: T,
        index: i64,
    ) -> Result<T> {
        self.check_base_len(base.len())?;
        match self.translate(index)? {
            Translated::Inside(i) => base.get(i),
            Translated::Outside => Ok(outside),
        }
    }

    /// Write one element; in constant mode a write landing outside the
    /// base is silently dropped.
    pub fn set<T>(
        &self,
        base: &mut (impl ArrWrite<T> + ?Sized),
        index: i64,
        v: T,
    ) -> Result<()> {
        self.check_base_len(base.len())?;
        match self.translate(index)? {
            Translated::Inside(i) => base.set(i, v),
            Translated::Outside => Ok(()),
        }
    }

    /// Bulk read of `dst.len()` window elements starting at `pos`.
    /// `outside` fills constant-mode gaps and is ignored by mirror mode.
    pub fn read<T: Clone>(
        &self,
        base: &(impl ArrRead<T> + ?Sized),
        outside: T,
        pos: i64,
        dst: &mut [T],
    ) -> Result<()> {
        self.check_base_len(base.len())?;
        check_range(self.size, pos, dst.len() as i64)?;
        if dst.is_empty() {
            return Ok(());
        }
        let mut done = 0usize;
        match self.mode {
            Continuation::Constant => {
                let pos0 = self.pos[0];
                self.walk::<()>(pos, dst.len() as i64, &mut |_, a, b, bl| {
                    let len = (b - a) as usize;
                    let seg = &mut dst[done..done + len];
                    match bl {
                        None => {
                            for x in seg.iter_mut() {
                                *x = outside.clone();
                            }
                        }
                        Some(bl) => {
                            let (lead, fin) = self.const_split(a, b);
                            let li = (lead - a) as usize;
                            let fi = (fin - a) as usize;
                            for x in seg[..li].iter_mut() {
                                *x = outside.clone();
                            }
                            if fi > li {
                                base.read_at(bl + pos0 + lead, &mut seg[li..fi])?;
                            }
                            for x in seg[fi..].iter_mut() {
                                *x = outside.clone();
                            }
                        }
                    }
                    done += len;
                    Ok(None)
                })?;
            }
            Continuation::MirrorCyclic => {
                let pos0 = self.pos[0];
                let d0 = self.base_dim[0];
                let period = 2i128 * d0 as i128;
                self.walk::<()>(pos, dst.len() as i64, &mut |_, a, b, bl| {
                    let bl = bl.ok_or_else(|| violated("mirror line without base image"))?;
                    let mut t = (pos0 as i128 + a as i128).rem_euclid(period);
                    let mut x = a;
                    while x < b {
                        if self.debug_checks
                            && t != (pos0 as i128 + x as i128).rem_euclid(period)
                        {
                            return Err(violated("mirror walk state diverged from division"));
                        }
                        let k;
                        if t < d0 as i128 {
                            let tt = t as i64;
                            k = (d0 - tt).min(b - x);
                            base.read_at(bl + tt, &mut dst[done..done + k as usize])?;
                        } else {
                            let c = (period - 1 - t) as i64;
                            k = (c + 1).min(b - x);
                            let seg = &mut dst[done..done + k as usize];
                            base.read_at(bl + c - k + 1, seg)?;
                            seg.reverse();
                        }
                        done += k as usize;
                        x += k;
                        t += k as i128;
                        if t == period {
                            t = 0;
                        }
                    }
                    Ok(None)
                })?;
            }
        }
        Ok(())
    }

    /// Bulk write of `src.len()` window elements starting at `pos`.
    /// Constant mode drops the parts that land outside the base; mirror
    /// mode reverses reflected chunks through a scratch buffer so the
    /// base sees them in reflected order.
    pub fn write<T: Clone>(
        &self,
        base: &mut (impl ArrWrite<T> + ?Sized),
        pos: i64,
        src: &[T],
    ) -> Result<()> {
        self.check_base_len(base.len())?;
        check_range(self.size, pos, src.len() as i64)?;
        if src.is_empty() {
            return Ok(());
        }
        let mut done = 0usize;
        match self.mode {
            Continuation::Constant => {
                let pos0 = self.pos[0];
                self.walk::<()>(pos, src.len() as i64, &mut |_, a, b, bl| {
                    let len = (b - a) as usize;
                    if let Some(bl) = bl {
                        let (lead, fin) = self.const_split(a, b);
                        let li = (lead - a) as usize;
                        let fi = (fin - a) as usize;
                        if fi > li {
                            base.write_at(bl + pos0 + lead, &src[done + li..done + fi])?;
                        }
                    }
                    done += len;
                    Ok(None)
                })?;
            }
            Continuation::MirrorCyclic => {
                let pos0 = self.pos[0];
                let d0 = self.base_dim[0];
                let period = 2i128 * d0 as i128;
                let mut tmp: Vec<T> = Vec::new();
                self.walk::<()>(pos, src.len() as i64, &mut |_, a, b, bl| {
                    let bl = bl.ok_or_else(|| violated("mirror line without base image"))?;
                    let mut t = (pos0 as i128 + a as i128).rem_euclid(period);
                    let mut x = a;
                    while x < b {
                        let k;
                        if t < d0 as i128 {
                            let tt = t as i64;
                            k = (d0 - tt).min(b - x);
                            base.write_at(bl + tt, &src[done..done + k as usize])?;
                        } else {
                            let c = (period - 1 - t) as i64;
                            k = (c + 1).min(b - x).min(SCRATCH as i64);
                            tmp.clear();
                            tmp.extend_from_slice(&src[done..done + k as usize]);
                            tmp.reverse();
                            base.write_at(bl + c - k + 1, &tmp)?;
                        }
                        done += k as usize;
                        x += k;
                        t += k as i128;
                        if t == period {
                            t = 0;
                        }
                    }
                    Ok(None)
                })?;
            }
        }
        Ok(())
    }

    /// Fill `count` window elements from `from`. Constant mode fills
    /// only the parts inside the base; mirror mode needs at most two
    /// base calls per line, since further reflections repeat content.
    pub fn fill<T: Clone>(
        &self,
        base: &mut (impl ArrWrite<T> + ?Sized),
        from: i64,
        count: i64,
        v: T,
    ) -> Result<()> {
        self.check_base_len(base.len())?;
        check_range(self.size, from, count)?;
        if count == 0 {
            return Ok(());
        }
        match self.mode {
            Continuation::Constant => {
                let pos0 = self.pos[0];
                self.walk::<()>(from, count, &mut |_, a, b, bl| {
                    if let Some(bl) = bl {
                        let (lead, fin) = self.const_split(a, b);
                        if fin > lead {
                            base.fill(bl + pos0 + lead, fin - lead, v.clone())?;
                        }
                    }
                    Ok(None)
                })?;
            }
            Continuation::MirrorCyclic => {
                let pos0 = self.pos[0];
                let d0 = self.base_dim[0];
                let period = 2i128 * d0 as i128;
                self.walk::<()>(from, count, &mut |_, a, b, bl| {
                    let bl = bl.ok_or_else(|| violated("mirror line without base image"))?;
                    if (b - a) as i128 >= period {
                        base.fill(bl, d0, v.clone())?;
                        return Ok(None);
                    }
                    // Collect the touched base intervals and merge them;
                    // after merging there are at most two.
                    let mut ivs: Vec<(i64, i64)> = Vec::new();
                    let mut t = (pos0 as i128 + a as i128).rem_euclid(period);
                    let mut x = a;
                    while x < b {
                        let k;
                        if t < d0 as i128 {
                            let tt = t as i64;
                            k = (d0 - tt).min(b - x);
                            ivs.push((bl + tt, k));
                        } else {
                            let c = (period - 1 - t) as i64;
                            k = (c + 1).min(b - x);
                            ivs.push((bl + c - k + 1, k));
                        }
                        x += k;
                        t += k as i128;
                        if t == period {
                            t = 0;
                        }
                    }
                    ivs.sort_unstable();
                    let mut merged: Vec<(i64, i64)> = Vec::new();
                    for (s, n) in ivs {
                        match merged.last_mut() {
                            Some((ms, mn)) if s <= *ms + *mn => {
                                *mn = (*mn).max(s + n - *ms);
                            }
                            _ => merged.push((s, n)),
                        }
                    }
                    for (s, n) in merged {
                        base.fill(s, n, v.clone())?;
                    }
                    Ok(None)
                })?;
            }
        }
        Ok(())
    }

    /// First window index in `[from, to)` whose value equals `v`.
    ///
    /// When a line lies entirely outside the base and `v == outside`,
    /// the returned value is the first *window* index of that line in
    /// the searched range, not a base index. Mirror mode does not
    /// support searching: reflection breaks the monotonic scan, so
    /// callers materialize first.
    pub fn index_of<T: Clone + PartialEq>(
        &self,
        base: &(impl ArrRead<T> + ?Sized),
        outside: T,
        from: i64,
        to: i64,
        v: T,
    ) -> Result<Option<i64>> {
        if self.mode == Continuation::MirrorCyclic {
            return Err(unsupported("index-of over a mirror-cyclic window"));
        }
        self.check_base_len(base.len())?;
        check_range(self.size, from, to.checked_sub(from).unwrap_or(-1))?;
        let pos0 = self.pos[0];
        let mut scratch: Vec<T> = Vec::new();
        self.walk::<i64>(from, to - from, &mut |wl, a, b, bl| {
            match bl {
                None => {
                    if v == outside {
                        return Ok(Some(wl + a));
                    }
                }
                Some(bl) => {
                    let (lead, fin) = self.const_split(a, b);
                    if lead > a && v == outside {
                        return Ok(Some(wl + a));
                    }
                    let mut x = lead;
                    while x < fin {
                        let m = ((fin - x) as usize).min(SCRATCH);
                        scratch.clear();
                        scratch.resize(m, outside.clone());
                        base.read_at(bl + pos0 + x, &mut scratch[..m])?;
                        if let Some(p) = scratch[..m].iter().position(|e| *e == v) {
                            return Ok(Some(wl + x + p as i64));
                        }
                        x += m as i64;
                    }
                    if b > fin && v == outside {
                        return Ok(Some(wl + fin));
                    }
                }
            }
            Ok(None)
        })
    }

    /// Last window index in `[from, to)` whose value equals `v`; the
    /// backward dual of [`Window::index_of`], with the same outside and
    /// mirror-mode contracts.
    pub fn last_index_of<T: Clone + PartialEq>(
        &self,
        base: &(impl ArrRead<T> + ?Sized),
        outside: T,
        from: i64,
        to: i64,
        v: T,
    ) -> Result<Option<i64>> {
        if self.mode == Continuation::MirrorCyclic {
            return Err(unsupported("index-of over a mirror-cyclic window"));
        }
        self.check_base_len(base.len())?;
        check_range(self.size, from, to.checked_sub(from).unwrap_or(-1))?;
        let pos0 = self.pos[0];
        let mut scratch: Vec<T> = Vec::new();
        self.walk_rev::<i64>(from, to - from, &mut |wl, a, b, bl| {
            match bl {
                None => {
                    if v == outside {
                        return Ok(Some(wl + b - 1));
                    }
                }
                Some(bl) => {
                    let (lead, fin) = self.const_split(a, b);
                    if b > fin && v == outside {
                        return Ok(Some(wl + b - 1));
                    }
                    let mut x = fin;
                    while x > lead {
                        let m = ((x - lead) as usize).min(SCRATCH);
                        let start = x - m as i64;
                        scratch.clear();
                        scratch.resize(m, outside.clone());
                        base.read_at(bl + pos0 + start, &mut scratch[..m])?;
                        if let Some(p) = scratch[..m].iter().rposition(|e| *e == v) {
                            return Ok(Some(wl + start + p as i64));
                        }
                        x = start;
                    }
                    if lead > a && v == outside {
                        return Ok(Some(wl + lead - 1));
                    }
                }
            }
            Ok(None)
        })
    }

    /// Word-bulk read of `count` window bits starting at `pos` into
    /// `dst` at bit offset `d_off`.
    pub fn read_bits(
        &self,
        base: &(impl BitRead + ?Sized),
        outside: bool,
        pos: i64,
        dst: &mut [u64],
        d_off: u64,
        count: i64,
    ) -> Result<()> {
        self.check_base_len(base.len())?;
        check_range(self.size, pos, count)?;
        if count == 0 {
            return Ok(());
        }
        let mut done = 0u64;
        match self.mode {
            Continuation::Constant => {
                let pos0 = self.pos[0];
                self.walk::<()>(pos, count, &mut |_, a, b, bl| {
                    let len = (b - a) as u64;
                    match bl {
                        None => packed::fill_bits(dst, d_off + done, len, outside),
                        Some(bl) => {
                            let (lead, fin) = self.const_split(a, b);
                            packed::fill_bits(dst, d_off + done, (lead - a) as u64, outside);
                            if fin > lead {
                                base.read_bits(
                                    bl + pos0 + lead,
                                    dst,
                                    d_off + done + (lead - a) as u64,
                                    fin - lead,
                                )?;
                            }
                            packed::fill_bits(
                                dst,
                                d_off + done + (fin - a) as u64,
                                (b - fin) as u64,
                                outside,
                            );
                        }
                    }
                    done += len;
                    Ok(None)
                })?;
            }
            Continuation::MirrorCyclic => {
                let pos0 = self.pos[0];
                let d0 = self.base_dim[0];
                let period = 2i128 * d0 as i128;
                let mut tmp: Vec<u64> = Vec::new();
                self.walk::<()>(pos, count, &mut |_, a, b, bl| {
                    let bl = bl.ok_or_else(|| violated("mirror line without base image"))?;
                    let mut t = (pos0 as i128 + a as i128).rem_euclid(period);
                    let mut x = a;
                    while x < b {
                        let k;
                        if t < d0 as i128 {
                            let tt = t as i64;
                            k = (d0 - tt).min(b - x);
                            base.read_bits(bl + tt, dst, d_off + done, k)?;
                        } else {
                            let c = (period - 1 - t) as i64;
                            k = (c + 1).min(b - x).min((SCRATCH * 64) as i64);
                            tmp.clear();
                            tmp.resize(packed::word_len(k as u64), 0);
                            base.read_bits(bl + c - k + 1, &mut tmp, 0, k)?;
                            packed::reverse_bits(dst, d_off + done, &tmp, 0, k as u64);
                        }
                        done += k as u64;
                        x += k;
                        t += k as i128;
                        if t == period {
                            t = 0;
                        }
                    }
                    Ok(None)
                })?;
            }
        }
        Ok(())
    }

    /// Word-bulk write of `count` bits from `src` at bit offset `s_off`
    /// into the window starting at `pos`.
    pub fn write_bits(
        &self,
        base: &mut (impl BitWrite + ?Sized),
        pos: i64,
        src: &[u64],
        s_off: u64,
        count: i64,
    ) -> Result<()> {
        self.check_base_len(base.len())?;
        check_range(self.size, pos, count)?;
        if count == 0 {
            return Ok(());
        }
        let mut done = 0u64;
        match self.mode {
            Continuation::Constant => {
                let pos0 = self.pos[0];
                self.walk::<()>(pos, count, &mut |_, a, b, bl| {
                    if let Some(bl) = bl {
                        let (lead, fin) = self.const_split(a, b);
                        if fin > lead {
                            base.write_bits(
                                bl + pos0 + lead,
                                src,
                                s_off + done + (lead - a) as u64,
                                fin - lead,
                            )?;
                        }
                    }
                    done += (b - a) as u64;
                    Ok(None)
                })?;
            }
            Continuation::MirrorCyclic => {
                let pos0 = self.pos[0];
                let d0 = self.base_dim[0];
                let period = 2i128 * d0 as i128;
                let mut tmp: Vec<u64> = Vec::new();
                self.walk::<()>(pos, count, &mut |_, a, b, bl| {
                    let bl = bl.ok_or_else(|| violated("mirror line without base image"))?;
                    let mut t = (pos0 as i128 + a as i128).rem_euclid(period);
                    let mut x = a;
                    while x < b {
                        let k;
                        if t < d0 as i128 {
                            let tt = t as i64;
                            k = (d0 - tt).min(b - x);
                            base.write_bits(bl + tt, src, s_off + done, k)?;
                        } else {
                            let c = (period - 1 - t) as i64;
                            k = (c + 1).min(b - x).min((SCRATCH * 64) as i64);
                            tmp.clear();
                            tmp.resize(packed::word_len(k as u64), 0);
                            packed::reverse_bits(&mut tmp, 0, src, s_off + done, k as u64);
                            base.write_bits(bl + c - k + 1, &tmp, 0, k)?;
                        }
                        done += k as u64;
                        x += k;
                        t += k as i128;
                        if t == period {
                            t = 0;
                        }
                    }
                    Ok(None)
                })?;
            }
        }
        Ok(())
    }
}

/// A window plus its base storage and outside value, presented as a
/// read-only array so the bulk operators can consume windows like any
/// other view.
pub struct WindowArr<T, A: ?Sized> {
    win: Window,
    base: Arc<A>,
    outside: T,
}

impl<T: Clone, A: ?Sized> WindowArr<T, A> {
    pub fn new(win: Window, base: Arc<A>, outside: T) -> Result<Self>
    where
        A: ArrRead<T>,
    {
        win.check_base_len(base.len())?;
        Ok(WindowArr { win, base, outside })
    }

    pub fn window(&self) -> &Window {
        &self.win
    }
}

impl<T, A> ArrRead<T> for WindowArr<T, A>
where
    T: Clone + Send + Sync + 'static,
    A: ArrRead<T> + ?Sized,
{
    fn len(&self) -> i64 {
        self.win.size()
    }

    fn kind(&self) -> myriad_base::ElementKind {
        self.base.kind()
    }

    fn get(&self, i: i64) -> Result<T> {
        self.win.get(&*self.base, self.outside.clone(), i)
    }

    fn read_at(&self, pos: i64, dst: &mut [T]) -> Result<()> {
        self.win.read(&*self.base, self.outside.clone(), pos, dst)
    }
}
