use crate::exec::{BlockExec, BlockOp, ExecPolicy};
use myriad_arr::{AnyArr, ArrRead, BitRead};
use myriad_base::{packed, Prim, Result};
use std::marker::PhantomData;

const RANGE_BLOCK: usize = 65536;

/// Extrema with the indices of their first occurrences.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMax<T> {
    pub min: T,
    pub min_index: i64,
    pub max: T,
    pub max_index: i64,
}

fn fold<T: Prim>(cur: &mut Option<MinMax<T>>, new: MinMax<T>) {
    match cur {
        None => *cur = Some(new),
        Some(c) => {
            // Value first, then lowest index.
            if T::total_lt(new.min, c.min)
                || (!T::total_lt(c.min, new.min) && new.min_index < c.min_index)
            {
                c.min = new.min;
                c.min_index = new.min_index;
            }
            if T::total_lt(c.max, new.max)
                || (!T::total_lt(new.max, c.max) && new.max_index < c.max_index)
            {
                c.max = new.max;
                c.max_index = new.max_index;
            }
        }
    }
}

struct RangeOp<'a, T, A: ?Sized> {
    arr: &'a A,
    _t: PhantomData<fn() -> T>,
}

struct RangeTask<T> {
    best: Option<MinMax<T>>,
    buf: Vec<T>,
}

impl<'a, T: Prim, A: ArrRead<T> + ?Sized> BlockOp for RangeOp<'a, T, A> {
    type Task = RangeTask<T>;

    fn new_task(&self, _task_index: usize) -> RangeTask<T> {
        RangeTask { best: None, buf: Vec::new() }
    }

    fn process_block(&self, task: &mut RangeTask<T>, pos: i64, count: i64) -> Result<()> {
        let c = count as usize;
        let RangeTask { best, buf } = task;
        let vals: &[T] = match self.arr.as_direct() {
            Some(s) => &s[pos as usize..pos as usize + c],
            None => {
                buf.resize(c, T::default());
                self.arr.read_at(pos, &mut buf[..c])?;
                &buf[..c]
            }
        };
        let mut block = MinMax { min: vals[0], min_index: pos, max: vals[0], max_index: pos };
        for (k, v) in vals.iter().enumerate().skip(1) {
            // Strict comparisons keep the first occurrence on ties.
            if T::total_lt(*v, block.min) {
                block.min = *v;
                block.min_index = pos + k as i64;
            }
            if T::total_lt(block.max, *v) {
                block.max = *v;
                block.max_index = pos + k as i64;
            }
        }
        fold(best, block);
        Ok(())
    }
}

/// Minimum and maximum with first-occurrence indices; `None` for an
/// empty array. Floats compare in total order (NaN above infinity).
pub fn min_max<T: Prim>(
    policy: &ExecPolicy,
    arr: &(impl ArrRead<T> + ?Sized),
) -> Result<Option<MinMax<T>>> {
    if arr.is_empty() {
        return Ok(None);
    }
    let op = RangeOp { arr, _t: PhantomData::<fn() -> T> };
    let tasks = BlockExec::new(policy, RANGE_BLOCK, None).run(arr.len(), &op)?;
    let mut best = None;
    for t in tasks {
        if let Some(b) = t.best {
            fold(&mut best, b);
        }
    }
    Ok(best)
}

/// Bit-array extrema via a first-difference scan: find the first bit
/// that differs from bit 0; if none, min == max == bit 0.
pub fn min_max_bits(arr: &(impl BitRead + ?Sized)) -> Result<Option<MinMax<bool>>> {
    let n = arr.len();
    if n == 0 {
        return Ok(None);
    }
    let mut buf = vec![0u64; 1024];
    let mut first = false;
    let mut diff: Option<i64> = None;
    let mut pos = 0i64;
    while pos < n {
        let count = (n - pos).min(1024 * 64);
        arr.read_bits(pos, &mut buf, 0, count)?;
        if pos == 0 {
            first = packed::get_bit(&buf, 0);
        }
        if let Some(i) = packed::index_of_bit(&buf, 0, count as u64, !first) {
            diff = Some(pos + i as i64);
            break;
        }
        pos += count;
    }
    Ok(Some(match diff {
        None => MinMax { min: first, min_index: 0, max: first, max_index: 0 },
        Some(i) => {
            if first {
                MinMax { min: false, min_index: i, max: true, max_index: 0 }
            } else {
                MinMax { min: false, min_index: 0, max: true, max_index: i }
            }
        }
    }))
}

/// Kind-dispatched extrema, widened to `f64`.
pub fn min_max_any(policy: &ExecPolicy, arr: &AnyArr) -> Result<Option<MinMax<f64>>> {
    fn widen<T: Prim>(r: Option<MinMax<T>>) -> Option<MinMax<f64>> {
        r.map(|r| MinMax {
            min: r.min.widen_f64(),
            min_index: r.min_index,
            max: r.max.widen_f64(),
            max_index: r.max_index,
        })
    }
    Ok(match arr {
        AnyArr::Bit(a) => min_max_bits(a)?.map(|r| MinMax {
            min: if r.min { 1.0 } else { 0.0 },
            min_index: r.min_index,
            max: if r.max { 1.0 } else { 0.0 },
            max_index: r.max_index,
        }),
        AnyArr::U8(a) => widen(min_max(policy, a)?),
        AnyArr::C16(a) | AnyArr::U16(a) => widen(min_max(policy, a)?),
        AnyArr::I32(a) => widen(min_max(policy, a)?),
        AnyArr::I64(a) => widen(min_max(policy, a)?),
        AnyArr::F32(a) => widen(min_max(policy, a)?),
        AnyArr::F64(a) => widen(min_max(policy, a)?),
    })
}
