use crate::exec::{BlockExec, BlockOp, ExecPolicy};
use crate::sum::sum_bits;
use myriad_arr::{AnyArr, ArrRead, BitRead};
use myriad_base::{illegal, Prim, Result};
use std::marker::PhantomData;

const HIST_BLOCK: usize = 65536;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    pub bins: Vec<i64>,
    /// False when any value fell outside the mapped bin range.
    pub all_inside: bool,
}

/// Bin of a widened value under the `[from, to)` range mapping, or
/// `None` when it lands outside (NaN included).
fn bin_of(v: f64, from: f64, to: f64, n_bins: usize) -> Option<usize> {
    let x = (v - from) * n_bins as f64 / (to - from);
    if x >= 0.0 && x < n_bins as f64 {
        Some(x as usize)
    } else {
        None
    }
}

struct HistOp<'a, T, A: ?Sized> {
    arr: &'a A,
    from: f64,
    to: f64,
    n_bins: usize,
    _t: PhantomData<fn() -> T>,
}

struct HistTask<T> {
    bins: Vec<i64>,
    all_inside: bool,
    buf: Vec<T>,
}

impl<'a, T: Prim, A: ArrRead<T> + ?Sized> BlockOp for HistOp<'a, T, A> {
    type Task = HistTask<T>;

    fn new_task(&self, _task_index: usize) -> HistTask<T> {
        HistTask { bins: vec![0; self.n_bins], all_inside: true, buf: Vec::new() }
    }

    fn process_block(&self, task: &mut HistTask<T>, pos: i64, count: i64) -> Result<()> {
        let c = count as usize;
        let HistTask { bins, all_inside, buf } = task;
        let vals: &[T] = match self.arr.as_direct() {
            Some(s) => &s[pos as usize..pos as usize + c],
            None => {
                buf.resize(c, T::default());
                self.arr.read_at(pos, &mut buf[..c])?;
                &buf[..c]
            }
        };
        for v in vals {
            match bin_of(v.widen_f64(), self.from, self.to, self.n_bins) {
                Some(b) => bins[b] += 1,
                None => *all_inside = false,
            }
        }
        Ok(())
    }
}

/// Histogram of a numeric array: value `v` goes to bin
/// `floor((v - from) * n_bins / (to - from))`; out-of-range values are
/// dropped and clear `all_inside`. Per-task histograms merge by
/// element-wise addition, so any task count gives the same answer.
pub fn histogram<T: Prim>(
    policy: &ExecPolicy,
    arr: &(impl ArrRead<T> + ?Sized),
    from: f64,
    to: f64,
    n_bins: usize,
) -> Result<Histogram> {
    if n_bins == 0 {
        return Err(illegal("histogram needs at least one bin"));
    }
    if !(to > from) {
        return Err(illegal(format!("empty histogram range {from}..{to}")));
    }
    let op = HistOp { arr, from, to, n_bins, _t: PhantomData::<fn() -> T> };
    let tasks = BlockExec::new(policy, HIST_BLOCK, None).run(arr.len(), &op)?;
    let mut out = Histogram { bins: vec![0; n_bins], all_inside: true };
    for t in tasks {
        for (o, b) in out.bins.iter_mut().zip(&t.bins) {
            *o += b;
        }
        out.all_inside &= t.all_inside;
    }
    Ok(out)
}

/// Bit-array histogram: only two distinct values exist, so the bin
/// indices of 0.0 and 1.0 are computed once and the cardinality counts
/// are bulk-added.
pub fn histogram_bits(
    policy: &ExecPolicy,
    arr: &(impl BitRead + ?Sized),
    from: f64,
    to: f64,
    n_bins: usize,
) -> Result<Histogram> {
    if n_bins == 0 {
        return Err(illegal("histogram needs at least one bin"));
    }
    if !(to > from) {
        return Err(illegal(format!("empty histogram range {from}..{to}")));
    }
    let ones = sum_bits(policy, arr)? as i64;
    let zeros = arr.len() - ones;
    let mut out = Histogram { bins: vec![0; n_bins], all_inside: true };
    for (v, count) in [(0.0, zeros), (1.0, ones)] {
        if count == 0 {
            continue;
        }
        match bin_of(v, from, to, n_bins) {
            Some(b) => out.bins[b] += count,
            None => out.all_inside = false,
        }
    }
    Ok(out)
}

/// Kind-dispatched histogram.
pub fn histogram_any(
    policy: &ExecPolicy,
    arr: &AnyArr,
    from: f64,
    to: f64,
    n_bins: usize,
) -> Result<Histogram> {
    match arr {
        AnyArr::Bit(a) => histogram_bits(policy, a, from, to, n_bins),
        AnyArr::U8(a) => histogram(policy, a, from, to, n_bins),
        AnyArr::C16(a) | AnyArr::U16(a) => histogram(policy, a, from, to, n_bins),
        AnyArr::I32(a) => histogram(policy, a, from, to, n_bins),
        AnyArr::I64(a) => histogram(policy, a, from, to, n_bins),
        AnyArr::F32(a) => histogram(policy, a, from, to, n_bins),
        AnyArr::F64(a) => histogram(policy, a, from, to, n_bins),
    }
}
