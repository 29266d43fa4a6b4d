use crate::exec::{BlockExec, BlockOp, ExecPolicy};
use crate::pool::ScratchPool;
use myriad_arr::{check_range, ArrRead, ArrWrite, BitArr, BitWrite, RawBits};
use myriad_base::{packed, Prim, Result};

const PACK_BLOCK: usize = 65536;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ThresholdOp {
    Gt,
    Lt,
    Ge,
    Le,
}

/// All-zeros / all-ones degeneration when the threshold lies beyond the
/// representable range of an integer element kind.
fn saturation(op: ThresholdOp, threshold: f64, min: f64, max: f64) -> Option<bool> {
    if threshold.is_nan() {
        // Every comparison with NaN is false.
        return Some(false);
    }
    match op {
        ThresholdOp::Gt => {
            if threshold >= max {
                Some(false)
            } else if threshold < min {
                Some(true)
            } else {
                None
            }
        }
        ThresholdOp::Ge => {
            if threshold > max {
                Some(false)
            } else if threshold <= min {
                Some(true)
            } else {
                None
            }
        }
        ThresholdOp::Lt => {
            if threshold <= min {
                Some(false)
            } else if threshold > max {
                Some(true)
            } else {
                None
            }
        }
        ThresholdOp::Le => {
            if threshold < min {
                Some(false)
            } else if threshold >= max {
                Some(true)
            } else {
                None
            }
        }
    }
}

struct PackOp<'a, T, A: ?Sized> {
    src: &'a A,
    src_pos: i64,
    dst: RawBits,
    dst_pos: i64,
    pred: Box<dyn Fn(&T) -> bool + Send + Sync + 'a>,
    pool: ScratchPool<T>,
}

struct PackTask<T> {
    sbuf: Vec<T>,
    wbuf: Vec<u64>,
}

impl<'a, T: Prim, A: ArrRead<T> + ?Sized> BlockOp for PackOp<'a, T, A> {
    type Task = PackTask<T>;

    fn new_task(&self, _task_index: usize) -> PackTask<T> {
        PackTask { sbuf: Vec::new(), wbuf: Vec::new() }
    }

    fn process_block(&self, task: &mut PackTask<T>, pos: i64, count: i64) -> Result<()> {
        if task.sbuf.capacity() == 0 {
            task.sbuf = self.pool.take();
        }
        task.sbuf.resize(count as usize, T::default());
        self.src.read_at(self.src_pos + pos, &mut task.sbuf[..count as usize])?;
        task.wbuf.clear();
        task.wbuf.resize(packed::word_len(count as u64), 0);
        packed::pack_bits_by(&mut task.wbuf, 0, &task.sbuf[..count as usize], &self.pred);
        // dst_pos + pos is word-aligned for every block: the caller
        // trimmed the head and the block size is a multiple of 64.
        unsafe { self.dst.write_bits(self.dst_pos + pos, &task.wbuf, 0, count) };
        Ok(())
    }
}

fn pack_threshold<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    dst_pos: i64,
    src: &(impl ArrRead<T> + ?Sized),
    src_pos: i64,
    count: i64,
    threshold: f64,
    op: ThresholdOp,
) -> Result<()> {
    check_range(dst.len(), dst_pos, count)?;
    check_range(src.len(), src_pos, count)?;
    if count == 0 {
        return Ok(());
    }

    if !T::IS_FLOAT {
        if let Some(v) = saturation(op, threshold, T::MIN_REPR, T::MAX_REPR) {
            return dst.fill(dst_pos, count, v);
        }
    } else if threshold.is_nan() {
        return dst.fill(dst_pos, count, false);
    }

    // Integer kinds compare against the threshold rounded into the
    // element domain: floor for > and <=, ceil for < and >=, so a
    // fractional threshold cuts the integer line in the right place.
    // Float kinds compare widened, which keeps infinities exact.
    let pred: Box<dyn Fn(&T) -> bool + Send + Sync> = if T::IS_FLOAT {
        match op {
            ThresholdOp::Gt => Box::new(move |v: &T| v.widen_f64() > threshold),
            ThresholdOp::Lt => Box::new(move |v: &T| v.widen_f64() < threshold),
            ThresholdOp::Ge => Box::new(move |v: &T| v.widen_f64() >= threshold),
            ThresholdOp::Le => Box::new(move |v: &T| v.widen_f64() <= threshold),
        }
    } else {
        let t = match op {
            ThresholdOp::Gt | ThresholdOp::Le => T::from_f64(threshold.floor()),
            ThresholdOp::Lt | ThresholdOp::Ge => T::from_f64(threshold.ceil()),
        };
        match op {
            ThresholdOp::Gt => Box::new(move |v: &T| *v > t),
            ThresholdOp::Lt => Box::new(move |v: &T| *v < t),
            ThresholdOp::Ge => Box::new(move |v: &T| *v >= t),
            ThresholdOp::Le => Box::new(move |v: &T| *v <= t),
        }
    };

    // Head segment up to the next word boundary of the destination,
    // processed inline so parallel blocks never share a word.
    let head = ((64 - (dst_pos as u64 & 63)) & 63).min(count as u64) as i64;
    if head > 0 {
        let mut sbuf = vec![T::default(); head as usize];
        src.read_at(src_pos, &mut sbuf)?;
        let mut w = [0u64; 1];
        packed::pack_bits_by(&mut w, 0, &sbuf, &pred);
        dst.write_bits(dst_pos, &w, 0, head)?;
    }
    let rest = count - head;
    if rest == 0 {
        return Ok(());
    }

    let exec = BlockExec::new(policy, PACK_BLOCK, None);
    let op = PackOp {
        src,
        src_pos: src_pos + head,
        dst: dst.raw()?,
        dst_pos: dst_pos + head,
        pred,
        pool: ScratchPool::new(exec.block_size() as usize),
    };
    let tasks = exec.run(rest, &op)?;
    for t in tasks {
        op.pool.put(t.sbuf);
    }
    op.pool.drain();
    Ok(())
}

/// Pack one bit per source element: bit set where `src[i] > threshold`.
pub fn pack_gt<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    dst_pos: i64,
    src: &(impl ArrRead<T> + ?Sized),
    src_pos: i64,
    count: i64,
    threshold: f64,
) -> Result<()> {
    pack_threshold(policy, dst, dst_pos, src, src_pos, count, threshold, ThresholdOp::Gt)
}

/// Pack one bit per source element: bit set where `src[i] < threshold`.
pub fn pack_lt<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    dst_pos: i64,
    src: &(impl ArrRead<T> + ?Sized),
    src_pos: i64,
    count: i64,
    threshold: f64,
) -> Result<()> {
    pack_threshold(policy, dst, dst_pos, src, src_pos, count, threshold, ThresholdOp::Lt)
}

/// Pack one bit per source element: bit set where `src[i] >= threshold`.
pub fn pack_ge<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    dst_pos: i64,
    src: &(impl ArrRead<T> + ?Sized),
    src_pos: i64,
    count: i64,
    threshold: f64,
) -> Result<()> {
    pack_threshold(policy, dst, dst_pos, src, src_pos, count, threshold, ThresholdOp::Ge)
}

/// Pack one bit per source element: bit set where `src[i] <= threshold`.
pub fn pack_le<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    dst_pos: i64,
    src: &(impl ArrRead<T> + ?Sized),
    src_pos: i64,
    count: i64,
    threshold: f64,
) -> Result<()> {
    pack_threshold(policy, dst, dst_pos, src, src_pos, count, threshold, ThresholdOp::Le)
}
