use crate::exec::{BlockExec, BlockOp, ExecPolicy};
use myriad_arr::{AnyArr, ArrRead, BitRead};
use myriad_base::{mismatch, overflow, packed, Prim, Result};
use std::marker::PhantomData;

const SUM_BLOCK: usize = 65536;

struct SumOp<'a, T, A: ?Sized> {
    arr: &'a A,
    _t: PhantomData<fn() -> T>,
}

struct SumTask<T> {
    total: f64,
    buf: Vec<T>,
}

impl<'a, T: Prim, A: ArrRead<T> + ?Sized> BlockOp for SumOp<'a, T, A> {
    type Task = SumTask<T>;

    fn new_task(&self, _task_index: usize) -> SumTask<T> {
        SumTask { total: 0.0, buf: Vec::new() }
    }

    fn process_block(&self, task: &mut SumTask<T>, pos: i64, count: i64) -> Result<()> {
        let c = count as usize;
        let block = match self.arr.as_direct() {
            Some(s) => T::sloppy_block_sum(&s[pos as usize..pos as usize + c]),
            None => {
                task.buf.resize(c, T::default());
                self.arr.read_at(pos, &mut task.buf[..c])?;
                T::sloppy_block_sum(&task.buf[..c])
            }
        };
        task.total += block;
        Ok(())
    }
}

/// Sloppy sum of a numeric array, widened to `f64`.
///
/// Always a single-task traversal: the result is the strict
/// left-to-right reduction of block partials, bit-identical across runs
/// and executor configurations.
pub fn sum<T: Prim>(policy: &ExecPolicy, arr: &(impl ArrRead<T> + ?Sized)) -> Result<f64> {
    let op = SumOp { arr, _t: PhantomData };
    let tasks = BlockExec::new(policy, SUM_BLOCK, None).single_task().run(arr.len(), &op)?;
    Ok(tasks.into_iter().map(|t| t.total).sum())
}

struct BitSumOp<'a, A: ?Sized> {
    arr: &'a A,
}

struct BitSumTask {
    ones: u64,
    buf: Vec<u64>,
}

impl<'a, A: BitRead + ?Sized> BlockOp for BitSumOp<'a, A> {
    type Task = BitSumTask;

    fn new_task(&self, _task_index: usize) -> BitSumTask {
        BitSumTask { ones: 0, buf: Vec::new() }
    }

    fn process_block(&self, task: &mut BitSumTask, pos: i64, count: i64) -> Result<()> {
        task.buf.resize(packed::word_len(count as u64), 0);
        self.arr.read_bits(pos, &mut task.buf, 0, count)?;
        task.ones += packed::cardinality(&task.buf, 0, count as u64);
        Ok(())
    }
}

/// Sum of a bit array: its cardinality. Exact, so the merge is a plain
/// commutative addition and any task count is fine.
pub fn sum_bits(policy: &ExecPolicy, arr: &(impl BitRead + ?Sized)) -> Result<u64> {
    let op = BitSumOp { arr };
    let tasks = BlockExec::new(policy, SUM_BLOCK, None).run(arr.len(), &op)?;
    Ok(tasks.into_iter().map(|t| t.ones).sum())
}

struct PreciseSumOp<'a, T, A: ?Sized> {
    arr: &'a A,
    checked: bool,
    _t: PhantomData<fn() -> T>,
}

struct PreciseSumTask<T> {
    sum: i64,
    overflowed: bool,
    buf: Vec<T>,
}

impl<'a, T: Prim, A: ArrRead<T> + ?Sized> BlockOp for PreciseSumOp<'a, T, A> {
    type Task = PreciseSumTask<T>;

    fn new_task(&self, _task_index: usize) -> PreciseSumTask<T> {
        PreciseSumTask { sum: 0, overflowed: false, buf: Vec::new() }
    }

    fn process_block(&self, task: &mut PreciseSumTask<T>, pos: i64, count: i64) -> Result<()> {
        let c = count as usize;
        let PreciseSumTask { sum, overflowed, buf } = task;
        let vals: &[T] = match self.arr.as_direct() {
            Some(s) => &s[pos as usize..pos as usize + c],
            None => {
                buf.resize(c, T::default());
                self.arr.read_at(pos, &mut buf[..c])?;
                &buf[..c]
            }
        };
        for v in vals {
            let w = v.widen_i64();
            if self.checked {
                match sum.checked_add(w) {
                    Some(s) => *sum = s,
                    None => *overflowed = true,
                }
            } else {
                *sum = sum.wrapping_add(w);
            }
        }
        Ok(())
    }
}

/// Exact integer sum with optional overflow detection. Parallel: the
/// merge is addition with the same sign test applied between task
/// partials. Float kinds are rejected; use [`sum`] for those.
pub fn precise_sum<T: Prim>(
    policy: &ExecPolicy,
    arr: &(impl ArrRead<T> + ?Sized),
    check_overflow: bool,
) -> Result<i64> {
    if T::IS_FLOAT {
        return Err(mismatch("precise sum over a floating-point array"));
    }
    let op = PreciseSumOp { arr, checked: check_overflow, _t: PhantomData::<fn() -> T> };
    let tasks = BlockExec::new(policy, T::SUM_BLOCK_CAP, None).run(arr.len(), &op)?;
    let mut total = 0i64;
    for t in tasks {
        if t.overflowed && check_overflow {
            return Err(overflow("integer sum overflows i64"));
        }
        if check_overflow {
            total = total
                .checked_add(t.sum)
                .ok_or_else(|| overflow("integer sum overflows i64"))?;
        } else {
            total = total.wrapping_add(t.sum);
        }
    }
    Ok(total)
}

/// Kind-dispatched sloppy sum.
pub fn sum_any(policy: &ExecPolicy, arr: &AnyArr) -> Result<f64> {
    match arr {
        AnyArr::Bit(a) => Ok(sum_bits(policy, a)? as f64),
        AnyArr::U8(a) => sum(policy, a),
        AnyArr::C16(a) | AnyArr::U16(a) => sum(policy, a),
        AnyArr::I32(a) => sum(policy, a),
        AnyArr::I64(a) => sum(policy, a),
        AnyArr::F32(a) => sum(policy, a),
        AnyArr::F64(a) => sum(policy, a),
    }
}

/// Kind-dispatched exact integer sum.
pub fn precise_sum_any(policy: &ExecPolicy, arr: &AnyArr, check_overflow: bool) -> Result<i64> {
    match arr {
        AnyArr::Bit(a) => Ok(sum_bits(policy, a)? as i64),
        AnyArr::U8(a) => precise_sum(policy, a, check_overflow),
        AnyArr::C16(a) | AnyArr::U16(a) => precise_sum(policy, a, check_overflow),
        AnyArr::I32(a) => precise_sum(policy, a, check_overflow),
        AnyArr::I64(a) => precise_sum(policy, a, check_overflow),
        AnyArr::F32(_) | AnyArr::F64(_) => {
            Err(mismatch("precise sum over a floating-point array"))
        }
    }
}
