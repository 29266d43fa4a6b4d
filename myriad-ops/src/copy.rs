use crate::exec::{BlockExec, BlockOp, ExecPolicy};
use crate::pool::ScratchPool;
use myriad_arr::{AnyArr, ArrRead, BitArr, BitRead, PrimArr, RawBits, RawSlice};
use myriad_base::{illegal, mismatch, packed, Prim, Result};
use std::sync::atomic::{AtomicBool, Ordering};

const COPY_BLOCK: usize = 65536;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyAlgorithm {
    /// Single task, one linear pass.
    Linear,
    /// Several tasks over disjoint blocks.
    Blocked,
}

#[derive(Clone, Copy, Debug)]
pub struct CopyResult {
    pub algorithm: CopyAlgorithm,
    pub strict: bool,
    pub changed: bool,
}

struct CopyOp<'a, T, A: ?Sized> {
    src: &'a A,
    dst: RawSlice<T>,
    changed: AtomicBool,
    pool: ScratchPool<T>,
}

struct CopyTask<T> {
    sbuf: Vec<T>,
    dbuf: Vec<T>,
}

impl<'a, T: Prim, A: ArrRead<T> + ?Sized> BlockOp for CopyOp<'a, T, A> {
    type Task = CopyTask<T>;

    fn new_task(&self, _task_index: usize) -> CopyTask<T> {
        // Scratch comes from the pool lazily, on the task's first block.
        CopyTask { sbuf: Vec::new(), dbuf: Vec::new() }
    }

    fn process_block(&self, task: &mut CopyTask<T>, pos: i64, count: i64) -> Result<()> {
        let count = count as usize;
        if task.sbuf.capacity() == 0 {
            task.sbuf = self.pool.take();
            task.dbuf = self.pool.take();
        }
        task.sbuf.resize(count, T::default());
        task.dbuf.resize(count, T::default());
        self.src.read_at(pos, &mut task.sbuf[..count])?;
        // Blocks are disjoint, so the raw view accesses cannot race.
        unsafe { self.dst.read(pos as usize, &mut task.dbuf[..count]) };
        if task.sbuf[..count] != task.dbuf[..count] {
            unsafe { self.dst.write(pos as usize, &task.sbuf[..count]) };
            self.changed.store(true, Ordering::Relaxed);
        }
        Ok(())
    }
}

/// Copy `src` over `dst`, block by block, writing only blocks whose
/// content differs from what `dst` already holds; reports whether
/// anything actually changed.
pub fn comparing_copy<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut PrimArr<T>,
    src: &(impl ArrRead<T> + ?Sized),
) -> Result<CopyResult> {
    if src.kind() != dst.kind() {
        return Err(mismatch(format!(
            "cannot copy {} array into {} array",
            src.kind().name(),
            dst.kind().name()
        )));
    }
    if src.len() != dst.len() {
        return Err(illegal(format!(
            "source length {} does not match destination length {}",
            src.len(),
            dst.len()
        )));
    }
    let n = dst.len();
    let exec = BlockExec::new(policy, COPY_BLOCK, None);
    let op = CopyOp {
        src,
        dst: dst.raw()?,
        changed: AtomicBool::new(false),
        pool: ScratchPool::new(exec.block_size() as usize),
    };
    let algorithm =
        if exec.num_tasks() > 1 { CopyAlgorithm::Blocked } else { CopyAlgorithm::Linear };
    let tasks = exec.run(n, &op)?;
    for t in tasks {
        op.pool.put(t.sbuf);
        op.pool.put(t.dbuf);
    }
    op.pool.drain();
    Ok(CopyResult { algorithm, strict: policy.strict, changed: op.changed.load(Ordering::Relaxed) })
}

struct BitCopyOp<'a, A: ?Sized> {
    src: &'a A,
    dst: RawBits,
    changed: AtomicBool,
    pool: ScratchPool<u64>,
}

struct BitCopyTask {
    sbuf: Vec<u64>,
    dbuf: Vec<u64>,
}

impl<'a, A: BitRead + ?Sized> BlockOp for BitCopyOp<'a, A> {
    type Task = BitCopyTask;

    fn new_task(&self, _task_index: usize) -> BitCopyTask {
        BitCopyTask { sbuf: Vec::new(), dbuf: Vec::new() }
    }

    fn process_block(&self, task: &mut BitCopyTask, pos: i64, count: i64) -> Result<()> {
        let words = packed::word_len(count as u64);
        if task.sbuf.capacity() == 0 {
            task.sbuf = self.pool.take();
            task.dbuf = self.pool.take();
        }
        task.sbuf.resize(words, 0);
        task.dbuf.resize(words, 0);
        self.src.read_bits(pos, &mut task.sbuf, 0, count)?;
        unsafe { self.dst.read_bits(pos, &mut task.dbuf, 0, count) };
        let differs = (0..count as u64).step_by(64).any(|off| {
            let m = (count as u64 - off).min(64) as u32;
            packed::get_bits64(&task.sbuf, off, m) != packed::get_bits64(&task.dbuf, off, m)
        });
        if differs {
            // Block boundaries are multiples of 65536 bits, so the
            // written range is word-aligned (or the array tail).
            unsafe { self.dst.write_bits(pos, &task.sbuf, 0, count) };
            self.changed.store(true, Ordering::Relaxed);
        }
        Ok(())
    }
}

/// [`comparing_copy`] for packed-bit destinations.
pub fn comparing_copy_bits(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    src: &(impl BitRead + ?Sized),
) -> Result<CopyResult> {
    if src.len() != dst.len() {
        return Err(illegal(format!(
            "source length {} does not match destination length {}",
            src.len(),
            dst.len()
        )));
    }
    let n = dst.len();
    let exec = BlockExec::new(policy, COPY_BLOCK, None);
    let op = BitCopyOp {
        src,
        dst: dst.raw()?,
        changed: AtomicBool::new(false),
        pool: ScratchPool::new(packed::word_len(exec.block_size() as u64)),
    };
    let algorithm =
        if exec.num_tasks() > 1 { CopyAlgorithm::Blocked } else { CopyAlgorithm::Linear };
    let tasks = exec.run(n, &op)?;
    for t in tasks {
        op.pool.put(t.sbuf);
        op.pool.put(t.dbuf);
    }
    op.pool.drain();
    Ok(CopyResult { algorithm, strict: policy.strict, changed: op.changed.load(Ordering::Relaxed) })
}

/// Kind-dispatched comparing copy between same-kind arrays.
pub fn comparing_copy_any(
    policy: &ExecPolicy,
    dst: &mut AnyArr,
    src: &AnyArr,
) -> Result<CopyResult> {
    match (dst, src) {
        (AnyArr::Bit(d), AnyArr::Bit(s)) => comparing_copy_bits(policy, d, s),
        (AnyArr::U8(d), AnyArr::U8(s)) => comparing_copy(policy, d, s),
        (AnyArr::C16(d), AnyArr::C16(s)) => comparing_copy(policy, d, s),
        (AnyArr::U16(d), AnyArr::U16(s)) => comparing_copy(policy, d, s),
        (AnyArr::I32(d), AnyArr::I32(s)) => comparing_copy(policy, d, s),
        (AnyArr::I64(d), AnyArr::I64(s)) => comparing_copy(policy, d, s),
        (AnyArr::F32(d), AnyArr::F32(s)) => comparing_copy(policy, d, s),
        (AnyArr::F64(d), AnyArr::F64(s)) => comparing_copy(policy, d, s),
        (d, s) => Err(mismatch(format!(
            "cannot copy {} array into {} array",
            s.kind().name(),
            d.kind().name()
        ))),
    }
}
