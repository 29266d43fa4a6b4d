use crate::exec::{BlockExec, BlockOp, ExecPolicy};
use crate::pool::ScratchPool;
use myriad_arr::{check_range, ArrRead, ArrWrite, BitArr, BitRead, PrimArr, RawBits, RawSlice};
use myriad_base::{packed, Prim, Result};

const UNPACK_BLOCK: usize = 65536;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fillers<T> {
    /// Write `filler1` under one bits and `filler0` under zero bits.
    Both(T, T),
    /// Write only under one bits; zero bits leave the destination alone.
    Unit(T),
    /// Write only under zero bits; one bits leave the destination alone.
    Zero(T),
}

struct UnpackOp<'a, T, A: ?Sized> {
    src: &'a A,
    src_pos: i64,
    dst: RawSlice<T>,
    dst_pos: i64,
    fillers: Fillers<T>,
    pool: ScratchPool<T>,
}

struct UnpackTask<T> {
    wbuf: Vec<u64>,
    dbuf: Vec<T>,
}

impl<'a, T: Prim, A: BitRead + ?Sized> BlockOp for UnpackOp<'a, T, A> {
    type Task = UnpackTask<T>;

    fn new_task(&self, _task_index: usize) -> UnpackTask<T> {
        UnpackTask { wbuf: Vec::new(), dbuf: Vec::new() }
    }

    fn process_block(&self, task: &mut UnpackTask<T>, pos: i64, count: i64) -> Result<()> {
        let count_u = count as usize;
        if task.dbuf.capacity() == 0 {
            task.dbuf = self.pool.take();
        }
        task.wbuf.resize(packed::word_len(count as u64), 0);
        self.src.read_bits(self.src_pos + pos, &mut task.wbuf, 0, count)?;
        task.dbuf.resize(count_u, T::default());
        let dst_off = (self.dst_pos + pos) as usize;
        match self.fillers {
            Fillers::Both(f0, f1) => {
                packed::unpack_bits(&mut task.dbuf[..count_u], &task.wbuf, 0, f0, f1);
            }
            Fillers::Unit(f) => {
                // Read-modify-write: untouched elements keep their value.
                unsafe { self.dst.read(dst_off, &mut task.dbuf[..count_u]) };
                packed::unpack_unit_bits(&mut task.dbuf[..count_u], &task.wbuf, 0, f);
            }
            Fillers::Zero(f) => {
                unsafe { self.dst.read(dst_off, &mut task.dbuf[..count_u]) };
                packed::unpack_zero_bits(&mut task.dbuf[..count_u], &task.wbuf, 0, f);
            }
        }
        unsafe { self.dst.write(dst_off, &task.dbuf[..count_u]) };
        Ok(())
    }
}

fn unpack_numeric<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut PrimArr<T>,
    dst_pos: i64,
    src: &(impl BitRead + ?Sized),
    src_pos: i64,
    count: i64,
    fillers: Fillers<T>,
) -> Result<()> {
    check_range(dst.len(), dst_pos, count)?;
    check_range(src.len(), src_pos, count)?;
    if count == 0 {
        return Ok(());
    }
    let exec = BlockExec::new(policy, UNPACK_BLOCK, None);
    let op = UnpackOp {
        src,
        src_pos,
        dst: dst.raw()?,
        dst_pos,
        fillers,
        pool: ScratchPool::new(exec.block_size() as usize),
    };
    let tasks = exec.run(count, &op)?;
    for t in tasks {
        op.pool.put(t.dbuf);
    }
    op.pool.drain();
    Ok(())
}

/// Unpack bits into a numeric array: `filler1` under one bits,
/// `filler0` under zero bits.
pub fn unpack_bits<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut PrimArr<T>,
    dst_pos: i64,
    src: &(impl BitRead + ?Sized),
    src_pos: i64,
    count: i64,
    filler0: T,
    filler1: T,
) -> Result<()> {
    unpack_numeric(policy, dst, dst_pos, src, src_pos, count, Fillers::Both(filler0, filler1))
}

/// Write `filler` under one bits; zero bits leave the destination
/// unchanged.
pub fn unpack_unit_bits<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut PrimArr<T>,
    dst_pos: i64,
    src: &(impl BitRead + ?Sized),
    src_pos: i64,
    count: i64,
    filler: T,
) -> Result<()> {
    unpack_numeric(policy, dst, dst_pos, src, src_pos, count, Fillers::Unit(filler))
}

/// Write `filler` under zero bits; one bits leave the destination
/// unchanged.
pub fn unpack_zero_bits<T: Prim>(
    policy: &ExecPolicy,
    dst: &mut PrimArr<T>,
    dst_pos: i64,
    src: &(impl BitRead + ?Sized),
    src_pos: i64,
    count: i64,
    filler: T,
) -> Result<()> {
    unpack_numeric(policy, dst, dst_pos, src, src_pos, count, Fillers::Zero(filler))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BitCombine {
    Copy,
    Not,
    Or,
    AndNot,
    OrNot,
    And,
}

struct BitUnpackOp<'a, A: ?Sized> {
    src: &'a A,
    src_pos: i64,
    dst: RawBits,
    dst_pos: i64,
    combine: BitCombine,
}

struct BitUnpackTask {
    sbuf: Vec<u64>,
    dbuf: Vec<u64>,
}

impl<'a, A: BitRead + ?Sized> BlockOp for BitUnpackOp<'a, A> {
    type Task = BitUnpackTask;

    fn new_task(&self, _task_index: usize) -> BitUnpackTask {
        BitUnpackTask { sbuf: Vec::new(), dbuf: Vec::new() }
    }

    fn process_block(&self, task: &mut BitUnpackTask, pos: i64, count: i64) -> Result<()> {
        let words = packed::word_len(count as u64);
        task.sbuf.resize(words, 0);
        self.src.read_bits(self.src_pos + pos, &mut task.sbuf, 0, count)?;
        let dpos = self.dst_pos + pos;
        match self.combine {
            BitCombine::Copy => unsafe {
                self.dst.write_bits(dpos, &task.sbuf, 0, count);
            },
            BitCombine::Not => {
                for w in &mut task.sbuf {
                    *w = !*w;
                }
                unsafe { self.dst.write_bits(dpos, &task.sbuf, 0, count) };
            }
            _ => {
                task.dbuf.resize(words, 0);
                unsafe { self.dst.read_bits(dpos, &mut task.dbuf, 0, count) };
                let n = count as u64;
                match self.combine {
                    BitCombine::Or => packed::or_bits(&mut task.dbuf, 0, &task.sbuf, 0, n),
                    BitCombine::AndNot => {
                        packed::and_not_bits(&mut task.dbuf, 0, &task.sbuf, 0, n)
                    }
                    BitCombine::OrNot => packed::or_not_bits(&mut task.dbuf, 0, &task.sbuf, 0, n),
                    BitCombine::And => packed::and_bits(&mut task.dbuf, 0, &task.sbuf, 0, n),
                    BitCombine::Copy | BitCombine::Not => unreachable!(),
                }
                unsafe { self.dst.write_bits(dpos, &task.dbuf, 0, count) };
            }
        }
        Ok(())
    }
}

fn unpack_to_bits(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    dst_pos: i64,
    src: &(impl BitRead + ?Sized),
    src_pos: i64,
    count: i64,
    combine: BitCombine,
) -> Result<()> {
    check_range(dst.len(), dst_pos, count)?;
    check_range(src.len(), src_pos, count)?;
    if count == 0 {
        return Ok(());
    }
    // Trim the head so parallel blocks never share a destination word.
    let head = ((64 - (dst_pos as u64 & 63)) & 63).min(count as u64) as i64;
    if head > 0 {
        let mut sbuf = [0u64; 1];
        src.read_bits(src_pos, &mut sbuf, 0, head)?;
        let words = dst.words_mut()?;
        let d = dst_pos as u64;
        let h = head as u64;
        match combine {
            BitCombine::Copy => packed::copy_bits(words, d, &sbuf, 0, h),
            BitCombine::Not => packed::not_bits(words, d, &sbuf, 0, h),
            BitCombine::Or => packed::or_bits(words, d, &sbuf, 0, h),
            BitCombine::AndNot => packed::and_not_bits(words, d, &sbuf, 0, h),
            BitCombine::OrNot => packed::or_not_bits(words, d, &sbuf, 0, h),
            BitCombine::And => packed::and_bits(words, d, &sbuf, 0, h),
        }
    }
    let rest = count - head;
    if rest == 0 {
        return Ok(());
    }
    let op = BitUnpackOp {
        src,
        src_pos: src_pos + head,
        dst: dst.raw()?,
        dst_pos: dst_pos + head,
        combine,
    };
    BlockExec::new(policy, UNPACK_BLOCK, None).run(rest, &op)?;
    Ok(())
}

/// Bit-destination unpack with two literal fillers; collapses to copy,
/// not, or a constant fill depending on the filler pair.
pub fn unpack_bits_to_bits(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    dst_pos: i64,
    src: &(impl BitRead + ?Sized),
    src_pos: i64,
    count: i64,
    filler0: bool,
    filler1: bool,
) -> Result<()> {
    match (filler0, filler1) {
        (false, true) => unpack_to_bits(policy, dst, dst_pos, src, src_pos, count, BitCombine::Copy),
        (true, false) => unpack_to_bits(policy, dst, dst_pos, src, src_pos, count, BitCombine::Not),
        (v, _) => {
            check_range(src.len(), src_pos, count)?;
            dst.fill(dst_pos, count, v)
        }
    }
}

/// Bit-destination unit unpack: OR the source in when `filler` is one,
/// clear under one bits when it is zero.
pub fn unpack_unit_bits_to_bits(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    dst_pos: i64,
    src: &(impl BitRead + ?Sized),
    src_pos: i64,
    count: i64,
    filler: bool,
) -> Result<()> {
    let combine = if filler { BitCombine::Or } else { BitCombine::AndNot };
    unpack_to_bits(policy, dst, dst_pos, src, src_pos, count, combine)
}

/// Bit-destination zero unpack: the dual of
/// [`unpack_unit_bits_to_bits`], touching only zero-bit positions.
pub fn unpack_zero_bits_to_bits(
    policy: &ExecPolicy,
    dst: &mut BitArr,
    dst_pos: i64,
    src: &(impl BitRead + ?Sized),
    src_pos: i64,
    count: i64,
    filler: bool,
) -> Result<()> {
    let combine = if filler { BitCombine::OrNot } else { BitCombine::And };
    unpack_to_bits(policy, dst, dst_pos, src, src_pos, count, combine)
}
