// Block-parallel bulk operations over the array contracts.
//
// Everything here runs through one scheduler shape: slice [0, n) into
// fixed-size blocks, let worker tasks claim blocks off an atomic cursor
// in ascending position order, fold per-task partial results, merge on
// the caller thread. Operators choose the block cap (65536 elements for
// most, 32768 for 32-bit integer sums so an i64 partial cannot
// overflow), whether more than one task is allowed (floating-point
// summation is pinned to one task so the result is bit-identical across
// runs), and how partials merge (lowest-index tie breaking for the
// extremum scans, plain addition for histograms and cardinality).
//
// Destination-writing operators partition the destination on block
// boundaries and go through the raw views of myriad-arr; packed-bit
// destinations additionally trim the request head so every block
// boundary falls on a 64-bit word boundary.

mod cmp;
mod copy;
mod exec;
mod find;
mod hist;
mod packbits;
mod pool;
mod range;
mod sum;
mod unpack;

pub use cmp::{default_comparator, object_comparator, IndexOrder};
pub use copy::{comparing_copy, comparing_copy_any, comparing_copy_bits, CopyAlgorithm, CopyResult};
pub use exec::{BlockExec, BlockOp, CancelToken, ExecPolicy};
pub use find::{index_of, last_index_of};
pub use hist::{histogram, histogram_any, histogram_bits, Histogram};
pub use packbits::{pack_ge, pack_gt, pack_le, pack_lt};
pub use pool::ScratchPool;
pub use range::{min_max, min_max_any, min_max_bits, MinMax};
pub use sum::{precise_sum, precise_sum_any, sum, sum_any, sum_bits};
pub use unpack::{
    unpack_bits, unpack_bits_to_bits, unpack_unit_bits, unpack_unit_bits_to_bits,
    unpack_zero_bits, unpack_zero_bits_to_bits,
};

#[cfg(test)]
mod test;
