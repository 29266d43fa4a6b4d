// Large typed arrays with 64-bit indexing.
//
// The pieces, leaves first:
//
//  - myriad-base: the error taxonomy, the closed set of element kinds,
//    and the packed-bit primitives (bit i at word i/64, mask 1 << i%64).
//  - myriad-arr: storage types (BitArr, PrimArr, ObjArr) behind the
//    ArrRead/ArrWrite contracts, plus the lazy views: sub-ranges,
//    frozen wrappers, concatenation, cyclic shift.
//  - myriad-mat: shapes, matrices, and windows — virtual d-dimensional
//    rectangles over a base with constant or mirror-cyclic boundary
//    continuation, bulk-accessed by line runs.
//  - myriad-ops: the block-parallel executor and the bulk operators:
//    comparing copy, sloppy and precise sums, min/max with indices,
//    histograms, threshold-to-bit packing, bit-to-numeric unpacking,
//    and default comparators.
//
// Everything is re-exported flat here; depend on this crate unless you
// only need a slice of the stack.

pub use myriad_base::{
    err, illegal, mismatch, oob, overflow, packed, read_only, too_large, unsupported, violated,
    Element, ElementKind, Error, ErrorKind, Prim, Result,
};

pub use myriad_arr::{
    check_count, check_index, check_range, AnyArr, ArrRead, ArrWrite, BitArr, BitRead, BitWrite,
    ConcatArr, Frozen, ObjArr, PrimArr, RawBits, RawSlice, ShiftArr, SubArr,
};

pub use myriad_mat::{Continuation, MatShape, Matrix, Translated, Window, WindowArr};

pub use myriad_ops::{
    comparing_copy, comparing_copy_any, comparing_copy_bits, default_comparator, histogram,
    histogram_any, histogram_bits, index_of, last_index_of, min_max, min_max_any, min_max_bits,
    object_comparator, pack_ge, pack_gt, pack_le, pack_lt, precise_sum, precise_sum_any, sum,
    sum_any, sum_bits,
    unpack_bits, unpack_bits_to_bits, unpack_unit_bits, unpack_unit_bits_to_bits,
    unpack_zero_bits, unpack_zero_bits_to_bits, BlockExec, BlockOp, CancelToken, CopyAlgorithm,
    CopyResult, ExecPolicy, Histogram, IndexOrder, MinMax, ScratchPool,
};

#[cfg(test)]
mod test;
