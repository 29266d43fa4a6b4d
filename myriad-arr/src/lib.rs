// Typed linear arrays addressed by i64 positions, and the lazy views
// over them.
//
// Storage types (PrimArr, BitArr, ObjArr) own a Vec and hand out
// exclusive mutation through &mut plus runtime read-only / growable
// flags. Views (SubArr, Frozen, ConcatArr, ShiftArr) hold Arc-counted
// references to their sources and are immutable by construction; code
// that needs to write through a logical window does so via the window
// indexer in myriad-mat, which takes the backing storage per call.
//
// Bulk operators that mutate a destination from several worker threads
// use the raw views in raw.rs, which trade the borrow checker for a
// documented disjoint-ranges contract.

mod any;
mod arr;
mod bit;
mod concat;
mod obj;
mod prim;
mod raw;
mod shift;

pub use any::AnyArr;
pub use arr::{check_count, check_index, check_range, ArrRead, ArrWrite, BitRead, BitWrite, Frozen, SubArr};
pub use bit::BitArr;
pub use concat::ConcatArr;
pub use obj::ObjArr;
pub use prim::PrimArr;
pub use raw::{RawBits, RawSlice};
pub use shift::ShiftArr;
