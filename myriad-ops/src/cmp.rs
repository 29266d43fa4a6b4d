use myriad_arr::{AnyArr, ArrRead, ObjArr};
use myriad_base::{packed, read_only, Prim, Result};
use std::cmp::Ordering;

/// An order predicate `less(a, b)` over element indices of one array.
/// Indices must be valid for the array; the predicate panics otherwise,
/// like slice indexing does.
pub type IndexOrder<'a> = Box<dyn Fn(i64, i64) -> bool + Send + Sync + 'a>;

fn prim_order<T: Prim>(data: &[T], reverse: bool) -> IndexOrder<'_> {
    if reverse {
        Box::new(move |a, b| T::total_lt(data[b as usize], data[a as usize]))
    } else {
        Box::new(move |a, b| T::total_lt(data[a as usize], data[b as usize]))
    }
}

/// Synthesize the natural order predicate for a writable array: widened
/// numeric comparison, total order for floats (NaN above positive
/// infinity, `-0.0 == +0.0`), and false-before-true for bits.
/// `reverse` swaps the arguments.
pub fn default_comparator(arr: &AnyArr, reverse: bool) -> Result<IndexOrder<'_>> {
    if !arr.is_mutable() {
        return Err(read_only("comparator over a read-only array"));
    }
    Ok(match arr {
        AnyArr::Bit(a) => {
            let words = a.words();
            if reverse {
                Box::new(move |a, b| {
                    !packed::get_bit(words, b as u64) && packed::get_bit(words, a as u64)
                })
            } else {
                Box::new(move |a, b| {
                    !packed::get_bit(words, a as u64) && packed::get_bit(words, b as u64)
                })
            }
        }
        AnyArr::U8(a) => prim_order(a.as_slice(), reverse),
        AnyArr::C16(a) | AnyArr::U16(a) => prim_order(a.as_slice(), reverse),
        AnyArr::I32(a) => prim_order(a.as_slice(), reverse),
        AnyArr::I64(a) => prim_order(a.as_slice(), reverse),
        AnyArr::F32(a) => prim_order(a.as_slice(), reverse),
        AnyArr::F64(a) => prim_order(a.as_slice(), reverse),
    })
}

/// Order predicate for an opaque-object array from a caller-supplied
/// element order.
pub fn object_comparator<'a, T, F>(
    arr: &'a ObjArr<T>,
    order: F,
    reverse: bool,
) -> Result<IndexOrder<'a>>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'a,
{
    if !arr.is_mutable() {
        return Err(read_only("comparator over a read-only array"));
    }
    let data = arr.as_slice();
    Ok(if reverse {
        Box::new(move |a, b| order(&data[b as usize], &data[a as usize]) == Ordering::Less)
    } else {
        Box::new(move |a, b| order(&data[a as usize], &data[b as usize]) == Ordering::Less)
    })
}
