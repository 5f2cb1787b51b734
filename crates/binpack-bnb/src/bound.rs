// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Lower bounds on the optimal bin count.
//!
//! Two bounds live here. The root bound combines the continuous relaxation
//! `L1 = ceil(total / capacity)` with the half-capacity refinement `L2`:
//! every item larger than half a bin demands a dedicated bin, the remaining
//! volume first soaks into the leftover space of those dedicated bins, and
//! whatever is left over demands fresh bins by the capacity argument. The
//! per-node completion bound is the cheap variant consulted at every search
//! node; both must never exceed the true optimum, since an overestimate
//! would let the search prune the optimal subtree.

use binpack_model::{instance::Instance, num::SizeInt};

/// Computes a lower bound on the bins needed for the whole instance.
///
/// Returns `max(L1, L2)` where `L1` is the continuous relaxation bound and
/// `L2` the half-capacity refinement described in the module docs. Runs in a
/// single pass over the item sizes.
pub fn lower_bound<T>(instance: &Instance<T>) -> usize
where
    T: SizeInt,
{
    let capacity = instance.capacity_u64();
    let l1 = instance.total_size().div_ceil(capacity);

    // L2: items larger than half the capacity can never share a bin with
    // each other, so each opens a bin. Smaller items may ride along in the
    // space those bins have left; only the residue forces additional bins.
    let mut dedicated: u64 = 0;
    let mut dedicated_free: u64 = 0;
    let mut small_total: u64 = 0;
    for &size in instance.sizes() {
        let size: u64 = size.into();
        // `size > capacity - size` is `2*size > capacity` without the
        // doubling, which would wrap for u64 sizes past 2^63.
        if size > capacity - size {
            dedicated += 1;
            dedicated_free += capacity - size;
        } else {
            small_total += size;
        }
    }
    let l2 = dedicated + small_total.saturating_sub(dedicated_free).div_ceil(capacity);

    l1.max(l2) as usize
}

/// Computes a lower bound on the total bins of any completion of a partial
/// packing.
///
/// `bins_open` bins already exist with `open_free_total` free space summed
/// across them; `remaining_total` is the volume still unassigned and
/// `stranded_items` the number of unassigned items that fit into no open bin
/// and are each larger than half a bin (so no two of them can share a fresh
/// bin either). Both arguments of the inner `max` are valid bounds on the
/// fresh bins any completion must open:
/// - volume: free space in open bins absorbs at most `open_free_total`, the
///   rest needs at least `ceil(residue / capacity)` fresh bins;
/// - stranded items: each needs its own fresh bin.
#[inline]
pub fn completion_lower_bound(
    capacity: u64,
    bins_open: usize,
    open_free_total: u64,
    remaining_total: u64,
    stranded_items: usize,
) -> usize {
    debug_assert!(capacity > 0, "called `completion_lower_bound` with zero capacity");

    let by_volume = remaining_total
        .saturating_sub(open_free_total)
        .div_ceil(capacity) as usize;

    bins_open + by_volume.max(stranded_items)
}
