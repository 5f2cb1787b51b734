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

//! Search state management for the exact packer.
//!
//! This module provides `SearchState`, a compact, mutable container for
//! tracking the incremental assignment of items to bins during search.
//!
//! Key responsibilities:
//! - Maintain the fill level of every open bin (`fills`), densely indexed in
//!   the order the bins were opened.
//! - Maintain assignment status and the assigned bin per item.
//! - Keep the volume aggregates the per-node lower bound reads
//!   (`remaining_total`, `open_free_total`) current on every move.
//!
//! All fill arithmetic is done in `u64` so intermediate sums cannot overflow
//! regardless of the item-size type the instance was built with.
//!
//! The mutation API is push/pop: `place_in_open_bin` / `open_new_bin` are
//! undone by `remove_from_open_bin` / `close_newest_bin`, and the search must
//! undo moves in reverse order of application. `close_newest_bin` in
//! particular requires that the bin being closed is the newest one and holds
//! exactly the item that opened it.
//!
//! Performance considerations:
//! - Provides both checked and unchecked (unsafe) accessors and mutators.
//!   Unchecked variants avoid bounds checks for hot loops under the
//!   assumption that the caller ensures validity.
//! - Uses `FixedBitSet` to track assignments efficiently.
//!
//! Safety and invariants:
//! - All methods with `unsafe` in their name require the caller to ensure the
//!   provided indices are within bounds and the logical preconditions (e.g.,
//!   assignment status) are satisfied.
//! - Debug assertions are used extensively to catch invariant violations in
//!   debug builds. In release builds, callers must uphold invariants to avoid
//!   UB when using unchecked methods.

use binpack_model::{
    index::{BinIndex, ItemIndex},
    solution::Solution,
};
use fixedbitset::FixedBitSet;

/// A compact, mutable container holding the incremental search state for the
/// exact bin-packing solver.
///
/// The state tracks:
/// - `fills`: the used volume of every open bin, in opening order.
/// - `item_bins` and `item_assignments`: the assigned bin per item plus a
///   bitset marking which items are currently placed.
/// - `remaining_total`: summed size of the unassigned items.
/// - `open_free_total`: summed free space across all open bins.
///
/// Invariants (debug-checked):
/// - `num_assigned_items <= num_items`
/// - Every fill satisfies `0 < fill <= capacity`.
/// - `open_free_total == bins_open * capacity - sum(fills)`
#[derive(Debug, Clone)]
pub struct SearchState {
    fills: Vec<u64>,
    item_bins: Vec<BinIndex>,
    item_assignments: FixedBitSet,

    capacity: u64,
    remaining_total: u64,
    open_free_total: u64,

    num_items: usize,
    num_assigned_items: usize,
}

impl SearchState {
    /// Creates a new `SearchState` for `num_items` items of combined size
    /// `total_size` and the given bin capacity. The initial state has no bins
    /// open and no items assigned.
    #[inline]
    pub fn new(num_items: usize, total_size: u64, capacity: u64) -> Self {
        debug_assert!(capacity > 0, "called `SearchState::new` with zero capacity");

        Self {
            fills: Vec::with_capacity(num_items),
            item_bins: vec![BinIndex::new(0); num_items],
            item_assignments: FixedBitSet::with_capacity(num_items),
            capacity,
            remaining_total: total_size,
            open_free_total: 0,
            num_items,
            num_assigned_items: 0,
        }
    }

    /// Returns the number of items tracked by this state.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Returns the number of currently assigned items.
    #[inline]
    pub fn num_assigned_items(&self) -> usize {
        self.num_assigned_items
    }

    /// Returns the number of currently open bins. This is the objective
    /// value of the partial packing.
    #[inline]
    pub fn bins_open(&self) -> usize {
        self.fills.len()
    }

    /// Returns the bin capacity.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Returns the summed size of the items not yet assigned.
    #[inline]
    pub fn remaining_total(&self) -> u64 {
        self.remaining_total
    }

    /// Returns the summed free space across all open bins.
    #[inline]
    pub fn open_free_total(&self) -> u64 {
        self.open_free_total
    }

    /// Returns a slice of the fill levels of all open bins, in opening order.
    #[inline]
    pub fn fills(&self) -> &[u64] {
        &self.fills
    }

    /// Returns the free space left in the specified open bin.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if `bin_index` is out of bounds `0..bins_open`.
    #[inline]
    pub fn free_space(&self, bin_index: BinIndex) -> u64 {
        let index = bin_index.get();
        debug_assert!(
            index < self.bins_open(),
            "called `SearchState::free_space` with bin index out of bounds: the len is {} but the index is {}",
            self.bins_open(),
            index
        );

        self.capacity - self.fills[index]
    }

    /// Returns the free space left in the specified open bin without bounds
    /// checking.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if `bin_index` is out of bounds `0..bins_open`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `bin_index` is within bounds
    /// `0..bins_open`.
    #[inline]
    pub unsafe fn free_space_unchecked(&self, bin_index: BinIndex) -> u64 {
        let index = bin_index.get();
        debug_assert!(
            index < self.bins_open(),
            "called `SearchState::free_space_unchecked` with bin index out of bounds: the len is {} but the index is {}",
            self.bins_open(),
            index
        );

        self.capacity - unsafe { *self.fills.get_unchecked(index) }
    }

    /// Checks if the specified item is assigned in this state.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if `item_index` is out of bounds `0..num_items`.
    #[inline]
    pub fn is_item_assigned(&self, item_index: ItemIndex) -> bool {
        let index = item_index.get();
        debug_assert!(
            index < self.num_items,
            "called `SearchState::is_item_assigned` with item index out of bounds: the len is {} but the index is {}",
            self.num_items,
            index
        );

        self.item_assignments.contains(index)
    }

    /// Checks if the specified item is assigned in this state without bounds
    /// checking.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if `item_index` is out of bounds `0..num_items`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `item_index` is within bounds
    /// `0..num_items`.
    #[inline]
    pub unsafe fn is_item_assigned_unchecked(&self, item_index: ItemIndex) -> bool {
        let index = item_index.get();
        debug_assert!(
            index < self.num_items,
            "called `SearchState::is_item_assigned_unchecked` with item index out of bounds: the len is {} but the index is {}",
            self.num_items,
            index
        );

        unsafe { self.item_assignments.contains_unchecked(index) }
    }

    /// Returns the bin holding the specified item.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if `item_index` is out of bounds `0..num_items`
    /// or if the item is unassigned.
    #[inline]
    pub fn item_bin(&self, item_index: ItemIndex) -> BinIndex {
        let index = item_index.get();
        debug_assert!(
            index < self.num_items,
            "called `SearchState::item_bin` with item index out of bounds: the len is {} but the index is {}",
            self.num_items,
            index
        );
        debug_assert!(
            self.item_assignments.contains(index),
            "called `SearchState::item_bin` with item {} unassigned",
            index
        );

        self.item_bins[index]
    }

    /// Places an item into an already-open bin.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if `item_index` or `bin_index` is out of bounds,
    /// if the item is already assigned, or if the item does not fit into the
    /// bin's remaining free space.
    #[inline]
    pub fn place_in_open_bin(&mut self, item_index: ItemIndex, bin_index: BinIndex, size: u64) {
        let item = item_index.get();
        let bin = bin_index.get();
        debug_assert!(
            item < self.num_items,
            "called `SearchState::place_in_open_bin` with item index out of bounds: the len is {} but the index is {}",
            self.num_items,
            item
        );
        debug_assert!(
            bin < self.bins_open(),
            "called `SearchState::place_in_open_bin` with bin index out of bounds: the len is {} but the index is {}",
            self.bins_open(),
            bin
        );
        debug_assert!(
            !self.item_assignments.contains(item),
            "called `SearchState::place_in_open_bin` with item {} already assigned",
            item
        );
        debug_assert!(
            size <= self.capacity - self.fills[bin],
            "called `SearchState::place_in_open_bin` with item of size {} that does not fit: fill {} of {}",
            size,
            self.fills[bin],
            self.capacity
        );

        self.fills[bin] += size;
        self.item_bins[item] = bin_index;
        self.item_assignments.insert(item);
        self.num_assigned_items += 1;
        self.remaining_total -= size;
        self.open_free_total -= size;

        debug_assert!(self.num_assigned_items <= self.num_items);
    }

    /// Places an item into an already-open bin without bounds checking.
    ///
    /// # Panics
    ///
    /// In debug mode, panics under the same conditions as
    /// [`SearchState::place_in_open_bin`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that both indices are within bounds, that the
    /// item is unassigned, and that the item fits into the bin.
    #[inline]
    pub unsafe fn place_in_open_bin_unchecked(
        &mut self,
        item_index: ItemIndex,
        bin_index: BinIndex,
        size: u64,
    ) {
        let item = item_index.get();
        let bin = bin_index.get();
        debug_assert!(
            item < self.num_items,
            "called `SearchState::place_in_open_bin_unchecked` with item index out of bounds: the len is {} but the index is {}",
            self.num_items,
            item
        );
        debug_assert!(
            bin < self.bins_open(),
            "called `SearchState::place_in_open_bin_unchecked` with bin index out of bounds: the len is {} but the index is {}",
            self.bins_open(),
            bin
        );
        debug_assert!(
            !self.item_assignments.contains(item),
            "called `SearchState::place_in_open_bin_unchecked` with item {} already assigned",
            item
        );
        debug_assert!(
            size <= self.capacity - self.fills[bin],
            "called `SearchState::place_in_open_bin_unchecked` with item of size {} that does not fit: fill {} of {}",
            size,
            self.fills[bin],
            self.capacity
        );

        unsafe {
            *self.fills.get_unchecked_mut(bin) += size;
            *self.item_bins.get_unchecked_mut(item) = bin_index;
            self.item_assignments.insert_unchecked(item);
        }

        self.num_assigned_items += 1;
        self.remaining_total -= size;
        self.open_free_total -= size;

        debug_assert!(self.num_assigned_items <= self.num_items);
    }

    /// Removes an item from the open bin it sits in. Inverse of
    /// [`SearchState::place_in_open_bin`].
    ///
    /// # Panics
    ///
    /// In debug mode, panics if `item_index` is out of bounds, if the item is
    /// unassigned, or if removing the size would underflow the bin's fill.
    #[inline]
    pub fn remove_from_open_bin(&mut self, item_index: ItemIndex, size: u64) {
        let item = item_index.get();
        debug_assert!(
            item < self.num_items,
            "called `SearchState::remove_from_open_bin` with item index out of bounds: the len is {} but the index is {}",
            self.num_items,
            item
        );
        debug_assert!(
            self.item_assignments.contains(item),
            "called `SearchState::remove_from_open_bin` with item {} already unassigned",
            item
        );

        let bin = self.item_bins[item].get();
        debug_assert!(
            self.fills[bin] >= size,
            "called `SearchState::remove_from_open_bin` with size {} exceeding the bin fill {}",
            size,
            self.fills[bin]
        );

        self.fills[bin] -= size;
        self.item_assignments.set(item, false);
        self.num_assigned_items -= 1;
        self.remaining_total += size;
        self.open_free_total += size;
    }

    /// Opens a fresh bin holding exactly the given item and returns its
    /// index. Fresh bins always take the next dense index.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if `item_index` is out of bounds, if the item is
    /// already assigned, or if the item exceeds the capacity.
    #[inline]
    pub fn open_new_bin(&mut self, item_index: ItemIndex, size: u64) -> BinIndex {
        let item = item_index.get();
        debug_assert!(
            item < self.num_items,
            "called `SearchState::open_new_bin` with item index out of bounds: the len is {} but the index is {}",
            self.num_items,
            item
        );
        debug_assert!(
            !self.item_assignments.contains(item),
            "called `SearchState::open_new_bin` with item {} already assigned",
            item
        );
        debug_assert!(
            size <= self.capacity,
            "called `SearchState::open_new_bin` with item of size {} exceeding the capacity {}",
            size,
            self.capacity
        );

        let bin_index = BinIndex::new(self.fills.len());
        self.fills.push(size);
        self.item_bins[item] = bin_index;
        self.item_assignments.insert(item);
        self.num_assigned_items += 1;
        self.remaining_total -= size;
        self.open_free_total += self.capacity - size;

        debug_assert!(self.num_assigned_items <= self.num_items);

        bin_index
    }

    /// Closes the newest bin and unassigns the item that opened it. Inverse
    /// of [`SearchState::open_new_bin`]; legal only while the bin still holds
    /// exactly that one item.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if no bin is open, if the item is unassigned, if
    /// the item does not sit in the newest bin, or if the bin holds more than
    /// the item that opened it.
    #[inline]
    pub fn close_newest_bin(&mut self, item_index: ItemIndex, size: u64) {
        let item = item_index.get();
        debug_assert!(
            !self.fills.is_empty(),
            "called `SearchState::close_newest_bin` with no bin open"
        );
        debug_assert!(
            self.item_assignments.contains(item),
            "called `SearchState::close_newest_bin` with item {} already unassigned",
            item
        );
        debug_assert!(
            self.item_bins[item].get() == self.fills.len() - 1,
            "called `SearchState::close_newest_bin` with item {} not in the newest bin",
            item
        );
        debug_assert!(
            *self.fills.last().unwrap() == size,
            "called `SearchState::close_newest_bin` on a bin holding more than the opening item: fill is {} but the size is {}",
            self.fills.last().unwrap(),
            size
        );

        self.fills.pop();
        self.item_assignments.set(item, false);
        self.num_assigned_items -= 1;
        self.remaining_total += size;
        self.open_free_total -= self.capacity - size;
    }

    /// Resets the search state to its initial configuration: no bins open,
    /// no items assigned, the full volume remaining.
    #[inline]
    pub fn reset(&mut self, total_size: u64) {
        self.fills.clear();
        self.item_assignments.clear();
        self.item_bins.fill(BinIndex::new(0));
        self.num_assigned_items = 0;
        self.remaining_total = total_size;
        self.open_free_total = 0;
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "State(bins_open: {}, assigned_items: {}/{})",
            self.bins_open(),
            self.num_assigned_items,
            self.num_items
        )
    }
}

/// Error indicating that a packing is incomplete.
/// This error is returned when attempting to convert a `SearchState`
/// into a `Solution`, but not all items have been assigned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IncompletePackingError {
    assigned_items: usize,
    total_items: usize,
}

impl std::fmt::Display for IncompletePackingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Incomplete packing: assigned {}/{} items",
            self.assigned_items, self.total_items
        )
    }
}

impl std::error::Error for IncompletePackingError {}

impl TryFrom<&SearchState> for Solution {
    type Error = IncompletePackingError;

    fn try_from(state: &SearchState) -> Result<Solution, Self::Error> {
        if state.num_assigned_items() != state.num_items() {
            return Err(IncompletePackingError {
                assigned_items: state.num_assigned_items,
                total_items: state.num_items,
            });
        }

        Ok(Solution::new(
            state.bins_open(),
            state.item_bins.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ii(index: usize) -> ItemIndex {
        ItemIndex::new(index)
    }
    fn bi(index: usize) -> BinIndex {
        BinIndex::new(index)
    }

    #[test]
    fn test_new_initial_state() {
        let state = SearchState::new(4, 20, 10);

        assert_eq!(state.num_items(), 4);
        assert_eq!(state.num_assigned_items(), 0);
        assert_eq!(state.bins_open(), 0);
        assert_eq!(state.capacity(), 10);
        assert_eq!(state.remaining_total(), 20);
        assert_eq!(state.open_free_total(), 0);
        assert!(state.fills().is_empty());

        for index in 0..4 {
            assert!(!state.is_item_assigned(ii(index)));
            unsafe { assert!(!state.is_item_assigned_unchecked(ii(index))) }
        }
    }

    #[test]
    fn test_open_new_bin_updates_aggregates() {
        let mut state = SearchState::new(3, 18, 10);

        let bin = state.open_new_bin(ii(0), 7);
        assert_eq!(bin, bi(0));
        assert_eq!(state.bins_open(), 1);
        assert_eq!(state.num_assigned_items(), 1);
        assert_eq!(state.remaining_total(), 11);
        assert_eq!(state.open_free_total(), 3);
        assert_eq!(state.free_space(bi(0)), 3);
        assert!(state.is_item_assigned(ii(0)));
        assert_eq!(state.item_bin(ii(0)), bi(0));
    }

    #[test]
    fn test_place_in_open_bin_updates_aggregates() {
        let mut state = SearchState::new(3, 18, 10);

        state.open_new_bin(ii(0), 7);
        state.place_in_open_bin(ii(1), bi(0), 3);

        assert_eq!(state.bins_open(), 1);
        assert_eq!(state.num_assigned_items(), 2);
        assert_eq!(state.remaining_total(), 8);
        assert_eq!(state.open_free_total(), 0);
        assert_eq!(state.free_space(bi(0)), 0);
        assert_eq!(state.item_bin(ii(1)), bi(0));
    }

    #[test]
    fn test_unchecked_place_matches_checked() {
        let mut checked = SearchState::new(2, 9, 10);
        let mut unchecked = SearchState::new(2, 9, 10);

        checked.open_new_bin(ii(0), 5);
        unchecked.open_new_bin(ii(0), 5);

        checked.place_in_open_bin(ii(1), bi(0), 4);
        unsafe {
            unchecked.place_in_open_bin_unchecked(ii(1), bi(0), 4);
        }

        assert_eq!(checked.fills(), unchecked.fills());
        assert_eq!(checked.remaining_total(), unchecked.remaining_total());
        assert_eq!(checked.open_free_total(), unchecked.open_free_total());
        unsafe {
            assert_eq!(checked.free_space_unchecked(bi(0)), 1);
            assert_eq!(unchecked.free_space_unchecked(bi(0)), 1);
        }
    }

    #[test]
    fn test_remove_reverses_place() {
        let mut state = SearchState::new(3, 18, 10);

        state.open_new_bin(ii(0), 7);
        state.place_in_open_bin(ii(1), bi(0), 3);
        state.remove_from_open_bin(ii(1), 3);

        assert_eq!(state.bins_open(), 1);
        assert_eq!(state.num_assigned_items(), 1);
        assert_eq!(state.remaining_total(), 11);
        assert_eq!(state.open_free_total(), 3);
        assert!(!state.is_item_assigned(ii(1)));
    }

    #[test]
    fn test_close_reverses_open() {
        let mut state = SearchState::new(2, 12, 10);

        state.open_new_bin(ii(0), 7);
        state.open_new_bin(ii(1), 5);
        state.close_newest_bin(ii(1), 5);

        assert_eq!(state.bins_open(), 1);
        assert_eq!(state.num_assigned_items(), 1);
        assert_eq!(state.remaining_total(), 5);
        assert_eq!(state.open_free_total(), 3);
        assert!(!state.is_item_assigned(ii(1)));

        state.close_newest_bin(ii(0), 7);
        assert_eq!(state.bins_open(), 0);
        assert_eq!(state.remaining_total(), 12);
        assert_eq!(state.open_free_total(), 0);
    }

    #[test]
    fn test_free_total_invariant_through_lifecycle() {
        let mut state = SearchState::new(4, 22, 10);

        state.open_new_bin(ii(0), 8);
        state.open_new_bin(ii(1), 6);
        state.place_in_open_bin(ii(2), bi(0), 2);
        state.place_in_open_bin(ii(3), bi(1), 4);

        let expected: u64 =
            state.bins_open() as u64 * state.capacity() - state.fills().iter().sum::<u64>();
        assert_eq!(state.open_free_total(), expected);
        assert_eq!(state.remaining_total(), 2);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = SearchState::new(2, 12, 10);

        state.open_new_bin(ii(0), 7);
        state.place_in_open_bin(ii(1), bi(0), 3);
        state.reset(12);

        assert_eq!(state.bins_open(), 0);
        assert_eq!(state.num_assigned_items(), 0);
        assert_eq!(state.remaining_total(), 12);
        assert_eq!(state.open_free_total(), 0);
        assert!(!state.is_item_assigned(ii(0)));
        assert!(!state.is_item_assigned(ii(1)));
    }

    #[test]
    fn test_try_from_complete_state() {
        let mut state = SearchState::new(3, 15, 10);

        state.open_new_bin(ii(0), 7);
        state.place_in_open_bin(ii(1), bi(0), 3);
        state.open_new_bin(ii(2), 5);

        let solution = Solution::try_from(&state).expect("state is complete");
        assert_eq!(solution.bin_count(), 2);
        assert_eq!(solution.bin_for_item(ii(0)), bi(0));
        assert_eq!(solution.bin_for_item(ii(1)), bi(0));
        assert_eq!(solution.bin_for_item(ii(2)), bi(1));
    }

    #[test]
    fn test_try_from_incomplete_state_fails() {
        let mut state = SearchState::new(2, 12, 10);
        state.open_new_bin(ii(0), 7);

        let result = Solution::try_from(&state);
        let err = result.expect_err("state is incomplete");
        let text = format!("{}", err);
        assert!(text.contains("1/2"));
    }

    #[test]
    fn test_display_formats_summary() {
        let mut state = SearchState::new(3, 15, 10);
        state.open_new_bin(ii(0), 7);

        let formatted = format!("{}", state);
        assert!(formatted.contains("bins_open: 1"));
        assert!(formatted.contains("assigned_items: 1/3"));
    }
}
