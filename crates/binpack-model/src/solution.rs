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

use crate::index::{BinIndex, ItemIndex};
use crate::instance::Instance;
use crate::num::SizeInt;

/// A complete packing: every item assigned to exactly one bin.
///
/// This struct uses a Structure of Arrays (SoA) layout: `item_bins[i]` is the
/// bin holding item `i`. Bin indices are dense, `0..bin_count`, in the order
/// the bins were opened. The grouped per-bin view is derived on demand via
/// [`Solution::bins`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Number of non-empty bins used by this packing.
    bin_count: usize,

    /// The assigned bin for each item.
    /// `item_bins[i]` is the bin assigned to item `i`.
    item_bins: Vec<BinIndex>,
}

impl Solution {
    /// Constructs a new `Solution` from a per-item bin assignment.
    ///
    /// # Panics
    ///
    /// Panics if any assigned bin index is not below `bin_count`.
    pub fn new(bin_count: usize, item_bins: Vec<BinIndex>) -> Self {
        assert!(
            item_bins.iter().all(|bin| bin.get() < bin_count),
            "called Solution::new with a bin index out of range: bin_count is {}",
            bin_count
        );

        Self {
            bin_count,
            item_bins,
        }
    }

    /// Returns the bin assigned to a specific item.
    ///
    /// # Panics
    ///
    /// Panics if `item` is out of bounds.
    #[inline]
    pub fn bin_for_item(&self, item: ItemIndex) -> BinIndex {
        let index = item.get();
        debug_assert!(
            index < self.num_items(),
            "called `Solution::bin_for_item` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );

        self.item_bins[index]
    }

    /// Returns the number of items in this packing.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.item_bins.len()
    }

    /// Returns the number of non-empty bins used. This is the objective
    /// value of the packing.
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Returns a slice of assigned bins for all items.
    #[inline]
    pub fn item_bins(&self) -> &[BinIndex] {
        &self.item_bins
    }

    /// Returns the grouped view: an ordered list of bins, each a list of the
    /// item identifiers it contains. Items appear in ascending identifier
    /// order within each bin.
    pub fn bins(&self) -> Vec<Vec<ItemIndex>> {
        let mut bins: Vec<Vec<ItemIndex>> = vec![Vec::new(); self.bin_count];
        for (index, bin) in self.item_bins.iter().enumerate() {
            bins[bin.get()].push(ItemIndex::new(index));
        }
        bins
    }

    /// Checks this packing against an instance: item count matches, every
    /// bin index is in range, every bin is non-empty, and no bin's member
    /// sizes sum beyond the capacity.
    pub fn verify<T>(&self, instance: &Instance<T>) -> bool
    where
        T: SizeInt,
    {
        if self.num_items() != instance.num_items() {
            return false;
        }

        let mut fills: Vec<u64> = vec![0; self.bin_count];
        for (index, bin) in self.item_bins.iter().enumerate() {
            if bin.get() >= self.bin_count {
                return false;
            }
            fills[bin.get()] += instance.size_u64(ItemIndex::new(index));
        }

        let capacity = instance.capacity_u64();
        fills.iter().all(|&fill| fill > 0 && fill <= capacity)
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Packing Summary")?;
        writeln!(f, "   Bins used: {}", self.bin_count)?;
        writeln!(f)?;

        if self.num_items() == 0 {
            writeln!(f, "   (No items packed)")?;
            return Ok(());
        }

        writeln!(f, "   {:<6} | {:<30}", "Bin", "Items")?;
        writeln!(f, "   {:-<6}-+-{:-<30}", "", "")?;
        for (bin, items) in self.bins().iter().enumerate() {
            let members = items
                .iter()
                .map(|item| item.get().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "   {:<6} | {:<30}", bin, members)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bi(index: usize) -> BinIndex {
        BinIndex::new(index)
    }

    fn ii(index: usize) -> ItemIndex {
        ItemIndex::new(index)
    }

    #[test]
    fn test_new_and_basic_accessors() {
        let solution = Solution::new(2, vec![bi(0), bi(1), bi(0)]);

        assert_eq!(solution.bin_count(), 2);
        assert_eq!(solution.num_items(), 3);
        assert_eq!(solution.bin_for_item(ii(0)), bi(0));
        assert_eq!(solution.bin_for_item(ii(1)), bi(1));
        assert_eq!(solution.bin_for_item(ii(2)), bi(0));
        assert_eq!(solution.item_bins(), &[bi(0), bi(1), bi(0)]);
    }

    #[test]
    #[should_panic(expected = "bin index out of range")]
    fn test_new_panics_on_out_of_range_bin() {
        let _ = Solution::new(1, vec![bi(0), bi(1)]);
    }

    #[test]
    fn test_grouped_bin_view() {
        let solution = Solution::new(2, vec![bi(0), bi(1), bi(0), bi(1)]);
        let bins = solution.bins();

        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0], vec![ii(0), ii(2)]);
        assert_eq!(bins[1], vec![ii(1), ii(3)]);
    }

    #[test]
    fn test_verify_accepts_feasible_packing() {
        let instance = Instance::<u32>::new(vec![5, 5, 5, 5], 10).unwrap();
        let solution = Solution::new(2, vec![bi(0), bi(0), bi(1), bi(1)]);
        assert!(solution.verify(&instance));
    }

    #[test]
    fn test_verify_rejects_capacity_violation() {
        let instance = Instance::<u32>::new(vec![6, 6], 10).unwrap();
        // Both items in one bin: 12 > 10.
        let solution = Solution::new(1, vec![bi(0), bi(0)]);
        assert!(!solution.verify(&instance));
    }

    #[test]
    fn test_verify_rejects_empty_bin() {
        let instance = Instance::<u32>::new(vec![5, 5], 10).unwrap();
        // bin_count claims 2 bins but everything sits in bin 0.
        let solution = Solution::new(2, vec![bi(0), bi(0)]);
        assert!(!solution.verify(&instance));
    }

    #[test]
    fn test_verify_rejects_item_count_mismatch() {
        let instance = Instance::<u32>::new(vec![5, 5, 5], 10).unwrap();
        let solution = Solution::new(1, vec![bi(0), bi(0)]);
        assert!(!solution.verify(&instance));
    }

    #[test]
    fn test_display_formatting_example() {
        let solution = Solution::new(2, vec![bi(0), bi(0), bi(1)]);
        let displayed = format!("{}", solution);

        assert!(displayed.contains("Bins used: 2"));
        assert!(displayed.contains("0, 1"));
    }
}
