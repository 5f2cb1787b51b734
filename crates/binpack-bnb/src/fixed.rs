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

//! Fixed placements for bin packing.
//!
//! `FixedPlacement` is a compact value object that pins an item to a bin
//! before the search starts. It is used to express pre-placed work, to carve
//! a root subtree out for a parallel worker, or to replay partial packings
//! from solver output.
//!
//! Bin indices in a fixed set must be dense: a placement may target an
//! already-open bin or the next fresh index, in the order the placements are
//! applied.
//!
//! Ordering
//! - Total order: by `bin_index`, then `item_index`.

use binpack_model::index::{BinIndex, ItemIndex};

/// A fixed placement of an item into a specific bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPlacement {
    /// The index of the bin.
    pub bin_index: BinIndex,

    /// The index of the item.
    pub item_index: ItemIndex,
}

impl FixedPlacement {
    #[inline]
    pub fn new(bin_index: BinIndex, item_index: ItemIndex) -> FixedPlacement {
        Self {
            bin_index,
            item_index,
        }
    }
}

impl PartialOrd for FixedPlacement {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedPlacement {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.bin_index
            .cmp(&other.bin_index)
            .then(self.item_index.cmp(&other.item_index))
    }
}

impl std::fmt::Display for FixedPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FixedPlacement(item: {}, bin: {})",
            self.item_index, self.bin_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_by_bin_then_item() {
        let a = FixedPlacement::new(BinIndex::new(0), ItemIndex::new(3));
        let b = FixedPlacement::new(BinIndex::new(0), ItemIndex::new(5));
        let c = FixedPlacement::new(BinIndex::new(1), ItemIndex::new(0));

        let mut placements = vec![c, b, a];
        placements.sort();
        assert_eq!(placements, vec![a, b, c]);
    }

    #[test]
    fn test_display() {
        let placement = FixedPlacement::new(BinIndex::new(2), ItemIndex::new(7));
        assert_eq!(
            format!("{}", placement),
            "FixedPlacement(item: ItemIndex(7), bin: BinIndex(2))"
        );
    }
}
