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

//! Strongly typed indices for the two index spaces of the problem.
//!
//! Items and bins are both addressed by dense `usize` indices, and mixing the
//! two up is exactly the kind of bug that survives every test on square
//! instances. `ItemIndex` and `BinIndex` are zero-cost `#[repr(transparent)]`
//! wrappers that make the compiler catch the mixup instead.

/// Identifier of an item, stable for the lifetime of an instance.
/// Items are numbered `0..num_items`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemIndex(usize);

impl ItemIndex {
    /// Creates a new `ItemIndex` from a raw `usize`.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying `usize` index.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for ItemIndex {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl From<ItemIndex> for usize {
    fn from(index: ItemIndex) -> Self {
        index.0
    }
}

impl std::fmt::Debug for ItemIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ItemIndex({})", self.0)
    }
}

impl std::fmt::Display for ItemIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ItemIndex({})", self.0)
    }
}

/// Identifier of an open bin within a packing.
///
/// Bins carry no identity beyond their contents; the index only records the
/// order in which bins were opened, so any relabeling of bins describes the
/// same packing.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinIndex(usize);

impl BinIndex {
    /// Creates a new `BinIndex` from a raw `usize`.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying `usize` index.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for BinIndex {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl From<BinIndex> for usize {
    fn from(index: BinIndex) -> Self {
        index.0
    }
}

impl std::fmt::Debug for BinIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BinIndex({})", self.0)
    }
}

impl std::fmt::Display for BinIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BinIndex({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_get() {
        let item = ItemIndex::new(7);
        assert_eq!(item.get(), 7);

        let bin = BinIndex::new(3);
        assert_eq!(bin.get(), 3);
    }

    #[test]
    fn test_conversions() {
        let item: ItemIndex = 42.into();
        assert_eq!(item.get(), 42);
        let raw: usize = item.into();
        assert_eq!(raw, 42);

        let bin: BinIndex = 5.into();
        let raw: usize = bin.into();
        assert_eq!(raw, 5);
    }

    #[test]
    fn test_debug_and_display() {
        assert_eq!(format!("{}", ItemIndex::new(2)), "ItemIndex(2)");
        assert_eq!(format!("{:?}", ItemIndex::new(2)), "ItemIndex(2)");
        assert_eq!(format!("{}", BinIndex::new(0)), "BinIndex(0)");
        assert_eq!(format!("{:?}", BinIndex::new(0)), "BinIndex(0)");
    }

    #[test]
    fn test_ordering() {
        assert!(ItemIndex::new(1) < ItemIndex::new(2));
        assert!(BinIndex::new(0) < BinIndex::new(1));
    }
}
