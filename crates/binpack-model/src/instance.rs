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

//! Immutable bin-packing instance.
//!
//! An `Instance` is constructed once from external input, validated up
//! front, and never mutated afterwards. It is therefore safe to share by
//! reference across any number of concurrent solver workers. Validation is
//! the only place a user-facing error can originate in the whole engine:
//! everything downstream operates on an instance that is known to be
//! well-formed (every size positive and at most the capacity), so a
//! feasible packing always exists.

use crate::index::ItemIndex;
use crate::num::SizeInt;
use thiserror::Error;

/// Rejection reasons for instance construction.
///
/// None of these are retryable; the caller must fix the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInstance {
    /// The bin capacity is zero.
    #[error("bin capacity must be positive")]
    ZeroCapacity,
    /// The item list is empty.
    #[error("instance must contain at least one item")]
    NoItems,
    /// An item has size zero.
    #[error("item {item} has zero size; item sizes must be positive")]
    ZeroSizeItem { item: usize },
    /// An item is larger than the bin capacity and can never be placed.
    #[error("item {item} has size {size} exceeding the bin capacity {capacity}")]
    ItemTooLarge {
        item: usize,
        size: u64,
        capacity: u64,
    },
}

/// An immutable bin-packing instance: a multiset of positive item sizes and
/// a single bin capacity.
///
/// Invariants (established at construction):
/// - `capacity > 0`
/// - `sizes` is non-empty
/// - for every item `i`: `0 < sizes[i] <= capacity`
///
/// `total_size` is precomputed in `u64` so that bound arithmetic downstream
/// never re-sums the items and never overflows the size type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance<T> {
    sizes: Vec<T>,
    capacity: T,
    total_size: u64,
}

impl<T> Instance<T>
where
    T: SizeInt,
{
    /// Builds a validated instance from raw item sizes and a capacity.
    ///
    /// Fails with [`InvalidInstance`] if the capacity is zero, the item list
    /// is empty, any item has size zero, or any item exceeds the capacity.
    pub fn new(sizes: Vec<T>, capacity: T) -> Result<Self, InvalidInstance> {
        if capacity.is_zero() {
            return Err(InvalidInstance::ZeroCapacity);
        }
        if sizes.is_empty() {
            return Err(InvalidInstance::NoItems);
        }

        let mut total_size: u64 = 0;
        for (item, &size) in sizes.iter().enumerate() {
            if size.is_zero() {
                return Err(InvalidInstance::ZeroSizeItem { item });
            }
            if size > capacity {
                return Err(InvalidInstance::ItemTooLarge {
                    item,
                    size: size.into(),
                    capacity: capacity.into(),
                });
            }
            total_size += size.into();
        }

        Ok(Self {
            sizes,
            capacity,
            total_size,
        })
    }

    /// Returns the number of items.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.sizes.len()
    }

    /// Returns the bin capacity.
    #[inline]
    pub fn capacity(&self) -> T {
        self.capacity
    }

    /// Returns the bin capacity widened to `u64`.
    #[inline]
    pub fn capacity_u64(&self) -> u64 {
        self.capacity.into()
    }

    /// Returns the precomputed sum of all item sizes.
    #[inline]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Returns the size of the given item.
    ///
    /// # Panics
    ///
    /// Panics if `item` is out of bounds.
    #[inline]
    pub fn size(&self, item: ItemIndex) -> T {
        let index = item.get();
        debug_assert!(
            index < self.num_items(),
            "called `Instance::size` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );

        self.sizes[index]
    }

    /// Returns the size of the given item without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `item` is within bounds `0..num_items`.
    #[inline]
    pub unsafe fn size_unchecked(&self, item: ItemIndex) -> T {
        let index = item.get();
        debug_assert!(
            index < self.num_items(),
            "called `Instance::size_unchecked` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );

        unsafe { *self.sizes.get_unchecked(index) }
    }

    /// Returns the size of the given item widened to `u64`.
    #[inline]
    pub fn size_u64(&self, item: ItemIndex) -> u64 {
        self.size(item).into()
    }

    /// Returns a slice of all item sizes, indexed by item identifier.
    #[inline]
    pub fn sizes(&self) -> &[T] {
        &self.sizes
    }
}

impl<T> std::fmt::Display for Instance<T>
where
    T: SizeInt,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Instance(items: {}, capacity: {}, total_size: {})",
            self.num_items(),
            self.capacity,
            self.total_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Size = u32;

    #[test]
    fn test_valid_instance_construction() {
        let instance = Instance::<Size>::new(vec![5, 3, 7], 10).expect("instance should be valid");

        assert_eq!(instance.num_items(), 3);
        assert_eq!(instance.capacity(), 10);
        assert_eq!(instance.capacity_u64(), 10u64);
        assert_eq!(instance.total_size(), 15u64);
        assert_eq!(instance.size(ItemIndex::new(0)), 5);
        assert_eq!(instance.size(ItemIndex::new(1)), 3);
        assert_eq!(instance.size(ItemIndex::new(2)), 7);
        assert_eq!(instance.sizes(), &[5, 3, 7]);
    }

    #[test]
    fn test_item_equal_to_capacity_is_allowed() {
        let instance = Instance::<Size>::new(vec![10], 10).expect("size == capacity is valid");
        assert_eq!(instance.size(ItemIndex::new(0)), 10);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Instance::<Size>::new(vec![1, 2], 0).unwrap_err();
        assert_eq!(err, InvalidInstance::ZeroCapacity);
    }

    #[test]
    fn test_empty_item_list_rejected() {
        let err = Instance::<Size>::new(Vec::new(), 10).unwrap_err();
        assert_eq!(err, InvalidInstance::NoItems);
    }

    #[test]
    fn test_zero_size_item_rejected() {
        let err = Instance::<Size>::new(vec![3, 0, 5], 10).unwrap_err();
        assert_eq!(err, InvalidInstance::ZeroSizeItem { item: 1 });
    }

    #[test]
    fn test_oversized_item_rejected() {
        // Scenario from the problem statement: a single item of size 6 with
        // capacity 5 can never be placed.
        let err = Instance::<Size>::new(vec![6], 5).unwrap_err();
        assert_eq!(
            err,
            InvalidInstance::ItemTooLarge {
                item: 0,
                size: 6,
                capacity: 5
            }
        );
    }

    #[test]
    fn test_total_size_does_not_overflow_narrow_types() {
        // 300 items of size 255 overflow u8 and even u16 accumulation,
        // but the total is carried in u64.
        let sizes = vec![255u8; 300];
        let instance = Instance::<u8>::new(sizes, 255).expect("instance should be valid");
        assert_eq!(instance.total_size(), 255u64 * 300);
    }

    #[test]
    fn test_error_display_messages() {
        let err = Instance::<Size>::new(vec![6], 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "item 0 has size 6 exceeding the bin capacity 5"
        );
        assert_eq!(
            InvalidInstance::ZeroCapacity.to_string(),
            "bin capacity must be positive"
        );
    }

    #[test]
    fn test_display_summary() {
        let instance = Instance::<Size>::new(vec![5, 5], 10).unwrap();
        assert_eq!(
            format!("{}", instance),
            "Instance(items: 2, capacity: 10, total_size: 10)"
        );
    }
}
