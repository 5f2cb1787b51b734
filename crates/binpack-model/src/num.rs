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

//! # Size Numeric Trait
//!
//! Unified numeric bounds for item sizes and bin capacities. `SizeInt`
//! collects the capabilities every solver tier needs from the size type into
//! a single alias, so generic signatures stay readable and all components
//! agree on the same arithmetic contract.
//!
//! Sizes are positive integers and bin fills only ever grow, so the alias
//! requires `Unsigned`. Aggregate quantities (total instance size, per-bin
//! fill levels, free space) are never computed in `T` itself: every consumer
//! widens through `Into<u64>` and does the accumulation in `u64`, which makes
//! overflow in bound computation impossible for any supported size type.
//!
//! `u8`, `u16`, `u32` and `u64` all qualify.

use num_traits::{PrimInt, Unsigned};
use std::hash::Hash;

/// A trait alias for integer types usable as item sizes and bin capacities.
///
/// # Note
///
/// `u128` is intentionally excluded: `Into<u64>` is the widening hinge for
/// all aggregate arithmetic, and a 128-bit size type has no practical
/// instance to justify the slower wide math.
pub trait SizeInt:
    PrimInt
    + Unsigned
    + Into<u64>
    + TryFrom<u64>
    + std::fmt::Debug
    + std::fmt::Display
    + Hash
    + Send
    + Sync
{
}

impl<T> SizeInt for T where
    T: PrimInt
        + Unsigned
        + Into<u64>
        + TryFrom<u64>
        + std::fmt::Debug
        + std::fmt::Display
        + Hash
        + Send
        + Sync
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_size_int<T: SizeInt>() {}

    #[test]
    fn test_standard_unsigned_types_qualify() {
        assert_size_int::<u8>();
        assert_size_int::<u16>();
        assert_size_int::<u32>();
        assert_size_int::<u64>();
    }

    #[test]
    fn test_widening_round_trip() {
        let size: u16 = 40_000;
        let wide: u64 = size.into();
        assert_eq!(wide, 40_000u64);
        assert_eq!(u16::try_from(wide).ok(), Some(size));
    }
}
