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

//! Deterministic random instance generation for tests and benchmarks.

use binpack_model::{
    instance::{Instance, InvalidInstance},
    num::SizeInt,
};
use rand::distr::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Generates an instance with `num_items` items sized uniformly from
/// `size_range`, clamped to the capacity. The same seed always yields the
/// same instance.
///
/// # Errors
///
/// Returns `InvalidInstance` under the usual instance rules, e.g. when
/// `num_items` is zero, the capacity is zero, or the range produces a
/// zero-size item.
pub fn uniform_instance<T>(
    num_items: usize,
    size_range: RangeInclusive<T>,
    capacity: T,
    seed: u64,
) -> Result<Instance<T>, InvalidInstance>
where
    T: SizeInt + SampleUniform,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let sizes: Vec<T> = (0..num_items)
        .map(|_| rng.random_range(size_range.clone()).min(capacity))
        .collect();
    Instance::new(sizes, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_instance() {
        let first = uniform_instance::<u32>(32, 1..=50, 100, 7).expect("valid parameters");
        let second = uniform_instance::<u32>(32, 1..=50, 100, 7).expect("valid parameters");
        assert_eq!(first.sizes(), second.sizes());
    }

    #[test]
    fn test_different_seeds_differ() {
        let first = uniform_instance::<u32>(32, 1..=50, 100, 1).expect("valid parameters");
        let second = uniform_instance::<u32>(32, 1..=50, 100, 2).expect("valid parameters");
        assert_ne!(first.sizes(), second.sizes());
    }

    #[test]
    fn test_sizes_clamped_to_capacity() {
        let instance = uniform_instance::<u32>(64, 1..=200, 50, 3).expect("valid parameters");
        assert!(instance.sizes().iter().all(|&size| size <= 50));
    }

    #[test]
    fn test_zero_items_rejected() {
        let err = uniform_instance::<u32>(0, 1..=10, 20, 0).unwrap_err();
        assert_eq!(err, InvalidInstance::NoItems);
    }
}
