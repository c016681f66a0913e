//! Seedable randomness shared by the minigames.
//!
//! Distribution contract:
//! - [`GardenRng::shuffle`] produces every permutation with equal probability
//!   (Fisher-Yates via [`SliceRandom::shuffle`]).
//! - [`GardenRng::pick_distinct`] returns `n` distinct positions chosen
//!   uniformly without replacement; their order is unspecified.
//! - [`GardenRng::pick_one`] picks each element with equal probability.
//!
//! The same seed always yields the same sequence, which tests rely on.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct GardenRng {
    inner: StdRng,
}

impl GardenRng {
    /// Deterministic generator for a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_option(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }

    /// Derive an independent child generator seed.
    pub fn next_seed(&mut self) -> u64 {
        self.inner.gen()
    }

    /// Uniform integer in `range`.
    pub fn range(&mut self, range: std::ops::RangeInclusive<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    /// Uniform float in `[low, high)`.
    pub fn float(&mut self, low: f32, high: f32) -> f32 {
        self.inner.gen_range(low..high)
    }

    /// Shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Shuffled copy of `items`.
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        self.shuffle(&mut out);
        out
    }

    /// `n` distinct elements (by position). Returns all of them
    /// if `n` exceeds the slice length.
    pub fn pick_distinct<T: Clone>(&mut self, items: &[T], n: usize) -> Vec<T> {
        items.choose_multiple(&mut self.inner, n).cloned().collect()
    }

    /// One element, or `None` for an empty slice.
    pub fn pick_one<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = GardenRng::seeded(99);
        let mut b = GardenRng::seeded(99);
        let items: Vec<u32> = (0..20).collect();
        assert_eq!(a.shuffled(&items), b.shuffled(&items));
        assert_eq!(a.next_seed(), b.next_seed());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GardenRng::seeded(1);
        let items: Vec<u32> = (1..=9).collect();
        let mut shuffled = rng.shuffled(&items);
        shuffled.sort();
        assert_eq!(shuffled, items);
    }

    #[test]
    fn test_pick_distinct() {
        let mut rng = GardenRng::seeded(5);
        let digits: Vec<u8> = (1..=9).collect();
        for _ in 0..100 {
            let picked = rng.pick_distinct(&digits, 3);
            assert_eq!(picked.len(), 3);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), 3);
        }
        assert_eq!(rng.pick_distinct(&digits, 20).len(), 9);
    }

    #[test]
    fn test_shuffle_roughly_uniform() {
        // Each of the 6 permutations of 3 items should show up often.
        let mut rng = GardenRng::seeded(2024);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..6000 {
            *counts.entry(rng.shuffled(&[1, 2, 3])).or_insert(0u32) += 1;
        }
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&c| c > 800 && c < 1200));
    }

    #[test]
    fn test_pick_one_empty() {
        let mut rng = GardenRng::seeded(0);
        let empty: [u8; 0] = [];
        assert!(rng.pick_one(&empty).is_none());
    }
}
