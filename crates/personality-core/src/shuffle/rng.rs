//! Seed hashing and the seeded generator behind question ordering.
//!
//! Both primitives operate on wrapping 32-bit arithmetic so an order
//! produced here matches one produced by the browser for the same seed.
//! Neither is cryptographic.

/// xmur3-style string hash.
///
/// Consumes the seed as UTF-16 code units and yields a stream of 32-bit
/// values from a MurmurHash3-like finalizer. Only the first value is used
/// to seed [`Mulberry32`].
#[derive(Debug, Clone, Copy)]
pub struct SeedHasher {
    h: u32,
}

impl SeedHasher {
    pub fn new(seed: &str) -> Self {
        let units: Vec<u16> = seed.encode_utf16().collect();
        let mut h = 1_779_033_703u32 ^ units.len() as u32;
        for unit in units {
            h = (h ^ u32::from(unit)).wrapping_mul(3_432_918_353);
            h = h.rotate_left(13);
        }
        Self { h }
    }

    /// Next hashed value.
    pub fn next_u32(&mut self) -> u32 {
        let mut h = self.h;
        h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
        h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
        h ^= h >> 16;
        self.h = h;
        h
    }
}

/// Mulberry32 generator: one 32-bit word of state.
#[derive(Debug, Clone, Copy)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed from a string through [`SeedHasher`].
    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(SeedHasher::new(seed).next_u32())
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform float in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Index in `0..len` scaled from [`next_f64`](Self::next_f64).
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len - 1)
    }

    /// Fisher-Yates shuffle in place, walking from the back.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hasher_is_deterministic() {
        let mut a = SeedHasher::new("abc");
        let mut b = SeedHasher::new("abc");
        for _ in 0..8 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn hasher_separates_nearby_seeds() {
        let a = SeedHasher::new("seed-1").next_u32();
        let b = SeedHasher::new("seed-2").next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_seed_is_a_valid_input() {
        let first = SeedHasher::new("").next_u32();
        assert_eq!(first, SeedHasher::new("").next_u32());
    }

    #[test]
    fn rng_reproducibility() {
        let mut rng1 = Mulberry32::from_seed_str("session");
        let mut rng2 = Mulberry32::from_seed_str("session");
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn rng_different_seeds() {
        let mut rng1 = Mulberry32::new(12345);
        let mut rng2 = Mulberry32::new(54321);
        let vals1: Vec<_> = (0..10).map(|_| rng1.next_u32()).collect();
        let vals2: Vec<_> = (0..10).map(|_| rng2.next_u32()).collect();
        assert_ne!(vals1, vals2);
    }

    #[test]
    fn floats_stay_in_unit_interval() {
        let mut rng = Mulberry32::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn next_index_is_bounded() {
        let mut rng = Mulberry32::new(99);
        for len in 1..30 {
            for _ in 0..200 {
                assert!(rng.next_index(len) < len);
            }
        }
        assert_eq!(rng.next_index(0), 0);
    }

    #[test]
    fn shuffle_keeps_every_element() {
        let mut rng = Mulberry32::new(2024);
        let mut items: Vec<u32> = (0..25).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..25).collect::<Vec<_>>());
    }
}
