//! Hash functions for [`Hashed`](super::Hashed) tile codes.
use super::DimensionInfo;
use rand::{
    rngs::{SmallRng, StdRng},
    RngCore, SeedableRng,
};
use std::iter;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Reduces the grid coordinates of a tiling to a 64-bit hash.
///
/// The tile code takes the hash modulo its table size.
pub trait TileHasher {
    /// Hashes `coords` of tiling `tiling`.
    fn hash(&self, coords: &[i64], tiling: usize, dimensions: &[DimensionInfo]) -> u64;
}

const UNH_TABLE_SIZE: i64 = 2048;
const UNH_INCREMENT: i64 = 449;

/// The hash of the University of New Hampshire CMAC code.
///
/// A table of 2048 random numbers is drawn once. The hash of
/// `(c_0, ..., c_{D-1}, tiling)` is `Σ_i table[(c_i + 449 i) mod 2048]`.
#[derive(Debug, Clone)]
pub struct UnhHasher {
    table: Vec<u32>,
}

impl UnhHasher {
    /// Draws the random table from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let table = (0..UNH_TABLE_SIZE).map(|_| rng.next_u32()).collect();
        Self { table }
    }
}

impl TileHasher for UnhHasher {
    fn hash(&self, coords: &[i64], tiling: usize, _dimensions: &[DimensionInfo]) -> u64 {
        coords
            .iter()
            .copied()
            .chain(iter::once(tiling as i64))
            .enumerate()
            .fold(0u64, |sum, (i, c)| {
                let ix = c
                    .wrapping_add(UNH_INCREMENT.wrapping_mul(i as i64))
                    .rem_euclid(UNH_TABLE_SIZE);
                sum.wrapping_add(self.table[ix as usize] as u64)
            })
    }
}

/// Seeds a pseudo random generator with the combined coordinate and returns
/// its first output.
///
/// Coordinates are combined the same way as [`CollisionFree`](super::CollisionFree)
/// does, with wrapping arithmetic since hashed coordinates may leave the grid.
#[derive(Debug, Clone, Default)]
pub struct SeededRngHasher {
    seed: u64,
}

impl SeededRngHasher {
    /// Constructs the hasher. `seed` is mixed into every key.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl TileHasher for SeededRngHasher {
    fn hash(&self, coords: &[i64], tiling: usize, dimensions: &[DimensionInfo]) -> u64 {
        let mut key = 0i64;
        let mut mult = 1i64;
        for (c, dim) in coords.iter().zip(dimensions.iter()) {
            key = key.wrapping_add(c.wrapping_mul(mult));
            mult = mult.wrapping_mul(dim.grid_count_real() as i64);
        }
        key = key.wrapping_add(mult.wrapping_mul(tiling as i64));

        SmallRng::seed_from_u64(key as u64 ^ self.seed).next_u64()
    }
}

/// xxh3 over the little-endian bytes of the coordinates and the tiling.
#[derive(Debug, Clone, Default)]
pub struct Xxh3Hasher {
    seed: u64,
}

impl Xxh3Hasher {
    /// Constructs the hasher with the given xxh3 seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl TileHasher for Xxh3Hasher {
    fn hash(&self, coords: &[i64], tiling: usize, _dimensions: &[DimensionInfo]) -> u64 {
        let mut bytes = Vec::with_capacity(8 * (coords.len() + 1));
        for c in coords {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        bytes.extend_from_slice(&(tiling as u64).to_le_bytes());
        xxh3_64_with_seed(&bytes, self.seed)
    }
}
