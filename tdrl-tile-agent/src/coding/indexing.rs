//! Strategies mapping grid coordinates to weight indices.
use super::{DimensionInfo, TileHasher};
use tdrl_core::TdrlError;

/// Maps the grid coordinates of one tiling to an index of the weight table.
pub trait Indexing {
    /// Returns the number of weights the strategy needs.
    fn size(&self, dimensions: &[DimensionInfo], num_tilings: usize) -> Result<usize, TdrlError>;

    /// Returns the weight index of `coords` in tiling `tiling`.
    ///
    /// `size` is the value returned by [`Indexing::size`].
    fn index(
        &self,
        coords: &[i64],
        tiling: usize,
        dimensions: &[DimensionInfo],
        size: usize,
    ) -> Result<usize, TdrlError>;
}

/// Collision-free indexing, recommended for medium-size state spaces.
///
/// Coordinates are combined in mixed radix,
/// `c_0 + c_1 r_0 + c_2 r_0 r_1 + ...` with `r_d` the real grid count of
/// dimension `d`, and tiling `t` is placed at `t * Π r_d`. Every
/// (tiling, coordinate) pair has its own weight, at the cost of a table of
/// `num_tilings * Π r_d` weights.
///
/// Shifts of more than one cell would leave the real grid, so dimensions with
/// a generalization scale greater than 1 are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionFree;

impl CollisionFree {
    fn grid_points(dimensions: &[DimensionInfo]) -> Result<usize, TdrlError> {
        dimensions.iter().try_fold(1usize, |acc, dim| {
            acc.checked_mul(dim.grid_count_real()).ok_or_else(|| {
                TdrlError::InvalidConfig("number of grid points overflows".to_string())
            })
        })
    }
}

impl Indexing for CollisionFree {
    fn size(&self, dimensions: &[DimensionInfo], num_tilings: usize) -> Result<usize, TdrlError> {
        if let Some((d, dim)) = dimensions
            .iter()
            .enumerate()
            .find(|(_, dim)| dim.generalization_scale() > 1.0)
        {
            return Err(TdrlError::InvalidConfig(format!(
                "collision-free tile code needs generalization scale <= 1, dimension {} has {}",
                d,
                dim.generalization_scale()
            )));
        }
        Self::grid_points(dimensions)?
            .checked_mul(num_tilings)
            .ok_or_else(|| TdrlError::InvalidConfig("size of tile code overflows".to_string()))
    }

    fn index(
        &self,
        coords: &[i64],
        tiling: usize,
        dimensions: &[DimensionInfo],
        _size: usize,
    ) -> Result<usize, TdrlError> {
        let mut ix = 0usize;
        let mut mult = 1usize;
        for (d, (&c, dim)) in coords.iter().zip(dimensions.iter()).enumerate() {
            let real = dim.grid_count_real();
            if c < 0 || c as usize >= real {
                return Err(TdrlError::CoordinateOutOfRange {
                    dimension: d,
                    coordinate: c,
                });
            }
            ix += c as usize * mult;
            mult *= real;
        }
        Ok(ix + mult * tiling)
    }
}

/// Hashed indexing into a table of fixed size.
///
/// Memory no longer depends on the dimensionality. Unrelated regions may
/// share weights, which adds noise to value estimates.
#[derive(Debug, Clone)]
pub struct Hashed<H> {
    hasher: H,
    size: usize,
}

impl<H: TileHasher> Hashed<H> {
    /// Constructs hashed indexing with `size` weights.
    pub fn new(hasher: H, size: usize) -> Self {
        Self { hasher, size }
    }

    /// Returns the hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

impl<H: TileHasher> Indexing for Hashed<H> {
    fn size(&self, _dimensions: &[DimensionInfo], _num_tilings: usize) -> Result<usize, TdrlError> {
        if self.size == 0 {
            return Err(TdrlError::InvalidConfig(
                "table size of hashed tile code must be positive".to_string(),
            ));
        }
        Ok(self.size)
    }

    fn index(
        &self,
        coords: &[i64],
        tiling: usize,
        dimensions: &[DimensionInfo],
        size: usize,
    ) -> Result<usize, TdrlError> {
        Ok((self.hasher.hash(coords, tiling, dimensions) % size as u64) as usize)
    }
}
