//! Tile code engine.
use super::{
    CollisionFree, DimensionInfo, Hashed, Indexing, SeededRngHasher, TileCodeConfig, UnhHasher,
    Xxh3Hasher,
};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tdrl_core::TdrlError;

/// Tile coding over a `D`-dimensional box.
///
/// The engine owns the weight table of a linear value function. Every query
/// of [`TileCode::feature_vector`] returns exactly `num_tilings` indices, each
/// within `[0, size())`.
///
/// The random offsets of the tilings are drawn once at construction from the
/// seed in [`TileCodeConfig`]. Drawing them per query would need far more
/// tilings to generalize consistently.
#[derive(Debug, Clone)]
pub struct TileCode<I> {
    dimensions: Vec<DimensionInfo>,
    num_tilings: usize,

    /// `random_offsets[t][d]`, the shift of tiling `t` along dimension `d`.
    random_offsets: Vec<Vec<f64>>,

    weights: Vec<f32>,
    indexing: I,
}

impl<I: Indexing> TileCode<I> {
    /// Builds a tile code with the given indexing strategy.
    ///
    /// All weights start at zero.
    pub fn build(config: &TileCodeConfig, indexing: I) -> Result<Self, TdrlError> {
        if config.dimensions.is_empty() {
            return Err(TdrlError::InvalidConfig(
                "tile code needs at least one dimension".to_string(),
            ));
        }
        if config.num_tilings == 0 {
            return Err(TdrlError::InvalidConfig(
                "number of tilings must be positive".to_string(),
            ));
        }
        for dim in config.dimensions.iter() {
            dim.validate()?;
        }

        let dimensions = config.dimensions.clone();
        let size = indexing.size(&dimensions, config.num_tilings)?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut random_offsets = Vec::with_capacity(config.num_tilings);
        for _ in 0..config.num_tilings {
            let mut offsets = Vec::with_capacity(dimensions.len());
            for dim in dimensions.iter() {
                let cell = dim.range_magnitude() as f64 / dim.grid_count_ideal() as f64;
                let u: f64 = rng.gen();
                offsets.push(u * cell * dim.generalization_scale() as f64);
            }
            random_offsets.push(offsets);
        }

        info!(
            "Built tile code with {} tilings over {} dimensions, {} weights",
            config.num_tilings,
            dimensions.len(),
            size
        );

        Ok(Self {
            dimensions,
            num_tilings: config.num_tilings,
            random_offsets,
            weights: vec![0.0; size],
            indexing,
        })
    }

    /// Returns the active tiles of `params`, one per tiling.
    pub fn feature_vector(&self, params: &[f32]) -> Result<Vec<usize>, TdrlError> {
        self.check_params(params)?;

        let size = self.weights.len();
        let mut coords = vec![0i64; self.dimensions.len()];
        let mut fv = Vec::with_capacity(self.num_tilings);
        for t in 0..self.num_tilings {
            for (d, &p) in params.iter().enumerate() {
                coords[d] = self.grid_value(p, t, d);
            }
            let ix = self.indexing.index(&coords, t, &self.dimensions, size)?;
            if ix >= size {
                return Err(TdrlError::FeatureOutOfRange { index: ix, size });
            }
            fv.push(ix);
        }
        Ok(fv)
    }

    /// Returns the sum of the weights at `fv`.
    pub fn value_from_feature_vector(&self, fv: &[usize]) -> Result<f32, TdrlError> {
        let mut sum = 0f32;
        for &i in fv {
            sum += self.at(i)?;
        }
        Ok(sum)
    }

    /// Returns the value of `params`.
    pub fn value(&self, params: &[f32]) -> Result<f32, TdrlError> {
        let fv = self.feature_vector(params)?;
        self.value_from_feature_vector(&fv)
    }

    /// Returns the grid coordinate of `param` in tiling `tiling`, dimension
    /// `dimension`:
    /// `floor((param + offset[t][d] - lower[d]) * grid_count_ideal[d] / range[d])`.
    ///
    /// # Panics
    ///
    /// Panics if `tiling` or `dimension` is out of range.
    pub fn grid_value(&self, param: f32, tiling: usize, dimension: usize) -> i64 {
        let dim = &self.dimensions[dimension];
        let shifted =
            param as f64 + self.random_offsets[tiling][dimension] - dim.lower_bound() as f64;
        (shifted * dim.grid_count_ideal() as f64 / dim.range_magnitude() as f64).floor() as i64
    }

    /// Returns the weight at `i`.
    pub fn at(&self, i: usize) -> Result<f32, TdrlError> {
        self.weights
            .get(i)
            .copied()
            .ok_or(TdrlError::FeatureOutOfRange {
                index: i,
                size: self.weights.len(),
            })
    }

    /// Returns a mutable reference to the weight at `i`.
    pub fn at_mut(&mut self, i: usize) -> Result<&mut f32, TdrlError> {
        let size = self.weights.len();
        self.weights
            .get_mut(i)
            .ok_or(TdrlError::FeatureOutOfRange { index: i, size })
    }

    /// Returns the number of weights.
    pub fn size(&self) -> usize {
        self.weights.len()
    }

    /// Returns the number of tilings.
    pub fn num_tilings(&self) -> usize {
        self.num_tilings
    }

    /// Returns the number of dimensions.
    pub fn dimension(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns the descriptors of the dimensions.
    pub fn dimensions(&self) -> &[DimensionInfo] {
        &self.dimensions
    }

    /// Returns the weight table.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Sets all weights to zero, keeping the offsets of the tilings.
    pub fn reset_weights(&mut self) {
        self.weights.iter_mut().for_each(|w| *w = 0.0);
    }

    /// Returns the indexing strategy.
    pub fn indexing(&self) -> &I {
        &self.indexing
    }

    fn check_params(&self, params: &[f32]) -> Result<(), TdrlError> {
        if params.len() != self.dimensions.len() {
            return Err(TdrlError::DimensionMismatch {
                expected: self.dimensions.len(),
                actual: params.len(),
            });
        }
        if let Some((d, &p)) = params.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(TdrlError::NonFiniteParameter {
                dimension: d,
                value: p,
            });
        }
        Ok(())
    }
}

fn table_size(config: &TileCodeConfig) -> Result<usize, TdrlError> {
    config.table_size.ok_or_else(|| {
        TdrlError::InvalidConfig("hashed tile code requires table_size".to_string())
    })
}

impl TileCode<CollisionFree> {
    /// Builds a collision-free tile code.
    pub fn collision_free(config: &TileCodeConfig) -> Result<Self, TdrlError> {
        Self::build(config, CollisionFree)
    }
}

impl TileCode<Hashed<UnhHasher>> {
    /// Builds a tile code hashed with [`UnhHasher`].
    pub fn unh(config: &TileCodeConfig) -> Result<Self, TdrlError> {
        let size = table_size(config)?;
        Self::build(config, Hashed::new(UnhHasher::new(config.seed), size))
    }
}

impl TileCode<Hashed<SeededRngHasher>> {
    /// Builds a tile code hashed with [`SeededRngHasher`].
    pub fn seeded_rng(config: &TileCodeConfig) -> Result<Self, TdrlError> {
        let size = table_size(config)?;
        Self::build(config, Hashed::new(SeededRngHasher::new(config.seed), size))
    }
}

impl TileCode<Hashed<Xxh3Hasher>> {
    /// Builds a tile code hashed with [`Xxh3Hasher`].
    pub fn xxh3(config: &TileCodeConfig) -> Result<Self, TdrlError> {
        let size = table_size(config)?;
        Self::build(config, Hashed::new(Xxh3Hasher::new(config.seed), size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn config_2d() -> TileCodeConfig {
        TileCodeConfig::default()
            .dimension(DimensionInfo::new(-0.5, 0.5, 3).unwrap())
            .dimension(DimensionInfo::new(-0.5, 0.5, 3).unwrap())
            .num_tilings(4)
            .table_size(100)
            .seed(0)
    }

    fn grid(n: usize) -> Vec<[f32; 2]> {
        let step = 1.0 / (n - 1) as f32;
        let mut ps = vec![];
        for i in 0..n {
            for j in 0..n {
                ps.push([-0.5 + i as f32 * step, -0.5 + j as f32 * step]);
            }
        }
        ps
    }

    fn assert_feature_vectors_in_range<I: Indexing>(tile_code: &TileCode<I>) {
        for p in grid(11) {
            let fv = tile_code.feature_vector(&p).unwrap();
            assert_eq!(fv.len(), tile_code.num_tilings());
            assert!(fv.iter().all(|&i| i < tile_code.size()));
            assert_eq!(fv, tile_code.feature_vector(&p).unwrap());
        }
    }

    #[test]
    fn test_collision_free_size_and_range() {
        let tile_code = TileCode::collision_free(&config_2d()).unwrap();
        assert_eq!(tile_code.dimension(), 2);
        assert_eq!(tile_code.num_tilings(), 4);
        assert_eq!(tile_code.size(), 4 * 4 * 4);
        assert_feature_vectors_in_range(&tile_code);
    }

    #[test]
    fn test_hashed_size_and_range() {
        let config = config_2d();
        let unh = TileCode::unh(&config).unwrap();
        assert_eq!(unh.size(), 100);
        assert_feature_vectors_in_range(&unh);

        let rng = TileCode::seeded_rng(&config).unwrap();
        assert_eq!(rng.size(), 100);
        assert_feature_vectors_in_range(&rng);

        let xxh3 = TileCode::xxh3(&config).unwrap();
        assert_eq!(xxh3.size(), 100);
        assert_feature_vectors_in_range(&xxh3);
    }

    #[test]
    fn test_hashed_requires_table_size() {
        let mut config = config_2d();
        config.table_size = None;
        assert!(matches!(
            TileCode::unh(&config),
            Err(TdrlError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_collision_free_tilings_are_disjoint() {
        let tile_code = TileCode::collision_free(&config_2d()).unwrap();
        let per_tiling = tile_code.size() / tile_code.num_tilings();
        for p in grid(7) {
            let fv = tile_code.feature_vector(&p).unwrap();
            for (t, &ix) in fv.iter().enumerate() {
                assert_eq!(ix / per_tiling, t);
            }
        }
    }

    #[test]
    fn test_collision_free_distinct_cells_get_distinct_indices() {
        let tile_code = TileCode::collision_free(&config_2d()).unwrap();
        let ps = grid(9);
        for t in 0..tile_code.num_tilings() {
            let mut cells = HashSet::new();
            let mut indices = HashSet::new();
            for p in ps.iter() {
                let cell = (
                    tile_code.grid_value(p[0], t, 0),
                    tile_code.grid_value(p[1], t, 1),
                );
                let ix = tile_code.feature_vector(p).unwrap()[t];
                cells.insert(cell);
                indices.insert(ix);
            }
            // One index per cell and vice versa.
            assert_eq!(cells.len(), indices.len());
        }
    }

    #[test]
    fn test_offsets_are_fixed_at_construction() {
        let config = config_2d();
        let t1 = TileCode::collision_free(&config).unwrap();
        let t2 = TileCode::collision_free(&config).unwrap();
        let t3 = TileCode::collision_free(&config.clone().seed(1)).unwrap();

        for p in grid(5) {
            assert_eq!(t1.feature_vector(&p).unwrap(), t2.feature_vector(&p).unwrap());
        }
        assert_ne!(t1.random_offsets, t3.random_offsets);
        for (tiling, dims) in t1.random_offsets.iter().enumerate() {
            for (d, &o) in dims.iter().enumerate() {
                assert!((0.0..1.0 / 3.0).contains(&o), "offset[{}][{}] = {}", tiling, d, o);
            }
        }
    }

    #[test]
    fn test_invalid_queries_fail() {
        let tile_code = TileCode::collision_free(&config_2d()).unwrap();
        assert_eq!(
            tile_code.feature_vector(&[0.0]),
            Err(TdrlError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(matches!(
            tile_code.feature_vector(&[0.0, f32::NAN]),
            Err(TdrlError::NonFiniteParameter { dimension: 1, .. })
        ));
        assert!(matches!(
            tile_code.feature_vector(&[5.0, 0.0]),
            Err(TdrlError::CoordinateOutOfRange { dimension: 0, .. })
        ));
        assert!(matches!(
            tile_code.feature_vector(&[0.0, -1.0]),
            Err(TdrlError::CoordinateOutOfRange { dimension: 1, .. })
        ));
        assert_eq!(
            tile_code.at(64),
            Err(TdrlError::FeatureOutOfRange {
                index: 64,
                size: 64
            })
        );
        assert!(tile_code.value_from_feature_vector(&[0, 64]).is_err());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        assert!(TileCode::collision_free(&TileCodeConfig::default()).is_err());
        assert!(TileCode::collision_free(&config_2d().num_tilings(0)).is_err());

        let yaml = "dimensions:\n  - lower_bound: 0.0\n    upper_bound: 0.0\n    grid_count_ideal: 2\nnum_tilings: 1\n";
        let config: TileCodeConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            TileCode::collision_free(&config),
            Err(TdrlError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_value_is_sum_of_active_weights() {
        let mut tile_code = TileCode::collision_free(&config_2d()).unwrap();
        let p = [0.1, -0.2];
        assert_eq!(tile_code.value(&p).unwrap(), 0.0);

        let fv = tile_code.feature_vector(&p).unwrap();
        for (k, &i) in fv.iter().enumerate() {
            *tile_code.at_mut(i).unwrap() = k as f32 + 1.0;
        }
        assert_eq!(tile_code.value(&p).unwrap(), 1.0 + 2.0 + 3.0 + 4.0);
        assert_eq!(tile_code.value_from_feature_vector(&fv).unwrap(), 10.0);

        tile_code.reset_weights();
        assert_eq!(tile_code.value(&p).unwrap(), 0.0);
        assert_eq!(tile_code.feature_vector(&p).unwrap(), fv);
    }

    #[test]
    fn test_generalization_scale_keeps_bounds_on_grid() {
        let sweep: Vec<f32> = (0..=100).map(|i| i as f32 / 100.0).collect();

        // Shifts of up to one cell stay on the collision-free grid.
        let config = TileCodeConfig::default()
            .dimension(DimensionInfo::with_generalization_scale(0.0, 1.0, 4, 1.0).unwrap())
            .num_tilings(16)
            .table_size(256);
        let tile_code = TileCode::collision_free(&config).unwrap();
        for &p in sweep.iter() {
            let fv = tile_code.feature_vector(&[p]).unwrap();
            assert_eq!(fv.len(), 16);
        }

        // Larger shifts are rejected up front, or absorbed by hashing.
        let config = config.dimensions(vec![
            DimensionInfo::with_generalization_scale(0.0, 1.0, 4, 3.0).unwrap(),
        ]);
        assert!(matches!(
            TileCode::collision_free(&config),
            Err(TdrlError::InvalidConfig(_))
        ));
        let tile_code = TileCode::xxh3(&config).unwrap();
        for &p in sweep.iter() {
            let fv = tile_code.feature_vector(&[p]).unwrap();
            assert!(fv.len() == 16 && fv.iter().all(|&i| i < 256));
        }
    }

    #[test]
    fn test_huge_grid_count_is_rejected() {
        let yaml = format!(
            "dimensions:\n  - lower_bound: 0.0\n    upper_bound: 1.0\n    grid_count_ideal: {}\nnum_tilings: 1\n",
            usize::MAX
        );
        let config: TileCodeConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(matches!(
            TileCode::collision_free(&config),
            Err(TdrlError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_single_cell_tile_code_starts_at_zero() {
        let config = TileCodeConfig::default()
            .dimension(DimensionInfo::new(0.0, 1.0, 1).unwrap())
            .num_tilings(1);
        let tile_code = TileCode::collision_free(&config).unwrap();
        assert_eq!(tile_code.size(), 2);
        assert_eq!(tile_code.value(&[0.5]).unwrap(), 0.0);
    }
}
