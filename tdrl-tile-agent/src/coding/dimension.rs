//! Description of one axis of a tile code.
use serde::{Deserialize, Serialize};
use tdrl_core::TdrlError;

fn default_generalization_scale() -> f32 {
    1.0
}

/// Range, resolution and generalization of one dimension.
///
/// The range `[a, b]` is divided into `grid_count_ideal` cells. A higher grid
/// count gives more precision, a lower one more generalization. Since the
/// grid is shifted by up to one cell, the grid actually spans
/// `grid_count_ideal + 1` cells, see [`DimensionInfo::grid_count_real`].
///
/// The generalization scale stretches the random shift of the tilings.
/// Values in `[0, 1)` reduce generalization. Values greater than 1 shift the
/// grids by more than one cell, which only hashed tile codes accept since the
/// shifted coordinates leave the real grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionInfo {
    lower_bound: f32,
    upper_bound: f32,
    grid_count_ideal: usize,
    #[serde(default = "default_generalization_scale")]
    generalization_scale: f32,
}

impl DimensionInfo {
    /// Constructs a dimension over `[lower_bound, upper_bound]` with
    /// generalization scale 1.
    pub fn new(lower_bound: f32, upper_bound: f32, grid_count: usize) -> Result<Self, TdrlError> {
        Self::with_generalization_scale(lower_bound, upper_bound, grid_count, 1.0)
    }

    /// Constructs a dimension with an explicit generalization scale.
    pub fn with_generalization_scale(
        lower_bound: f32,
        upper_bound: f32,
        grid_count: usize,
        generalization_scale: f32,
    ) -> Result<Self, TdrlError> {
        let dim = Self {
            lower_bound,
            upper_bound,
            grid_count_ideal: grid_count,
            generalization_scale,
        };
        dim.validate()?;
        Ok(dim)
    }

    /// Checks the invariants of the dimension.
    ///
    /// Deserialized values bypass the constructors, so
    /// [`TileCode`](super::TileCode) calls this again when it is built.
    pub fn validate(&self) -> Result<(), TdrlError> {
        if self.grid_count_ideal == 0 {
            return Err(TdrlError::InvalidConfig(
                "grid count must be positive".to_string(),
            ));
        }
        if self.grid_count_ideal.checked_add(1).is_none() {
            return Err(TdrlError::InvalidConfig(format!(
                "grid count is too large: {}",
                self.grid_count_ideal
            )));
        }
        if !self.lower_bound.is_finite() || !self.upper_bound.is_finite() {
            return Err(TdrlError::InvalidConfig(format!(
                "bounds must be finite: [{}, {}]",
                self.lower_bound, self.upper_bound
            )));
        }
        if self.lower_bound == self.upper_bound {
            return Err(TdrlError::InvalidConfig(format!(
                "degenerate range: [{}, {}]",
                self.lower_bound, self.upper_bound
            )));
        }
        if !self.generalization_scale.is_finite() || self.generalization_scale < 0.0 {
            return Err(TdrlError::InvalidConfig(format!(
                "generalization scale must be non-negative: {}",
                self.generalization_scale
            )));
        }
        Ok(())
    }

    /// Returns `|b - a| / grid_count_ideal`, the width of one cell.
    pub fn offset(&self) -> f32 {
        self.range_magnitude() / self.grid_count_ideal as f32
    }

    /// Returns `grid_count_ideal + 1`.
    pub fn grid_count_real(&self) -> usize {
        self.grid_count_ideal + 1
    }

    /// Returns the number of cells the range is divided into.
    pub fn grid_count_ideal(&self) -> usize {
        self.grid_count_ideal
    }

    /// Returns `|b - a|`.
    pub fn range_magnitude(&self) -> f32 {
        (self.upper_bound - self.lower_bound).abs()
    }

    /// Returns `a` in `[a, b]`.
    pub fn lower_bound(&self) -> f32 {
        self.lower_bound
    }

    /// Returns `b` in `[a, b]`.
    pub fn upper_bound(&self) -> f32 {
        self.upper_bound
    }

    /// Returns the generalization scale.
    pub fn generalization_scale(&self) -> f32 {
        self.generalization_scale
    }

    /// Sets `a` in `[a, b]`.
    pub fn set_lower_bound(&mut self, lower_bound: f32) -> Result<(), TdrlError> {
        self.try_set(|d| d.lower_bound = lower_bound)
    }

    /// Sets `b` in `[a, b]`.
    pub fn set_upper_bound(&mut self, upper_bound: f32) -> Result<(), TdrlError> {
        self.try_set(|d| d.upper_bound = upper_bound)
    }

    /// Sets the number of cells.
    pub fn set_grid_count_ideal(&mut self, grid_count: usize) -> Result<(), TdrlError> {
        self.try_set(|d| d.grid_count_ideal = grid_count)
    }

    /// Sets the generalization scale.
    pub fn set_generalization_scale(&mut self, scale: f32) -> Result<(), TdrlError> {
        self.try_set(|d| d.generalization_scale = scale)
    }

    // Applies `f` to a copy and commits it only if the copy is valid.
    fn try_set(&mut self, f: impl FnOnce(&mut Self)) -> Result<(), TdrlError> {
        let mut dim = self.clone();
        f(&mut dim);
        dim.validate()?;
        *self = dim;
        Ok(())
    }
}
