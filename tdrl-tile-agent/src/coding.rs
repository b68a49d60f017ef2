//! Tile coding.
//!
//! A tile code covers a `D`-dimensional box with `num_tilings` grids. Each
//! grid is shifted by a random offset fixed at construction, so every
//! parameter vector activates exactly one tile per tiling and nearby vectors
//! share some of their tiles. The value of a parameter vector is the sum of
//! the weights of its active tiles.
//!
//! How grid coordinates become weight indices is decided by an [`Indexing`]
//! strategy:
//!
//! * [`CollisionFree`] enumerates every (tiling, coordinate) pair. Indices
//!   never collide, but the table grows with the product of grid sizes.
//! * [`Hashed`] reduces coordinates with a [`TileHasher`] into a table of
//!   fixed size. Unrelated regions may share a weight.
//!
//! ```rust
//! use tdrl_tile_agent::coding::{DimensionInfo, TileCode, TileCodeConfig};
//!
//! let config = TileCodeConfig::default()
//!     .dimension(DimensionInfo::new(-0.5, 0.5, 3).unwrap())
//!     .dimension(DimensionInfo::new(-0.5, 0.5, 3).unwrap())
//!     .num_tilings(4);
//! let tile_code = TileCode::collision_free(&config).unwrap();
//!
//! assert_eq!(tile_code.size(), 4 * 4 * 4);
//! assert_eq!(tile_code.feature_vector(&[0.1, -0.2]).unwrap().len(), 4);
//! ```
mod config;
mod dimension;
mod hasher;
mod indexing;
mod tile_code;
pub use config::TileCodeConfig;
pub use dimension::DimensionInfo;
pub use hasher::{SeededRngHasher, TileHasher, UnhHasher, Xxh3Hasher};
pub use indexing::{CollisionFree, Hashed, Indexing};
pub use tile_code::TileCode;
