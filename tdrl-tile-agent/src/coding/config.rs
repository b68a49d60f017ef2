//! Configuration of [`TileCode`](super::TileCode).
use super::DimensionInfo;
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`TileCode`](super::TileCode).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TileCodeConfig {
    /// Descriptors of the dimensions, one per parameter.
    pub dimensions: Vec<DimensionInfo>,

    /// The number of tilings.
    pub num_tilings: usize,

    /// The number of weights of hashed tile codes.
    ///
    /// Collision-free tile codes derive their size from the dimensions and
    /// ignore this value.
    #[serde(default)]
    pub table_size: Option<usize>,

    /// Seed of the random offsets of the tilings and of seeded hashers.
    #[serde(default)]
    pub seed: u64,
}

impl Default for TileCodeConfig {
    fn default() -> Self {
        Self {
            dimensions: vec![],
            num_tilings: 1,
            table_size: None,
            seed: 42,
        }
    }
}

impl TileCodeConfig {
    /// Sets all dimensions.
    pub fn dimensions(mut self, v: Vec<DimensionInfo>) -> Self {
        self.dimensions = v;
        self
    }

    /// Appends a dimension.
    pub fn dimension(mut self, v: DimensionInfo) -> Self {
        self.dimensions.push(v);
        self
    }

    /// Sets the number of tilings.
    pub fn num_tilings(mut self, v: usize) -> Self {
        self.num_tilings = v;
        self
    }

    /// Sets the size of the weight table of hashed tile codes.
    pub fn table_size(mut self, v: usize) -> Self {
        self.table_size = Some(v);
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Loads [`TileCodeConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of tile code from {}", path_.display());
        Ok(b)
    }

    /// Saves [`TileCodeConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of tile code into {}", path_.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_tile_code_config() -> Result<()> {
        let config = TileCodeConfig::default()
            .dimension(DimensionInfo::new(-0.5, 0.5, 3)?)
            .dimension(DimensionInfo::with_generalization_scale(0.0, 10.0, 5, 0.5)?)
            .num_tilings(8)
            .table_size(1024)
            .seed(7);

        let dir = TempDir::new("tile_code_config")?;
        let path = dir.path().join("tile_code_config.yaml");
        println!("{:?}", path);

        config.save(&path)?;
        let config_ = TileCodeConfig::load(&path)?;
        assert_eq!(config, config_);

        let yaml = serde_yaml::to_string(&config)?;
        println!("{}", yaml);

        Ok(())
    }
}
