//! Generation parameters, scenario files, and up-front validation.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_map_width() -> u32 {
    25
}

fn default_map_length() -> u32 {
    25
}

fn default_max_height() -> u8 {
    10
}

fn default_edge_width() -> u32 {
    2
}

fn default_average_building_size() -> u32 {
    5
}

fn default_block_height() -> u8 {
    2
}

fn default_max_block_iterations() -> u32 {
    4
}

fn default_symmetry() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Grown building footprint (the normal mode).
    #[default]
    Building,
    /// Stamp the fixed pyramid height field instead of growing.
    Pyramid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    pub seed: u64,
    #[serde(default = "default_map_width")]
    pub map_width: u32,
    #[serde(default = "default_map_length")]
    pub map_length: u32,
    #[serde(default = "default_max_height")]
    pub map_max_height: u8,
    /// Boundary ring cleared after generation.
    #[serde(default = "default_edge_width")]
    pub map_edge_width: u32,
    #[serde(default = "default_average_building_size")]
    pub average_building_size: u32,
    #[serde(default = "default_block_height")]
    pub block_height: u8,
    #[serde(default = "default_max_block_iterations")]
    pub max_block_iterations: u32,
    #[serde(default = "default_symmetry")]
    pub symmetry: bool,
    #[serde(default)]
    pub mode: GenerationMode,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            map_width: default_map_width(),
            map_length: default_map_length(),
            map_max_height: default_max_height(),
            map_edge_width: default_edge_width(),
            average_building_size: default_average_building_size(),
            block_height: default_block_height(),
            max_block_iterations: default_max_block_iterations(),
            symmetry: default_symmetry(),
            mode: GenerationMode::Building,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("map {0}x{1} is too small: both dimensions must be at least 10 to fit a seed block inside the boundary ring")]
    MapTooSmall(u32, u32),
    #[error("boundary ring of width {ring} leaves no interior on a {width}x{length} map")]
    RingTooWide { ring: u32, width: u32, length: u32 },
    #[error("map_max_height must be at least 1")]
    ZeroMaxHeight,
    #[error("average_building_size must be at least 2, got {0}")]
    BuildingTooSmall(u32),
    #[error("block_height must be at least 1")]
    ZeroBlockHeight,
    #[error("block_height {block} exceeds map_max_height {max}")]
    BlockTallerThanMap { block: u8, max: u8 },
}

impl MapConfig {
    /// Reject degenerate configurations before any generation work; a grid
    /// too small for its seed block is an input error, not an empty result.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width < 10 || self.map_length < 10 {
            return Err(ConfigError::MapTooSmall(self.map_width, self.map_length));
        }
        let interior = self.map_width.min(self.map_length);
        if self.map_edge_width * 2 + 4 > interior {
            return Err(ConfigError::RingTooWide {
                ring: self.map_edge_width,
                width: self.map_width,
                length: self.map_length,
            });
        }
        if self.map_max_height == 0 {
            return Err(ConfigError::ZeroMaxHeight);
        }
        if self.average_building_size < 2 {
            return Err(ConfigError::BuildingTooSmall(self.average_building_size));
        }
        if self.block_height == 0 {
            return Err(ConfigError::ZeroBlockHeight);
        }
        if self.block_height > self.map_max_height {
            return Err(ConfigError::BlockTallerThanMap {
                block: self.block_height,
                max: self.map_max_height,
            });
        }
        Ok(())
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<MapConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let config: MapConfig = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MapConfig::default().validate().is_ok());
    }

    #[test]
    fn tiny_map_is_rejected() {
        let config = MapConfig {
            map_width: 6,
            map_length: 30,
            ..MapConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MapTooSmall(6, 30))
        ));
    }

    #[test]
    fn ring_swallowing_the_interior_is_rejected() {
        let config = MapConfig {
            map_width: 12,
            map_length: 12,
            map_edge_width: 5,
            ..MapConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RingTooWide { ring: 5, .. })
        ));
    }

    #[test]
    fn block_height_above_ceiling_is_rejected() {
        let config = MapConfig {
            block_height: 12,
            map_max_height: 10,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_defaults_fill_missing_fields() {
        let config: MapConfig = serde_yaml::from_str("seed: 7\nmap_width: 30\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.map_width, 30);
        assert_eq!(config.map_length, 25);
        assert_eq!(config.max_block_iterations, 4);
        assert!(config.symmetry);
        assert_eq!(config.mode, GenerationMode::Building);
    }

    #[test]
    fn yaml_parses_pyramid_mode() {
        let config: MapConfig = serde_yaml::from_str("seed: 1\nmode: pyramid\n").unwrap();
        assert_eq!(config.mode, GenerationMode::Pyramid);
    }
}
