//! JSON export of a finished grid, for the renderer and for inspection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Palette;
use crate::geometry::{IsoDimensions, TileMetrics};
use crate::tile::{TileKind, TileOptions};
use crate::world::{GridWorld, HeightVariation};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub id: u64,
    pub h: u8,
    pub kind: TileKind,
    pub color: String,
    pub options: TileOptions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub x: u32,
    pub y: u32,
    pub block_group: u32,
    pub corner: bool,
    pub tiles: Vec<TileSnapshot>,
}

/// Everything the renderer needs: dimensions, the palette, the projection
/// constants, and each defined column's stack.
#[derive(Debug, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub map_width: u32,
    pub map_length: u32,
    pub height_variation: HeightVariation,
    pub palette: Palette,
    pub tile_metrics: TileMetrics,
    pub projection: IsoDimensions,
    pub columns: Vec<ColumnSnapshot>,
}

impl GridSnapshot {
    pub fn from_world(world: &GridWorld) -> Self {
        let metrics = TileMetrics::default();
        let columns = world
            .columns()
            .filter(|c| c.is_defined())
            .map(|c| ColumnSnapshot {
                x: c.x(),
                y: c.y(),
                block_group: c.block_group,
                corner: c.corner,
                tiles: c
                    .tiles()
                    .iter()
                    .map(|t| TileSnapshot {
                        id: t.id(),
                        h: t.h(),
                        kind: t.kind,
                        color: t.color.hex(),
                        options: t.options.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            map_width: world.map_width(),
            map_length: world.map_length(),
            height_variation: world.height_variation(),
            palette: world.palette().clone(),
            tile_metrics: metrics,
            projection: IsoDimensions::from_metrics(&metrics),
            columns,
        }
    }
}

pub struct SnapshotWriter;

impl SnapshotWriter {
    pub fn write(world: &GridWorld, path: impl AsRef<Path>) -> Result<PathBuf, SnapshotError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let snapshot = GridSnapshot::from_world(world);
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::engine::GeneratorBuilder;

    #[test]
    fn snapshot_round_trips_through_json() {
        let config = MapConfig {
            seed: 31,
            ..MapConfig::default()
        };
        let (world, _) = GeneratorBuilder::standard(config).build().run().unwrap();
        let snapshot = GridSnapshot::from_world(&world);
        assert_eq!(snapshot.columns.len(), world.defined_count());

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: GridSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.map_width, snapshot.map_width);
        assert_eq!(parsed.columns.len(), snapshot.columns.len());
    }

    #[test]
    fn writer_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grids/run.json");
        let config = MapConfig {
            seed: 8,
            ..MapConfig::default()
        };
        let (world, _) = GeneratorBuilder::standard(config).build().run().unwrap();
        let written = SnapshotWriter::write(&world, &path).unwrap();
        assert!(written.exists());
        let data = fs::read_to_string(written).unwrap();
        assert!(data.contains("\"columns\""));
    }
}
