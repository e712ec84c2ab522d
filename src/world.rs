//! The grid world: a flat arena of columns plus the global counters every
//! pass reads and increments.

use std::collections::{BTreeSet, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Palette;
use crate::column::Column;
use crate::config::MapConfig;
use crate::rng::RngExt;
use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// How block height evolves across growth iterations. Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightVariation {
    /// Tall seed block, later blocks step down.
    TallCenter,
    /// Short seed block, later blocks grow taller.
    TallSurrounds,
    /// Random walk under a Fibonacci ceiling.
    Random,
}

impl HeightVariation {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        match rng.draw(3) {
            0 => HeightVariation::TallCenter,
            1 => HeightVariation::TallSurrounds,
            _ => HeightVariation::Random,
        }
    }
}

/// Internal invariant violations. These indicate a bug in a pass, never bad
/// input, and abort the run with coordinates for diagnosis.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("tile at ({x}, {y}) stack index {index} records height index {recorded}")]
    StackPositionMismatch {
        x: u32,
        y: u32,
        index: u8,
        recorded: u8,
    },
    #[error("tile at ({x}, {y}, {h}) records position ({tile_x}, {tile_y})")]
    TilePositionMismatch {
        x: u32,
        y: u32,
        h: u8,
        tile_x: u32,
        tile_y: u32,
    },
    #[error("duplicate tile id {id} at ({x}, {y})")]
    DuplicateTileId { id: u64, x: u32, y: u32 },
    #[error("tile id {id} at ({x}, {y}) was never allocated (counter at {counter})")]
    UnallocatedTileId { id: u64, x: u32, y: u32, counter: u64 },
    #[error("defined column at ({x}, {y}) carries unregistered block group {group}")]
    UnregisteredGroup { x: u32, y: u32, group: u32 },
}

#[derive(Debug)]
pub struct GridWorld {
    config: MapConfig,
    columns: Vec<Column>,
    /// Tile id source; strictly increasing, never reused.
    next_tile_id: u64,
    /// Growth-step counter, bounded by `max_block_iterations`.
    block_iterations: u32,
    block_groups: BTreeSet<u32>,
    /// Candidate attachment points, recomputed each growth iteration.
    pub block_edges: Vec<GridPos>,
    /// Current block height; the growth strategies walk it up and down.
    pub block_height: u8,
    /// Footprint of the most recently placed block, for golden-ratio sizing.
    pub last_block_size: (u32, u32),
    /// Set when growth ran out of attachment candidates, with the iteration
    /// it stopped at. Not an error.
    pub growth_exhausted: Option<u32>,
    height_variation: HeightVariation,
    palette: Palette,
    /// Stack index painted with the palette accent color.
    line_height: u8,
}

impl GridWorld {
    /// Build an empty grid; strategy and palette are drawn up front so the
    /// whole run is pinned by the injected stream.
    pub fn new<R: Rng>(config: &MapConfig, rng: &mut R) -> Self {
        let mut columns = Vec::with_capacity((config.map_width * config.map_length) as usize);
        for y in 0..config.map_length {
            for x in 0..config.map_width {
                columns.push(Column::undefined(x, y));
            }
        }
        let height_variation = HeightVariation::sample(rng);
        let palette = Palette::sample(rng);
        let line_height = 1 + rng.draw(2) as u8;
        Self {
            config: config.clone(),
            columns,
            next_tile_id: 0,
            block_iterations: 0,
            block_groups: BTreeSet::new(),
            block_edges: Vec::new(),
            block_height: config.block_height,
            last_block_size: (config.average_building_size, config.average_building_size),
            growth_exhausted: None,
            height_variation,
            palette,
            line_height,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn map_width(&self) -> u32 {
        self.config.map_width
    }

    pub fn map_length(&self) -> u32 {
        self.config.map_length
    }

    pub fn height_variation(&self) -> HeightVariation {
        self.height_variation
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn line_height(&self) -> u8 {
        self.line_height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.config.map_width && y < self.config.map_length);
        (y * self.config.map_width + x) as usize
    }

    pub fn column(&self, x: u32, y: u32) -> &Column {
        &self.columns[self.index(x, y)]
    }

    pub fn column_mut(&mut self, x: u32, y: u32) -> &mut Column {
        let idx = self.index(x, y);
        &mut self.columns[idx]
    }

    /// Replace the column at its own coordinates wholesale.
    pub fn set_column(&mut self, column: Column) {
        let idx = self.index(column.x(), column.y());
        self.columns[idx] = column;
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn columns_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        self.columns.iter_mut()
    }

    pub fn tile(&self, x: u32, y: u32, h: u8) -> Option<&Tile> {
        self.column(x, y).tile(h)
    }

    pub fn top_tile(&self, x: u32, y: u32) -> Option<&Tile> {
        self.column(x, y).top_tile()
    }

    /// Scan order matches the original: row-major from the origin.
    pub fn first_defined_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_defined())
    }

    pub fn highest_point(&self) -> u8 {
        self.columns.iter().map(|c| c.height()).max().unwrap_or(0)
    }

    pub fn defined_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_defined()).count()
    }

    pub fn next_tile_id(&mut self) -> u64 {
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        id
    }

    pub fn tile_id_watermark(&self) -> u64 {
        self.next_tile_id
    }

    pub fn block_groups(&self) -> &BTreeSet<u32> {
        &self.block_groups
    }

    pub fn register_group(&mut self, group: u32) {
        self.block_groups.insert(group);
    }

    /// Next unused group id; ids grow monotonically and are never reused.
    pub fn allocate_group(&mut self) -> u32 {
        let group = self.block_groups.iter().next_back().copied().unwrap_or(0) + 1;
        self.block_groups.insert(group);
        group
    }

    pub fn block_iterations(&self) -> u32 {
        self.block_iterations
    }

    pub fn bump_block_iterations(&mut self) {
        self.block_iterations += 1;
    }

    /// Clamp a derived span to grid bounds on one axis. Out-of-range
    /// footprints are clamped, never wrapped or rejected.
    pub fn clamp_span(start: i64, size: u32, dim: u32) -> (u32, u32) {
        let end = (start + size as i64).clamp(0, dim as i64) as u32;
        let start = start.clamp(0, dim as i64) as u32;
        (start, end)
    }

    /// Defensive check run after the pipeline: a failure here is a bug in a
    /// pass, and the run aborts rather than hand out a corrupt grid.
    pub fn check_invariants(&self) -> Result<(), WorldError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            let (x, y) = (column.x(), column.y());
            if column.is_defined() && !self.block_groups.contains(&column.block_group) {
                return Err(WorldError::UnregisteredGroup {
                    x,
                    y,
                    group: column.block_group,
                });
            }
            for (index, tile) in column.tiles().iter().enumerate() {
                if tile.h() as usize != index {
                    return Err(WorldError::StackPositionMismatch {
                        x,
                        y,
                        index: index as u8,
                        recorded: tile.h(),
                    });
                }
                if tile.x() != x || tile.y() != y {
                    return Err(WorldError::TilePositionMismatch {
                        x,
                        y,
                        h: tile.h(),
                        tile_x: tile.x(),
                        tile_y: tile.y(),
                    });
                }
                if tile.id() >= self.next_tile_id {
                    return Err(WorldError::UnallocatedTileId {
                        id: tile.id(),
                        x,
                        y,
                        counter: self.next_tile_id,
                    });
                }
                if !seen.insert(tile.id()) {
                    return Err(WorldError::DuplicateTileId {
                        id: tile.id(),
                        x,
                        y,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::rng::RngManager;
    use crate::tile::{TileKind, TileOptions};

    fn world() -> GridWorld {
        let mut manager = RngManager::new(11);
        GridWorld::new(&MapConfig::default(), &mut manager.stream("world"))
    }

    fn body_tile(world: &mut GridWorld, x: u32, y: u32, h: u8) -> Tile {
        let id = world.next_tile_id();
        Tile::new(
            id,
            x,
            y,
            h,
            TileKind::Body,
            Color::new(9, 9, 9),
            TileOptions::default(),
        )
    }

    #[test]
    fn new_world_is_empty() {
        let world = world();
        assert_eq!(world.defined_count(), 0);
        assert_eq!(world.highest_point(), 0);
        assert!(world.first_defined_column().is_none());
        assert!(world.block_groups().is_empty());
        assert!(world.check_invariants().is_ok());
    }

    #[test]
    fn set_column_replaces_wholesale() {
        let mut world = world();
        let tiles = vec![body_tile(&mut world, 4, 6, 0), body_tile(&mut world, 4, 6, 1)];
        world.register_group(1);
        world.set_column(Column::with_stack(4, 6, 1, tiles));

        assert_eq!(world.column(4, 6).height(), 2);
        assert_eq!(world.top_tile(4, 6).unwrap().h(), 1);
        assert_eq!(world.first_defined_column().unwrap().x(), 4);
        assert!(world.check_invariants().is_ok());
    }

    #[test]
    fn group_ids_are_monotonic() {
        let mut world = world();
        assert_eq!(world.allocate_group(), 1);
        assert_eq!(world.allocate_group(), 2);
        world.register_group(10);
        assert_eq!(world.allocate_group(), 11);
    }

    #[test]
    fn clamp_span_truncates_at_bounds() {
        assert_eq!(GridWorld::clamp_span(-3, 7, 25), (0, 4));
        assert_eq!(GridWorld::clamp_span(22, 7, 25), (22, 25));
        assert_eq!(GridWorld::clamp_span(5, 7, 25), (5, 12));
    }

    #[test]
    fn invariant_check_catches_stack_mismatch() {
        let mut world = world();
        // tile claims height index 5 while sitting at stack index 0
        let id = world.next_tile_id();
        let bad = Tile::new(
            id,
            3,
            3,
            5,
            TileKind::Body,
            Color::new(0, 0, 0),
            TileOptions::default(),
        );
        world.register_group(1);
        world.set_column(Column::with_stack(3, 3, 1, vec![bad]));
        assert!(matches!(
            world.check_invariants(),
            Err(WorldError::StackPositionMismatch { x: 3, y: 3, .. })
        ));
    }

    #[test]
    fn invariant_check_catches_duplicate_ids() {
        let mut world = world();
        let tile = body_tile(&mut world, 2, 2, 0);
        world.register_group(1);
        world.set_column(Column::with_stack(2, 2, 1, vec![tile.clone()]));
        // same id smuggled into a second column
        let dup = Tile::new(
            tile.id(),
            3,
            2,
            0,
            TileKind::Body,
            Color::new(0, 0, 0),
            TileOptions::default(),
        );
        world.set_column(Column::with_stack(3, 2, 1, vec![dup]));
        assert!(matches!(
            world.check_invariants(),
            Err(WorldError::DuplicateTileId { .. })
        ));
    }

    #[test]
    fn invariant_check_catches_unregistered_group() {
        let mut world = world();
        let tile = body_tile(&mut world, 1, 1, 0);
        world.set_column(Column::with_stack(1, 1, 7, vec![tile]));
        assert!(matches!(
            world.check_invariants(),
            Err(WorldError::UnregisteredGroup { group: 7, .. })
        ));
    }
}
