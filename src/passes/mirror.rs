//! Bilateral symmetry and boundary cleanup.

use anyhow::Result;

use super::Pass;
use crate::column::Column;
use crate::rng::SystemRng;
use crate::tile::Tile;
use crate::world::GridWorld;

/// Reflect the second half of the grid onto the first. Every copied tile
/// gets a fresh id, every copied column a group id disjoint from all
/// pre-mirror ids, so mirrored halves never merge with their originals in
/// group-based operations.
pub struct MirrorPass;

impl MirrorPass {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MirrorPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for MirrorPass {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn run(&mut self, world: &mut GridWorld, _rng: &mut SystemRng<'_>) -> Result<()> {
        let length = world.map_length();
        let width = world.map_width();
        let half = length / 2;
        // every mirrored group lands beyond the highest existing id
        let group_offset = world.block_groups().iter().next_back().copied().unwrap_or(0);

        for y in 0..half {
            let source_y = length - 1 - y;
            for x in 0..width {
                let source = world.column(x, source_y);
                if !source.is_defined() {
                    if world.column(x, y).is_defined() {
                        world.set_column(Column::undefined(x, y));
                    }
                    continue;
                }

                let group = source.block_group + group_offset;
                let height = source.height();
                let mut templates = Vec::with_capacity(height as usize);
                for tile in source.tiles() {
                    templates.push((tile.kind, tile.color, tile.options.clone()));
                }

                let mut stack = Vec::with_capacity(height as usize);
                for (h, (kind, color, options)) in templates.into_iter().enumerate() {
                    let id = world.next_tile_id();
                    stack.push(Tile::new(id, x, y, h as u8, kind, color, options));
                }
                world.register_group(group);
                world.set_column(Column::with_stack(x, y, group, stack));
            }
        }
        Ok(())
    }
}

/// Reset every column within the boundary ring, skipping cells that are
/// already undefined.
pub struct ClearEdgesPass;

impl ClearEdgesPass {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClearEdgesPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for ClearEdgesPass {
    fn name(&self) -> &'static str {
        "clear-edges"
    }

    fn run(&mut self, world: &mut GridWorld, _rng: &mut SystemRng<'_>) -> Result<()> {
        let ring = world.config().map_edge_width;
        let width = world.map_width();
        let length = world.map_length();
        for y in 0..length {
            for x in 0..width {
                let in_ring =
                    x < ring || x >= width - ring || y < ring || y >= length - ring;
                if in_ring && world.column(x, y).is_defined() {
                    world.set_column(Column::undefined(x, y));
                }
            }
        }
        Ok(())
    }
}
