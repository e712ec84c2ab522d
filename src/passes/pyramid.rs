//! Alternate generation mode: stamp the fixed pyramid height field.

use anyhow::Result;

use super::Pass;
use crate::column::Column;
use crate::primitives;
use crate::rng::SystemRng;
use crate::tile::{Tile, TileKind, TileOptions};
use crate::topology::{self, EdgeMode};
use crate::world::GridWorld;

pub struct PyramidPass;

impl PyramidPass {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PyramidPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for PyramidPass {
    fn name(&self) -> &'static str {
        "pyramid"
    }

    fn run(&mut self, world: &mut GridWorld, _rng: &mut SystemRng<'_>) -> Result<()> {
        let heights = primitives::pyramid(world.map_width(), world.map_length());
        let max = world.config().map_max_height;
        let group = world.allocate_group();
        let base = world.palette().base;

        for (y, row) in heights.iter().enumerate() {
            for (x, &level) in row.iter().enumerate() {
                let height = (level as u8).min(max);
                if height == 0 {
                    continue;
                }
                let (x, y) = (x as u32, y as u32);
                let mut stack = Vec::with_capacity(height as usize);
                for h in 0..height {
                    let id = world.next_tile_id();
                    let options = TileOptions {
                        roof: h == height - 1,
                        ..TileOptions::default()
                    };
                    stack.push(Tile::new(id, x, y, h, TileKind::Body, base, options));
                }
                world.set_column(Column::with_stack(x, y, group, stack));
            }
        }

        // relief outlines come from height steps, not footprint shape
        topology::set_edges(world, EdgeMode::Height);
        Ok(())
    }
}
