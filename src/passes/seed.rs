//! Step 0: place the rectangular seed footprint near the grid center.

use anyhow::Result;

use super::{Pass, GOLDEN_RATIO};
use crate::column::Column;
use crate::rng::{RngExt, SystemRng};
use crate::tile::{Tile, TileKind, TileOptions};
use crate::topology::{self, EdgeMode};
use crate::world::{GridWorld, HeightVariation};

pub struct SeedPass;

impl SeedPass {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SeedPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for SeedPass {
    fn name(&self) -> &'static str {
        "seed"
    }

    fn run(&mut self, world: &mut GridWorld, rng: &mut SystemRng<'_>) -> Result<()> {
        let average = world.config().average_building_size;
        let map_width = world.map_width();
        let map_length = world.map_length();
        let length_half = map_length / 2;

        let block_width = average + rng.draw(5);
        let block_length = ((block_width as f32) * GOLDEN_RATIO).round() as u32;
        // the footprint sits slightly west of center
        let center_deviation = 6 + rng.draw(6);
        let start_x = (map_width / 2) as i64 - (center_deviation / 2) as i64;

        let height = match world.height_variation() {
            HeightVariation::TallCenter => world
                .block_height
                .saturating_mul(2)
                .min(world.config().map_max_height),
            HeightVariation::TallSurrounds => {
                let short = 1 + rng.draw(2) as u8;
                world.block_height = short;
                short
            }
            HeightVariation::Random => world.block_height,
        };

        let (x0, x1) = GridWorld::clamp_span(start_x + 1, block_width, map_width);
        // only the lower half of the footprint is seeded; the mirror pass
        // reflects it across the center line
        let (y0, y1) = GridWorld::clamp_span(length_half as i64, block_length / 2 + 1, map_length);

        let group = world.allocate_group();
        let base = world.palette().base;
        let line = world.palette().line;
        let line_height = world.line_height();

        for y in y0..y1 {
            for x in x0..x1 {
                let mut stack = Vec::with_capacity(height as usize);
                for h in 0..height {
                    let id = world.next_tile_id();
                    let color = if h == line_height { line } else { base };
                    let options = TileOptions {
                        roof: h == height - 1,
                        ..TileOptions::default()
                    };
                    stack.push(Tile::new(id, x, y, h, TileKind::Body, color, options));
                }
                world.set_column(Column::with_stack(x, y, group, stack));
            }
        }

        world.last_block_size = (x1.saturating_sub(x0), y1.saturating_sub(y0));
        topology::set_edges(world, EdgeMode::Shape);
        Ok(())
    }
}
