//! Steps 1..N: attach new blocks at detected edges until the iteration
//! budget runs out or the shape leaves no room to grow.

use anyhow::Result;
use rand::Rng;

use super::{Pass, GOLDEN_RATIO};
use crate::column::Column;
use crate::rng::{RngExt, SystemRng};
use crate::tile::{Slope, Tile, TileKind, TileOptions};
use crate::topology::{self, EdgeMode};
use crate::world::{GridWorld, HeightVariation};

/// Additional ceiling on block heights under the Random strategy, indexed
/// by the growth-step counter.
const FIB_CEILING: [i32; 7] = [2, 3, 5, 8, 13, 21, 34];

/// Blocks taller than this may receive an open corridor floor.
const CORRIDOR_MIN_HEIGHT: u8 = 5;
/// Void band carved by a corridor, inclusive stack indices.
const CORRIDOR_BAND: (u8, u8) = (1, 2);
/// Corner towers rise this far above their block.
const TOWER_BONUS: u8 = 3;

pub struct GrowthPass;

impl GrowthPass {
    pub fn new() -> Self {
        Self
    }

    /// Height for the next block under the active variation strategy.
    fn next_height(world: &GridWorld, rng: &mut SystemRng<'_>) -> u8 {
        let current = world.block_height as i32;
        let iteration = world.block_iterations() as i32;
        let raw = match world.height_variation() {
            HeightVariation::TallCenter => current - iteration,
            HeightVariation::TallSurrounds => current + iteration * rng.gen_range(1..=2),
            HeightVariation::Random => {
                let delta = rng.gen_range(1..=4);
                let shrink = rng.draw(2) == 0 && current > 3;
                let walked = if shrink { current - delta } else { current + delta };
                let ceiling = FIB_CEILING[(iteration as usize).min(FIB_CEILING.len() - 1)];
                walked.min(ceiling)
            }
        };
        if raw < 2 {
            1
        } else {
            raw.min(world.config().map_max_height as i32) as u8
        }
    }

    /// Footprint sides derive from the shortest side of the previous block
    /// shrunk by the golden ratio, with a small jitter.
    fn next_side(world: &GridWorld, rng: &mut SystemRng<'_>) -> u32 {
        let (w, l) = world.last_block_size;
        let base = (w.min(l).max(2) as f32 / GOLDEN_RATIO).round() as u32;
        (base + rng.draw(3)).max(2)
    }

    fn attach_block(world: &mut GridWorld, rng: &mut SystemRng<'_>) {
        let point = world.block_edges[rng.draw(world.block_edges.len() as u32) as usize];

        let block_width = Self::next_side(world, rng);
        let block_length = Self::next_side(world, rng);
        let height = Self::next_height(world, rng);
        let y_start_offset = 1 + rng.draw(2);

        let (x0, x1) = GridWorld::clamp_span(
            point.x as i64 - (block_width / 2) as i64,
            block_width,
            world.map_width(),
        );
        let (y0, y1) = GridWorld::clamp_span(
            point.y as i64 - y_start_offset as i64,
            block_length,
            world.map_length(),
        );
        if x0 >= x1 || y0 >= y1 {
            // footprint clamped away entirely; the iteration still counts
            return;
        }

        let hollow = block_width > 4 && block_length > 4 && rng.chance(0.5);
        let corridor = height > CORRIDOR_MIN_HEIGHT && rng.chance(0.5);
        let tower = rng.chance(0.25);
        let slope = if rng.chance(0.25) {
            match rng.draw(4) {
                0 => Slope::North,
                1 => Slope::South,
                2 => Slope::East,
                _ => Slope::West,
            }
        } else {
            Slope::Flat
        };

        let group = world.allocate_group();
        let base = world.palette().base;
        let line = world.palette().line;
        let line_height = world.line_height();

        // column heights and void cells first, tiles after
        let mut footprint: Vec<(u32, u32)> = Vec::new();
        for y in y0..y1 {
            for x in x0..x1 {
                if hollow && x >= x0 + 2 && x + 3 <= x1 && y >= y0 + 2 && y + 3 <= y1 {
                    continue;
                }
                footprint.push((x, y));
            }
        }

        let tower_corner = if tower {
            let corners = [(x0, y0), (x1 - 1, y0), (x0, y1 - 1), (x1 - 1, y1 - 1)];
            Some(corners[rng.draw(4) as usize])
        } else {
            None
        };

        for &(x, y) in &footprint {
            let is_tower = tower_corner == Some((x, y));
            let column_height = if is_tower {
                height.saturating_add(TOWER_BONUS)
            } else {
                height
            };
            let is_pillar_column = corridor && (x - x0) % 3 == 0;
            let on_outline = x == x0 || x + 1 == x1 || y == y0 || y + 1 == y1;

            let mut stack = Vec::with_capacity(column_height as usize);
            for h in 0..column_height {
                let id = world.next_tile_id();
                let in_band = corridor && h >= CORRIDOR_BAND.0 && h <= CORRIDOR_BAND.1;
                let carved = in_band && !is_pillar_column && !is_tower;

                let kind = if carved { TileKind::None } else { TileKind::Body };
                let color = if h == line_height { line } else { base };
                let roof = h == column_height - 1;
                let mut options = TileOptions {
                    roof,
                    pillar: in_band && is_pillar_column,
                    tower: is_tower,
                    ..TileOptions::default()
                };
                if roof {
                    options.slope = slope;
                } else if h > 0 && !carved {
                    options.windowed = rng.draw(3) as u8;
                }
                if h == 0 && on_outline && rng.chance(0.05) {
                    options.stairs = true;
                }
                if corridor && h == CORRIDOR_BAND.1 + 1 && !is_pillar_column && !is_tower {
                    options.half_arch = true;
                    // a whole arch spans when both lateral band neighbors
                    // are carved as well
                    let left_open = x > x0 && (x - 1 - x0) % 3 != 0;
                    let right_open = x + 1 < x1 && (x + 1 - x0) % 3 != 0;
                    options.whole_arch = left_open && right_open;
                }
                stack.push(Tile::new(id, x, y, h, kind, color, options));
            }
            world.set_column(Column::with_stack(x, y, group, stack));
        }

        world.last_block_size = (x1 - x0, y1 - y0);
        world.block_height = height;
    }

    /// Roof step-down cue: a column strictly shorter than its northern
    /// neighbor from a different group gets a HalfBlock top tile.
    fn step_down_roofs(world: &mut GridWorld) {
        let width = world.map_width();
        let length = world.map_length();
        for y in 1..length {
            for x in 0..width {
                let column = world.column(x, y);
                let north = world.column(x, y - 1);
                if !column.is_defined() || !north.is_defined() {
                    continue;
                }
                if column.block_group != north.block_group && column.height() < north.height() {
                    if let Some(top) = world.column_mut(x, y).top_tile_mut() {
                        top.kind = TileKind::HalfBlock;
                    }
                }
            }
        }
    }
}

impl Default for GrowthPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for GrowthPass {
    fn name(&self) -> &'static str {
        "growth"
    }

    fn run(&mut self, world: &mut GridWorld, rng: &mut SystemRng<'_>) -> Result<()> {
        while world.block_iterations() < world.config().max_block_iterations {
            world.block_edges =
                topology::collect_edge_points(world, topology::growth_rows(world), EdgeMode::Shape);
            if world.block_edges.is_empty() {
                // no more room: normal early termination, not an error
                world.growth_exhausted = Some(world.block_iterations());
                break;
            }
            Self::attach_block(world, rng);
            world.bump_block_iterations();
        }

        Self::step_down_roofs(world);
        topology::set_edges(world, EdgeMode::Shape);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::MapConfig;
    use crate::passes::SeedPass;
    use crate::rng::RngManager;

    fn grown_world(seed: u64, config: &MapConfig) -> (GridWorld, RngManager) {
        let mut manager = RngManager::new(seed);
        let mut world = GridWorld::new(config, &mut manager.stream("world"));
        SeedPass::new()
            .run(&mut world, &mut manager.stream("seed"))
            .unwrap();
        GrowthPass::new()
            .run(&mut world, &mut manager.stream("growth"))
            .unwrap();
        (world, manager)
    }

    #[test]
    fn growth_respects_iteration_budget() {
        for max in [0, 1, 3, 6] {
            let config = MapConfig {
                max_block_iterations: max,
                ..MapConfig::default()
            };
            let (world, _) = grown_world(17, &config);
            assert!(world.block_iterations() <= max);
            assert!(world.check_invariants().is_ok());
        }
    }

    #[test]
    fn zero_iterations_keeps_only_the_seed_group() {
        let config = MapConfig {
            max_block_iterations: 0,
            ..MapConfig::default()
        };
        let (world, _) = grown_world(23, &config);
        assert_eq!(world.block_groups().len(), 1);
        assert!(world.defined_count() > 0);
    }

    #[test]
    fn growth_adds_groups_beyond_the_seed() {
        let config = MapConfig {
            map_width: 30,
            map_length: 30,
            max_block_iterations: 4,
            ..MapConfig::default()
        };
        let (world, _) = grown_world(41, &config);
        assert!(
            world.block_groups().len() > 1,
            "expected extension groups, got {:?}",
            world.block_groups()
        );
    }

    #[test]
    fn heights_stay_within_the_ceiling() {
        for seed in 0..20 {
            let config = MapConfig {
                map_max_height: 6,
                max_block_iterations: 8,
                ..MapConfig::default()
            };
            let (world, _) = grown_world(seed, &config);
            for column in world.columns() {
                // towers may rise above the block ceiling by their bonus
                assert!(column.height() <= 6 + TOWER_BONUS);
            }
        }
    }

    #[test]
    fn towers_at_the_stack_ceiling_saturate() {
        // blocks already at the u8 ceiling leave no headroom for a tower
        let config = MapConfig {
            map_max_height: u8::MAX,
            block_height: u8::MAX,
            max_block_iterations: 5,
            ..MapConfig::default()
        };
        for seed in 0..60 {
            let (world, _) = grown_world(seed, &config);
            assert!(world.check_invariants().is_ok());
            assert!(world.defined_count() > 0);
        }
    }

    #[test]
    fn tile_ids_are_strictly_increasing_in_allocation_order() {
        let (world, _) = grown_world(7, &MapConfig::default());
        let mut ids: Vec<u64> = world
            .columns()
            .flat_map(|c| c.tiles().iter().map(|t| t.id()))
            .collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count, "duplicate tile ids");
        assert!(ids.iter().all(|&id| id < world.tile_id_watermark()));
    }

    #[test]
    fn step_down_marks_shorter_neighbors() {
        let mut manager = RngManager::new(1);
        let mut world = GridWorld::new(&MapConfig::default(), &mut manager.stream("world"));
        // two adjacent columns from different groups, south one shorter
        for (y, group, height) in [(10u32, 1u32, 4u8), (11, 2, 2)] {
            let mut stack = Vec::new();
            for h in 0..height {
                let id = world.next_tile_id();
                stack.push(Tile::new(
                    id,
                    5,
                    y,
                    h,
                    TileKind::Body,
                    Color::new(0, 0, 0),
                    TileOptions::default(),
                ));
            }
            world.register_group(group);
            world.set_column(Column::with_stack(5, y, group, stack));
        }
        GrowthPass::step_down_roofs(&mut world);
        assert_eq!(world.top_tile(5, 11).unwrap().kind, TileKind::HalfBlock);
        assert_eq!(world.top_tile(5, 10).unwrap().kind, TileKind::Body);
    }

    #[test]
    fn corridor_bands_keep_pillars_and_mark_arches() {
        // force tall blocks so corridors can appear, then look for one
        let mut found_corridor = false;
        for seed in 0..40 {
            let config = MapConfig {
                block_height: 8,
                map_max_height: 12,
                max_block_iterations: 5,
                ..MapConfig::default()
            };
            let (world, _) = grown_world(seed, &config);
            for column in world.columns().filter(|c| c.is_defined()) {
                for tile in column.tiles() {
                    if tile.options.half_arch {
                        found_corridor = true;
                        // the tile right below an arch marker is carved
                        let below = column.tile(tile.h() - 1).unwrap();
                        assert_eq!(below.kind, TileKind::None);
                    }
                    if tile.options.pillar {
                        assert_eq!(tile.kind, TileKind::Body);
                    }
                }
            }
            if found_corridor {
                break;
            }
        }
        assert!(found_corridor, "no corridor generated across 40 seeds");
    }
}
