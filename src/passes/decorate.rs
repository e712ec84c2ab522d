//! Decorative infill: terrain strips in the open margins, seam fill along
//! the building outline, and scattered trees.

use anyhow::Result;

use super::Pass;
use crate::column::Column;
use crate::rng::{RngExt, SystemRng};
use crate::tile::{Tile, TileKind, TileOptions};
use crate::topology::{self, EdgeMode};
use crate::world::GridWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TerrainTheme {
    Grass,
    Water,
}

/// Margin beyond the boundary ring a side must offer before it gets a
/// terrain strip.
const STRIP_MARGIN: u32 = 4;

pub struct DecoratePass;

impl DecoratePass {
    pub fn new() -> Self {
        Self
    }

    /// Cool base hues read as waterside; a random override keeps the other
    /// theme reachable either way.
    fn choose_theme(world: &GridWorld, rng: &mut SystemRng<'_>) -> TerrainTheme {
        let mut theme = if world.palette().is_cool() {
            TerrainTheme::Water
        } else {
            TerrainTheme::Grass
        };
        if rng.chance(0.25) {
            theme = match theme {
                TerrainTheme::Grass => TerrainTheme::Water,
                TerrainTheme::Water => TerrainTheme::Grass,
            };
        }
        theme
    }

    fn place_terrain_tile(world: &mut GridWorld, x: u32, y: u32, kind: TileKind, group: u32) {
        let color = match kind {
            TileKind::HalfBlock => world.palette().water,
            TileKind::Grass => world.palette().grass,
            _ => world.palette().ground,
        };
        let id = world.next_tile_id();
        let tile = Tile::new(id, x, y, 0, kind, color, TileOptions::default());
        world.set_column(Column::with_stack(x, y, group, vec![tile]));
    }

    fn place_sand_tile(world: &mut GridWorld, x: u32, y: u32, group: u32) {
        let color = world.palette().sand;
        let id = world.next_tile_id();
        let tile = Tile::new(id, x, y, 0, TileKind::Grass, color, TileOptions::default());
        world.set_column(Column::with_stack(x, y, group, vec![tile]));
    }

    /// Fill a bounded strip along a side whose open margin exceeds the
    /// threshold. Water strips end in a half-block edge facing the
    /// building; grass strips end in a sand border.
    fn terrain_strips(world: &mut GridWorld, theme: TerrainTheme) {
        let (left, right) = topology::least_open_space_on_x(world);
        let ring = world.config().map_edge_width;
        let width = world.map_width();
        let length = world.map_length();
        let threshold = ring + STRIP_MARGIN;

        let mut sides: Vec<(u32, u32, u32)> = Vec::new(); // (x0, x1, border_x)
        if left > threshold {
            // leave a one-cell gap toward the building
            let x1 = left - 1;
            sides.push((ring, x1, x1 - 1));
        }
        if right > threshold {
            let x0 = width - right + 1;
            sides.push((x0, width - ring, x0));
        }

        for (x0, x1, border_x) in sides {
            let group = world.allocate_group();
            for y in ring..length - ring {
                for x in x0..x1 {
                    if world.column(x, y).is_defined() {
                        continue;
                    }
                    if x == border_x {
                        match theme {
                            TerrainTheme::Grass => Self::place_sand_tile(world, x, y, group),
                            TerrainTheme::Water => {
                                Self::place_terrain_tile(world, x, y, TileKind::HalfBlock, group)
                            }
                        }
                    } else {
                        Self::place_terrain_tile(world, x, y, TileKind::Grass, group);
                    }
                }
            }
        }
    }

    /// Soften bare seams: every undefined cell adjacent to a building edge
    /// gets a shadow or grass filler tile.
    fn seam_fill(
        world: &mut GridWorld,
        rng: &mut SystemRng<'_>,
        edges: &[(u32, u32, crate::column::EdgeFlags)],
    ) {
        let ring = world.config().map_edge_width;
        let width = world.map_width();
        let length = world.map_length();
        let mut group = None;

        for &(x, y, flags) in edges {
            let neighbors = [
                (flags.top, x as i64, y as i64 - 1),
                (flags.bottom, x as i64, y as i64 + 1),
                (flags.left, x as i64 - 1, y as i64),
                (flags.right, x as i64 + 1, y as i64),
            ];
            for (flagged, nx, ny) in neighbors {
                if !flagged || nx < 0 || ny < 0 {
                    continue;
                }
                let (nx, ny) = (nx as u32, ny as u32);
                if nx < ring || nx >= width - ring || ny < ring || ny >= length - ring {
                    continue;
                }
                if world.column(nx, ny).is_defined() {
                    continue;
                }
                let group = *group.get_or_insert_with(|| world.allocate_group());
                let (kind, color) = if rng.chance(0.5) {
                    (TileKind::Shadow, world.palette().ground.adjust_lighting(-60))
                } else {
                    (TileKind::Grass, world.palette().grass)
                };
                let id = world.next_tile_id();
                let tile = Tile::new(id, nx, ny, 0, kind, color, TileOptions::default());
                world.set_column(Column::with_stack(nx, ny, group, vec![tile]));
            }
        }
    }

    /// Scatter a bounded number of isolated tree decorations, capped per
    /// row, never in the outer two rows/columns.
    fn scatter_trees(world: &mut GridWorld, rng: &mut SystemRng<'_>) {
        let width = world.map_width();
        let length = world.map_length();
        let ring = world.config().map_edge_width;

        let amount = rng.draw(6);
        let mut row_draws = Vec::with_capacity(amount as usize);
        for _ in 0..amount {
            row_draws.push(5 + rng.draw(length.saturating_sub(5)));
        }

        let mut used_columns: Vec<u32> = Vec::new();
        let mut group = None;

        for y in 2..length.saturating_sub(2) {
            let row_cap = row_draws.iter().filter(|&&v| v == y).count();
            let mut placed_in_row = 0;

            for x in 3..width.saturating_sub(3) {
                if placed_in_row >= row_cap {
                    break;
                }
                if x < ring || x >= width - ring || y < ring || y >= length - ring {
                    continue;
                }
                let isolated = !world.column(x, y).is_defined()
                    && !world.column(x, y - 1).is_defined()
                    && !world.column(x, y + 1).is_defined()
                    && !world.column(x - 1, y).is_defined()
                    && !world.column(x + 1, y).is_defined()
                    && !world.column(x - 2, y).is_defined()
                    && !world.column(x + 2, y).is_defined();
                if !isolated || used_columns.contains(&x) {
                    continue;
                }
                if rng.draw(200) <= 160 {
                    continue;
                }

                let group = *group.get_or_insert_with(|| world.allocate_group());
                let id = world.next_tile_id();
                let options = TileOptions {
                    area_decoration: "tree".to_string(),
                    ..TileOptions::default()
                };
                let color = world.palette().ground;
                let tile = Tile::new(id, x, y, 0, TileKind::None, color, options);
                world.set_column(Column::with_stack(x, y, group, vec![tile]));
                used_columns.push(x);
                placed_in_row += 1;
            }
        }
    }
}

impl Default for DecoratePass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for DecoratePass {
    fn name(&self) -> &'static str {
        "decorate"
    }

    fn run(&mut self, world: &mut GridWorld, rng: &mut SystemRng<'_>) -> Result<()> {
        topology::set_edges(world, EdgeMode::Shape);
        // snapshot the building outline before filler columns blur it
        let edges: Vec<(u32, u32, crate::column::EdgeFlags)> = world
            .columns()
            .filter(|c| c.is_defined() && c.edge.any())
            .map(|c| (c.x(), c.y(), c.edge))
            .collect();

        let theme = Self::choose_theme(world, rng);
        Self::terrain_strips(world, theme);
        Self::seam_fill(world, rng, &edges);
        Self::scatter_trees(world, rng);
        Ok(())
    }
}
