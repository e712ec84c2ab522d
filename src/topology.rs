//! Edge/corner classification and open-space measurement.
//!
//! Used twice: during growth to find attachment points, and after growth to
//! decide where decoration fits.

use std::ops::Range;

use crate::column::EdgeFlags;
use crate::world::{GridPos, GridWorld};

/// What counts as an "edge" neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// Neighbor is undefined (the footprint outline).
    Shape,
    /// Neighbor is strictly shorter (relief outlines, pyramid mode).
    Height,
}

/// Probe offsets around a candidate attachment column: the four direct
/// neighbors plus one look-ahead row, so blocks keep attaching along the
/// growth direction instead of doubling back.
const EDGE_PROBE: [(i64, i64); 5] = [(0, -1), (0, 1), (-1, 0), (1, 0), (0, 2)];

fn exposes(world: &GridWorld, from_height: u8, x: i64, y: i64, mode: EdgeMode) -> bool {
    if x < 0 || y < 0 || x >= world.map_width() as i64 || y >= world.map_length() as i64 {
        // boundary cells face outward
        return true;
    }
    let neighbor = world.column(x as u32, y as u32);
    match mode {
        EdgeMode::Shape => !neighbor.is_defined(),
        EdgeMode::Height => neighbor.height() < from_height,
    }
}

/// Recompute every column's edge and corner flags.
pub fn set_edges(world: &mut GridWorld, mode: EdgeMode) {
    let width = world.map_width();
    let length = world.map_length();
    let mut flags = vec![EdgeFlags::default(); (width * length) as usize];

    for y in 0..length {
        for x in 0..width {
            let column = world.column(x, y);
            if !column.is_defined() {
                continue;
            }
            let height = column.height();
            let entry = &mut flags[(y * width + x) as usize];
            entry.top = exposes(world, height, x as i64, y as i64 - 1, mode);
            entry.bottom = exposes(world, height, x as i64, y as i64 + 1, mode);
            entry.left = exposes(world, height, x as i64 - 1, y as i64, mode);
            entry.right = exposes(world, height, x as i64 + 1, y as i64, mode);
        }
    }

    for column in world.columns_mut() {
        let entry = flags[(column.y() * width + column.x()) as usize];
        column.clear_topology();
        if column.is_defined() {
            column.edge = entry;
            column.corner = entry.is_corner();
        }
    }
}

/// Collect growth candidates: defined columns inside `rows` with at least
/// one exposed probe cell. An empty result tells the growth engine there is
/// no more room.
pub fn collect_edge_points(world: &GridWorld, rows: Range<u32>, mode: EdgeMode) -> Vec<GridPos> {
    let mut points = Vec::new();
    for y in rows {
        if y >= world.map_length() {
            break;
        }
        for x in 0..world.map_width() {
            let column = world.column(x, y);
            if !column.is_defined() {
                continue;
            }
            let height = column.height();
            let exposed = EDGE_PROBE
                .iter()
                .any(|&(dx, dy)| exposes(world, height, x as i64 + dx, y as i64 + dy, mode));
            if exposed {
                points.push(GridPos::new(x, y));
            }
        }
    }
    points
}

/// Default candidate range: the second half of the grid, where the seed
/// block was placed and where mirroring later reads from.
pub fn growth_rows(world: &GridWorld) -> Range<u32> {
    world.map_length() / 2..world.map_length()
}

/// Smallest contiguous run of undefined cells per grid side, measured
/// inward from the left and right boundaries across all rows. Estimates how
/// much flat margin decoration can use without touching the building.
pub fn least_open_space_on_x(world: &GridWorld) -> (u32, u32) {
    let width = world.map_width();
    let half = width / 2;
    let mut least_left = half;
    let mut least_right = width - half;

    for y in 0..world.map_length() {
        let mut left = 0;
        for x in 0..half {
            if world.column(x, y).is_defined() {
                break;
            }
            left += 1;
        }
        let mut right = 0;
        for x in (half..width).rev() {
            if world.column(x, y).is_defined() {
                break;
            }
            right += 1;
        }
        least_left = least_left.min(left);
        least_right = least_right.min(right);
    }

    (least_left, least_right)
}
