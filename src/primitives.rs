//! Fixed auxiliary height maps for alternate generation modes.

/// Square pyramid height field sized to the smaller of the two grid
/// dimensions. Built from one quadrant: heights ramp up toward the center,
/// then the quadrant is mirrored into the other three.
pub fn pyramid(map_width: u32, map_length: u32) -> Vec<Vec<u32>> {
    let side = map_width.min(map_length) as usize;
    // round up so odd-sided pyramids fill their center row/column
    let half = (side + 1) / 2;
    let mut map = vec![vec![0u32; side]; side];

    for (y, row) in map.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            if y < half && x < half {
                *cell = y.min(x) as u32 + 1;
            }
        }
    }

    // mirror the built quadrant down, then right
    for y in half..side {
        for x in 0..half {
            map[y][x] = map[side - 1 - y][x];
        }
    }
    for y in 0..side {
        for x in half..side {
            map[y][x] = map[y][side - 1 - x];
        }
    }

    map
}
