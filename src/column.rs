//! Columns: one grid cell's vertical stack of tiles.
//!
//! Columns are replaced wholesale when their shape changes; the passes
//! never splice individual tiles into an existing stack.

use serde::{Deserialize, Serialize};

use crate::tile::Tile;

/// Derived topology flags, valid only after a classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlags {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl EdgeFlags {
    pub fn any(&self) -> bool {
        self.top || self.right || self.bottom || self.left
    }

    /// Two perpendicular edges meeting make a corner.
    pub fn is_corner(&self) -> bool {
        (self.top || self.bottom) && (self.left || self.right)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    x: u32,
    y: u32,
    /// Block-group membership; 0 is reserved for "ungrouped".
    pub block_group: u32,
    pub corner: bool,
    pub edge: EdgeFlags,
    tile_stack: Vec<Tile>,
}

impl Column {
    /// An empty, undefined cell.
    pub fn undefined(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            block_group: 0,
            corner: false,
            edge: EdgeFlags::default(),
            tile_stack: Vec::new(),
        }
    }

    /// A defined cell carrying the given stack.
    pub fn with_stack(x: u32, y: u32, block_group: u32, tile_stack: Vec<Tile>) -> Self {
        Self {
            x,
            y,
            block_group,
            corner: false,
            edge: EdgeFlags::default(),
            tile_stack,
        }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn is_defined(&self) -> bool {
        !self.tile_stack.is_empty()
    }

    pub fn height(&self) -> u8 {
        self.tile_stack.len() as u8
    }

    pub fn tile(&self, h: u8) -> Option<&Tile> {
        self.tile_stack.get(h as usize)
    }

    pub fn top_tile(&self) -> Option<&Tile> {
        self.tile_stack.last()
    }

    pub fn top_tile_mut(&mut self) -> Option<&mut Tile> {
        self.tile_stack.last_mut()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tile_stack
    }

    /// Reset derived topology before a reclassification pass.
    pub fn clear_topology(&mut self) {
        self.edge = EdgeFlags::default();
        self.corner = false;
    }
}
