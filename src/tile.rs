//! Tiles: one vertical unit of a column.

use serde::{Deserialize, Serialize};

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid building volume.
    Body,
    /// Stepped-down roof cue next to a taller neighbor, or a water edge.
    HalfBlock,
    /// Void/air kept in the stack (hollow interiors, corridor bands) or a
    /// bare decorated ground cell.
    None,
    Grass,
    Shadow,
}

/// Direction a sloped roof tile faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slope {
    #[default]
    Flat,
    North,
    South,
    East,
    West,
}

/// Renderer hints. Every flag has a defined default; flags are orthogonal
/// and may combine freely (a tower roof tile is both `tower` and `roof`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileOptions {
    pub roof: bool,
    pub pillar: bool,
    pub slope: Slope,
    pub windowed: u8,
    pub tower: bool,
    pub stairs: bool,
    pub half_arch: bool,
    pub whole_arch: bool,
    /// Free-form decoration tag, e.g. `"tree"`. Empty when unused.
    pub area_decoration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    id: u64,
    x: u32,
    y: u32,
    /// Index within the column's stack, ground level = 0.
    h: u8,
    pub kind: TileKind,
    pub color: Color,
    pub options: TileOptions,
}

impl Tile {
    pub fn new(
        id: u64,
        x: u32,
        y: u32,
        h: u8,
        kind: TileKind,
        color: Color,
        options: TileOptions,
    ) -> Self {
        Self {
            id,
            x,
            y,
            h,
            kind,
            color,
            options,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn h(&self) -> u8 {
        self.h
    }
}
