//! Closed-form conversion between an isometric tile's logical dimensions
//! and straight-line pixel offsets.
//!
//! The tile is a rhombus drawn into its bounding box: the top vertex sits
//! at y = 0, the left vertex at x = 0. Both slanted sides deviate from the
//! horizontal by half the tile's small angle.

use serde::{Deserialize, Serialize};

/// Logical tile dimensions, as the renderer configures them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TileMetrics {
    pub width: f32,
    pub length: f32,
    pub height: f32,
    /// Small corner angle of the rhombus, degrees.
    pub small_angle: f32,
}

impl Default for TileMetrics {
    fn default() -> Self {
        Self {
            width: 35.0,
            length: 35.0,
            height: 20.0,
            small_angle: 80.0,
        }
    }
}

/// Pixel offsets of the four rhombus vertices relative to the bounding box
/// origin, plus the box extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsoDimensions {
    pub horizontal_width_from_top: f32,
    pub horizontal_width_from_bottom: f32,
    pub vertical_height_from_top: f32,
    pub vertical_height_from_bottom: f32,
    pub total_width: f32,
    pub total_height: f32,
}

impl IsoDimensions {
    pub fn from_metrics(metrics: &TileMetrics) -> Self {
        let theta = (metrics.small_angle / 2.0).to_radians();
        let (sin, cos) = theta.sin_cos();
        Self {
            horizontal_width_from_top: metrics.length * cos,
            horizontal_width_from_bottom: metrics.width * cos,
            vertical_height_from_top: metrics.length * sin,
            vertical_height_from_bottom: metrics.width * sin,
            total_width: (metrics.width + metrics.length) * cos,
            total_height: (metrics.width + metrics.length) * sin,
        }
    }

    /// Footprint of `count` tiles laid along the width axis.
    pub fn map_pixel_width(&self, count: u32) -> f32 {
        self.total_width * count as f32
    }
}
