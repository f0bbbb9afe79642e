//! Hex coordinate system for the combat grid (shoved-offset layout)
//!
//! Coordinates are integer (col, row) with odd columns shoved down by half
//! a hex height. Cube form is derived on demand for distance math and is
//! the one canonical metric; pixel distance is reserved for trigger-area
//! radius checks.

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;

/// Offset hex coordinate on the combat grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub col: i32,
    pub row: i32,
}

/// Derived screen-space position (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Neighbor offsets for even columns
const EVEN_COL_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (0, 1)];

/// Neighbor offsets for odd columns (mirrored vertically by the shove)
const ODD_COL_DIRECTIONS: [(i32, i32); 6] = [(1, 1), (1, 0), (0, -1), (-1, 0), (-1, 1), (0, 1)];

impl HexCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Cube form: x = col, z = row - (col - (col & 1)) / 2, y = -x - z
    pub fn cube(&self) -> (i32, i32, i32) {
        let x = self.col;
        let z = self.row - (self.col - (self.col & 1)) / 2;
        let y = -x - z;
        (x, y, z)
    }

    /// Canonical hex distance via cube coordinates
    pub fn distance(&self, other: &Self) -> u32 {
        let (ax, ay, az) = self.cube();
        let (bx, by, bz) = other.cube();
        (((ax - bx).abs() + (ay - by).abs() + (az - bz).abs()) / 2) as u32
    }

    /// All 6 neighboring coordinates, unfiltered (may be off-grid)
    pub fn raw_neighbors(&self) -> [HexCoord; 6] {
        let dirs = if self.col & 1 == 1 {
            &ODD_COL_DIRECTIONS
        } else {
            &EVEN_COL_DIRECTIONS
        };
        let mut out = [*self; 6];
        for (i, (dc, dr)) in dirs.iter().enumerate() {
            out[i] = HexCoord::new(self.col + dc, self.row + dr);
        }
        out
    }
}

/// Neighbors filtered to valid grid bounds
pub fn neighbors(grid: &GridConfig, coord: HexCoord) -> Vec<HexCoord> {
    coord
        .raw_neighbors()
        .into_iter()
        .filter(|c| grid.contains(*c))
        .collect()
}

/// Offset coordinate to screen-space hex center
pub fn to_pixel(grid: &GridConfig, coord: HexCoord) -> PixelPos {
    let shove = if coord.col & 1 == 1 {
        grid.hex_height / 2.0
    } else {
        0.0
    };
    PixelPos::new(
        coord.col as f32 * grid.hex_width * 0.75 + grid.hex_radius + grid.margin_left,
        coord.row as f32 * grid.hex_height + shove + grid.hex_radius + grid.margin_top,
    )
}

/// Nearest hex to a screen-space position (column first, then shoved row)
pub fn from_pixel(grid: &GridConfig, pos: PixelPos) -> HexCoord {
    let col = ((pos.x - grid.hex_radius - grid.margin_left) / (grid.hex_width * 0.75)).round()
        as i32;
    let shove = if col & 1 == 1 {
        grid.hex_height / 2.0
    } else {
        0.0
    };
    let row = ((pos.y - grid.hex_radius - grid.margin_top - shove) / grid.hex_height).round()
        as i32;
    HexCoord::new(col, row)
}

/// 180-degree board mirror, used to place enemy-side deployments
///
/// Involution: invert(invert(c)) == c.
pub fn invert(grid: &GridConfig, coord: HexCoord) -> HexCoord {
    HexCoord::new(grid.width - 1 - coord.col, grid.height - 1 - coord.row)
}
