//! Terrain height grid and movement entry costs
//!
//! Heights are supplied by the surrounding layer, fixed for the match.
//! The planner only ever reads them.

use serde::{Deserialize, Serialize};

use crate::constants::BASE_STEP_COST;
use crate::hex::HexCoord;

/// Static `[row][col]` height table for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    heights: Vec<Vec<i32>>,
}

impl TerrainGrid {
    /// Wrap an externally supplied `[row][col]` height table
    pub fn new(heights: Vec<Vec<i32>>) -> Self {
        Self { heights }
    }

    /// All-zero terrain, handy for tests and flat scenarios
    pub fn flat(width: usize, height: usize) -> Self {
        Self {
            heights: vec![vec![0; width]; height],
        }
    }

    /// Height at a coordinate; off-table coordinates read as 0
    pub fn height(&self, coord: HexCoord) -> i32 {
        if coord.row < 0 || coord.col < 0 {
            return 0;
        }
        self.heights
            .get(coord.row as usize)
            .and_then(|row| row.get(coord.col as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Action-point cost of stepping from one hex to an adjacent one
    ///
    /// Climbing costs the height gain on top of the baseline; descending
    /// and flat ground cost the baseline alone.
    pub fn entry_cost(&self, from: HexCoord, to: HexCoord) -> i32 {
        (self.height(to) - self.height(from)).max(0) + BASE_STEP_COST
    }
}
