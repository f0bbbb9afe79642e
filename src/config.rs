//! Immutable per-match grid geometry
//!
//! Set once per match. Derived hex dimensions are computed at construction
//! so coordinate math never re-derives them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::hex::HexCoord;

/// Grid geometry for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Columns
    pub width: i32,
    /// Rows
    pub height: i32,
    /// Circumradius of one hex (pixels)
    pub hex_radius: f32,
    /// Left deployment margin (pixels)
    pub margin_left: f32,
    /// Top deployment margin (pixels)
    pub margin_top: f32,
    /// Derived: corner-to-corner width = 2 * radius
    pub hex_width: f32,
    /// Derived: flat-to-flat height = sqrt(3) * radius
    pub hex_height: f32,
}

impl GridConfig {
    pub fn new(width: i32, height: i32, hex_radius: f32, margin_left: f32, margin_top: f32) -> Self {
        Self {
            width,
            height,
            hex_radius,
            margin_left,
            margin_top,
            hex_width: hex_radius * 2.0,
            hex_height: 3.0_f32.sqrt() * hex_radius,
        }
    }

    /// Validate for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SimError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.hex_radius <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "hex_radius must be positive, got {}",
                self.hex_radius
            )));
        }
        Ok(())
    }

    /// Is the coordinate on the grid?
    pub fn contains(&self, coord: HexCoord) -> bool {
        coord.col >= 0 && coord.row >= 0 && coord.col < self.width && coord.row < self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_dimensions() {
        let g = GridConfig::new(10, 10, 24.0, 0.0, 0.0);
        assert_eq!(g.hex_width, 48.0);
        assert!((g.hex_height - 41.569).abs() < 0.01);
    }

    #[test]
    fn test_contains_bounds() {
        let g = GridConfig::new(10, 8, 24.0, 0.0, 0.0);
        assert!(g.contains(HexCoord::new(0, 0)));
        assert!(g.contains(HexCoord::new(9, 7)));
        assert!(!g.contains(HexCoord::new(10, 7)));
        assert!(!g.contains(HexCoord::new(9, 8)));
        assert!(!g.contains(HexCoord::new(-1, 0)));
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        assert!(GridConfig::new(0, 10, 24.0, 0.0, 0.0).validate().is_err());
        assert!(GridConfig::new(10, 10, 0.0, 0.0, 0.0).validate().is_err());
        assert!(GridConfig::new(10, 10, 24.0, 12.0, 12.0).validate().is_ok());
    }
}
