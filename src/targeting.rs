//! Weapon fan areas and facing checks
//!
//! Angles follow the rendering convention: degrees, measured with atan2 in
//! screen space (y grows downward), normalized to [0, 360). Containment
//! mixes one pixel-distance radius test with an angular test; everything
//! else in the crate sticks to cube distance.

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::constants::{FACING_CONE_HALF_ANGLE_DEG, TRIGGER_RANGE_SLACK};
use crate::hex::{to_pixel, HexCoord, PixelPos};
use crate::stats::WeaponStats;
use crate::units::{Unit, UnitId};

/// Which trigger slot an area belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponSlot {
    Main,
    Sub,
}

/// Ephemeral attack fan, rebuilt from unit state every step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerArea {
    pub unit: UnitId,
    pub slot: WeaponSlot,
    pub center: HexCoord,
    /// Aim direction (degrees)
    pub direction_deg: f32,
    /// Reach in pixels
    pub radius_px: f32,
    /// Half of the weapon's arc width (degrees)
    pub half_angle_deg: f32,
}

/// Normalize an angle to [0, 360)
pub fn normalize_deg(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    if a == 360.0 {
        0.0
    } else {
        a
    }
}

/// Smallest absolute difference between two angles (degrees, <= 180)
pub fn angle_diff_deg(a: f32, b: f32) -> f32 {
    ((a - b + 180.0).rem_euclid(360.0) - 180.0).abs()
}

/// Bearing from one pixel position to another, [0, 360)
pub fn bearing_deg(from: PixelPos, to: PixelPos) -> f32 {
    normalize_deg((to.y - from.y).atan2(to.x - from.x).to_degrees())
}

/// Authoritative reach of a weapon fan in pixels
///
/// hex_height * (range + 0.5): adjacent hex centers are uniformly
/// hex_height apart in this layout, so the formula measures reach in true
/// center-to-center units. The sprite-sized hex_radius * range * 2 variant
/// is visual only and must not be used for resolution.
pub fn trigger_radius_px(grid: &GridConfig, range_hexes: u32) -> f32 {
    grid.hex_height * (range_hexes as f32 + TRIGGER_RANGE_SLACK)
}

/// Build the attack fan for one of a unit's trigger slots
pub fn build_area(grid: &GridConfig, unit: &Unit, slot: WeaponSlot, weapon: &WeaponStats) -> TriggerArea {
    let direction_deg = match slot {
        WeaponSlot::Main => unit.main_angle,
        WeaponSlot::Sub => unit.sub_angle,
    };
    TriggerArea {
        unit: unit.id,
        slot,
        center: unit.position,
        direction_deg,
        radius_px: trigger_radius_px(grid, weapon.range_hexes),
        half_angle_deg: weapon.angle_deg / 2.0,
    }
}

/// Is the target coordinate inside the fan?
pub fn contains(grid: &GridConfig, area: &TriggerArea, target: HexCoord) -> bool {
    let center = to_pixel(grid, area.center);
    let target_px = to_pixel(grid, target);
    if center.distance(&target_px) > area.radius_px {
        return false;
    }
    angle_diff_deg(bearing_deg(center, target_px), area.direction_deg) <= area.half_angle_deg
}

/// Which of the defender's aim directions covers the attacker's bearing
///
/// Uses the fixed +/-30 degree defensive cone, not the weapon's attack arc.
/// Main wins when both cover. None means the defender is blind-sided.
pub fn facing_slot(grid: &GridConfig, defender: &Unit, attacker_coord: HexCoord) -> Option<WeaponSlot> {
    let bearing = bearing_deg(
        to_pixel(grid, defender.position),
        to_pixel(grid, attacker_coord),
    );
    if angle_diff_deg(bearing, defender.main_angle) <= FACING_CONE_HALF_ANGLE_DEG {
        Some(WeaponSlot::Main)
    } else if angle_diff_deg(bearing, defender.sub_angle) <= FACING_CONE_HALF_ANGLE_DEG {
        Some(WeaponSlot::Sub)
    } else {
        None
    }
}

/// Does the defender face the attacker with either weapon direction?
pub fn is_facing(grid: &GridConfig, defender: &Unit, attacker_coord: HexCoord) -> bool {
    facing_slot(grid, defender, attacker_coord).is_some()
}
