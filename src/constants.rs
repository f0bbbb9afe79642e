//! Combat rule constants - all tunable values in one place
//!
//! These are the fixed numbers of the rule set, not per-match data.

/// Half-angle of the universal defensive cone (degrees).
///
/// A defender "faces" an attacker when the attacker's bearing falls within
/// this cone of either weapon direction. Independent of the equipped
/// weapon's attack arc.
pub const FACING_CONE_HALF_ANGLE_DEG: f32 = 30.0;

/// A landed hit never deals less than this.
pub const MIN_DAMAGE: i32 = 1;

/// Fraction of max HP restored when a unit completes an action in a step.
pub const HEAL_FRACTION: f32 = 0.1;

/// How many steps past the current one a fresh stun lasts.
pub const STUN_EXTRA_STEPS: u32 = 1;

/// Baseline cost of entering any hex, before the climb surcharge.
pub const BASE_STEP_COST: i32 = 1;

/// Trigger radius = hex_height * (range + slack).
///
/// Adjacent hex centers in the shoved-offset layout are exactly hex_height
/// apart in every direction, so this scales the fan in true
/// center-to-center units. The half-hex slack absorbs rounding without
/// reaching the next ring.
pub const TRIGGER_RANGE_SLACK: f32 = 0.5;
