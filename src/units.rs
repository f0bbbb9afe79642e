//! Deployed units and their mutable combat state
//!
//! Units are keyed by arena-style ids, never by render handles. State is
//! owned by the simulator and mutated only through validated moves and the
//! combat resolver.

use serde::{Deserialize, Serialize};

use crate::constants::HEAL_FRACTION;
use crate::hex::HexCoord;
use crate::stats::UnitStats;
use crate::targeting::normalize_deg;

/// Unique identifier for deployed units (arena index, stable for the match)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Which side a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Ally,
    Enemy,
}

impl Faction {
    pub fn opponent(&self) -> Self {
        match self {
            Faction::Ally => Faction::Enemy,
            Faction::Enemy => Faction::Ally,
        }
    }
}

/// One deployed character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub character: String,
    pub faction: Faction,
    pub position: HexCoord,
    /// Main trigger aim (degrees, [0, 360))
    pub main_angle: f32,
    /// Sub trigger aim (degrees, [0, 360))
    pub sub_angle: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub action_points: i32,
    /// Stunned through this global step index, inclusive
    pub stunned_through_step: Option<u32>,
    pub defeated: bool,
}

impl Unit {
    pub fn spawn(
        id: UnitId,
        character: &str,
        stats: &UnitStats,
        faction: Faction,
        position: HexCoord,
        main_angle: f32,
        sub_angle: f32,
    ) -> Self {
        let max_hp = stats.max_hp();
        Self {
            id,
            character: character.to_string(),
            faction,
            position,
            main_angle: normalize_deg(main_angle),
            sub_angle: normalize_deg(sub_angle),
            hp: max_hp,
            max_hp,
            action_points: stats.action_points,
            stunned_through_step: None,
            defeated: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.defeated
    }

    /// Is the unit still locked out at the given global step index?
    pub fn is_stunned_at(&self, step: u32) -> bool {
        matches!(self.stunned_through_step, Some(through) if step <= through)
    }

    /// Extend the stun lockout; never shortens an existing one
    pub fn stun_through(&mut self, step: u32) {
        self.stunned_through_step = Some(match self.stunned_through_step {
            Some(existing) => existing.max(step),
            None => step,
        });
    }

    pub fn set_facing(&mut self, main_angle: f32, sub_angle: f32) {
        self.main_angle = normalize_deg(main_angle);
        self.sub_angle = normalize_deg(sub_angle);
    }

    /// Apply damage, clamping at zero. Returns true if this defeated the unit.
    pub fn apply_damage(&mut self, damage: i32) -> bool {
        self.hp = (self.hp - damage).max(0);
        if self.hp == 0 && !self.defeated {
            self.defeated = true;
            return true;
        }
        false
    }

    /// Completed-action recovery: floor(HEAL_FRACTION * max_hp), capped.
    /// Returns the HP actually restored.
    pub fn heal_for_action(&mut self) -> i32 {
        let amount = (HEAL_FRACTION * self.max_hp as f32).floor() as i32;
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }
}
