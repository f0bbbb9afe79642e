//! Static weapon and character stat tables
//!
//! Supplied by the surrounding layer, fixed for the match. Unknown ids are
//! data-integrity errors: lookups return None and the resolver skips the
//! affected unit rather than inventing defaults.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Stats for one trigger (weapon)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Full arc width of the attack fan (degrees)
    pub angle_deg: f32,
    /// Reach of the fan (hex units)
    pub range_hexes: u32,
    /// Attack multiplier
    pub trion_effect: f32,
    /// Damage-reduction multiplier when defending with this trigger
    pub defense: f32,
    /// Evasion multiplier when defending with this trigger
    pub avoid: f32,
}

/// Stats for one deployable character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitStats {
    pub main_weapon: String,
    pub sub_weapon: String,
    pub attack: i32,
    pub defense: i32,
    pub avoid: i32,
    pub trion: i32,
    pub action_points: i32,
}

impl UnitStats {
    /// HP pool derived at spawn
    pub fn max_hp(&self) -> i32 {
        self.trion * self.defense
    }
}

/// The full static lookup tables for a match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatTables {
    pub weapons: AHashMap<String, WeaponStats>,
    pub characters: AHashMap<String, UnitStats>,
}

impl StatTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load tables from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn weapon(&self, id: &str) -> Option<&WeaponStats> {
        self.weapons.get(id)
    }

    pub fn character(&self, id: &str) -> Option<&UnitStats> {
        self.characters.get(id)
    }

    /// Small fixed roster used by tests and benches
    pub fn demo_roster() -> Self {
        let mut tables = Self::new();
        tables.weapons.insert(
            "raygust".into(),
            WeaponStats {
                angle_deg: 90.0,
                range_hexes: 1,
                trion_effect: 0.8,
                defense: 1.2,
                avoid: 1.0,
            },
        );
        tables.weapons.insert(
            "kogetsu".into(),
            WeaponStats {
                angle_deg: 120.0,
                range_hexes: 1,
                trion_effect: 1.0,
                defense: 1.0,
                avoid: 1.2,
            },
        );
        tables.weapons.insert(
            "lightning".into(),
            WeaponStats {
                angle_deg: 30.0,
                range_hexes: 4,
                trion_effect: 1.0,
                defense: 0.6,
                avoid: 0.8,
            },
        );
        tables.weapons.insert(
            "shield".into(),
            WeaponStats {
                angle_deg: 150.0,
                range_hexes: 1,
                trion_effect: 0.0,
                defense: 1.5,
                avoid: 0.6,
            },
        );
        tables.characters.insert(
            "attacker".into(),
            UnitStats {
                main_weapon: "kogetsu".into(),
                sub_weapon: "shield".into(),
                attack: 8,
                defense: 2,
                avoid: 20,
                trion: 5,
                action_points: 4,
            },
        );
        tables.characters.insert(
            "sniper".into(),
            UnitStats {
                main_weapon: "lightning".into(),
                sub_weapon: "shield".into(),
                attack: 6,
                defense: 2,
                avoid: 15,
                trion: 4,
                action_points: 3,
            },
        );
        tables.characters.insert(
            "allrounder".into(),
            UnitStats {
                main_weapon: "kogetsu".into(),
                sub_weapon: "raygust".into(),
                attack: 7,
                defense: 3,
                avoid: 18,
                trion: 5,
                action_points: 4,
            },
        );
        tables
    }
}
