//! Hex Skirmish - deterministic hex-grid tactical combat core
//!
//! The simulation behind a turn-based grid combat game: coordinate math,
//! terrain-aware movement, weapon fan targeting, and step-by-step combat
//! resolution. The same resolution path serves the authoritative server
//! pass and client-side animated replay; given equal inputs and seed the
//! two agree exactly. Rendering, input, transport, and persistence live
//! outside this crate and talk to it through `TurnSimulator`.

pub mod config;
pub mod constants;
pub mod error;
pub mod hex;
pub mod movement;
pub mod resolver;
pub mod stats;
pub mod targeting;
pub mod terrain;
pub mod turn;
pub mod units;

// Re-exports for convenient access
pub use config::GridConfig;
pub use constants::*;
pub use error::SimError;
pub use hex::{from_pixel, invert, neighbors, to_pixel, HexCoord, PixelPos};
pub use movement::{reachable, shortest_path};
pub use resolver::{
    avoidance_chance, compute_damage, resolve_step, Engagement, StepEvent, StepOutcome,
};
pub use stats::{StatTables, UnitStats, WeaponStats};
pub use targeting::{
    bearing_deg, build_area, contains, facing_slot, is_facing, normalize_deg, trigger_radius_px,
    TriggerArea, WeaponSlot,
};
pub use terrain::TerrainGrid;
pub use turn::{
    CombatStepResult, StepAction, TurnPhase, TurnResult, TurnSimulator, UnitStepReport,
};
pub use units::{Faction, Unit, UnitId};
