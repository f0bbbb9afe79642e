//! Turn orchestration: apply declared actions, resolve combat, detect victory
//!
//! One turn is an ordered sequence of steps. Each step applies every unit's
//! declared position and facing against the same snapshot, then runs the
//! combat resolver exactly once. The same code path serves authoritative
//! resolution and step-by-step client replay; with equal seeds the outputs
//! are identical.

use ahash::{AHashMap, AHashSet};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GridConfig;
use crate::error::{Result, SimError};
use crate::hex::{invert, HexCoord};
use crate::movement::{reachable, shortest_path};
use crate::resolver::{resolve_step, StepEvent};
use crate::stats::StatTables;
use crate::targeting::normalize_deg;
use crate::terrain::TerrainGrid;
use crate::units::{Faction, Unit, UnitId};

/// Declared intent for one unit in one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAction {
    pub unit: UnitId,
    pub target: HexCoord,
    pub main_angle: f32,
    pub sub_angle: f32,
}

/// Per-unit outcome of one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStepReport {
    pub unit: UnitId,
    pub position: HexCoord,
    pub main_angle: f32,
    pub sub_angle: f32,
    pub hp: i32,
    /// Net HP change this step (healing minus damage)
    pub hp_delta: i32,
    pub defeated: bool,
    /// Locked out of its declared action next step
    pub stunned: bool,
    pub attackers: Vec<UnitId>,
}

/// Everything that happened in one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatStepResult {
    /// Step index within the turn
    pub step: u32,
    pub reports: Vec<UnitStepReport>,
    pub events: Vec<StepEvent>,
    pub winner: Option<Faction>,
}

/// Ordered output of one resolved turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub steps: Vec<CombatStepResult>,
    pub step_count: u32,
    pub winner: Option<Faction>,
}

/// Simulator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    #[default]
    Idle, // Awaiting the next turn's submissions
    Resolving, // Stepping through a submitted turn
    Complete,  // A winner was determined
}

/// The authoritative turn-by-turn combat simulation
///
/// Owns its unit set exclusively for the duration of a turn; the only
/// randomness is the seeded avoidance roll.
#[derive(Debug, Clone)]
pub struct TurnSimulator {
    pub grid: GridConfig,
    pub terrain: TerrainGrid,
    pub tables: StatTables,
    pub units: Vec<Unit>,
    pub turn_number: u32,
    pub phase: TurnPhase,
    /// Monotonic step counter across turns; stun expiries reference it
    steps_resolved: u32,
    rng: ChaCha8Rng,
    next_unit_id: u32,
}

impl TurnSimulator {
    pub fn new(grid: GridConfig, terrain: TerrainGrid, tables: StatTables, seed: u64) -> Result<Self> {
        grid.validate()?;
        Ok(Self {
            grid,
            terrain,
            tables,
            units: Vec::new(),
            turn_number: 0,
            phase: TurnPhase::Idle,
            steps_resolved: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_unit_id: 0,
        })
    }

    /// Deploy a single unit at a fixed position
    pub fn spawn(
        &mut self,
        character: &str,
        faction: Faction,
        position: HexCoord,
        main_angle: f32,
        sub_angle: f32,
    ) -> Result<UnitId> {
        let stats = self
            .tables
            .character(character)
            .ok_or_else(|| SimError::UnknownCharacter(character.to_string()))?;
        if !self.grid.contains(position) {
            return Err(SimError::OutOfBounds(position.col, position.row));
        }
        if self.units.iter().any(|u| u.is_alive() && u.position == position) {
            return Err(SimError::PositionOccupied(position.col, position.row));
        }
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        self.units.push(Unit::spawn(
            id,
            character,
            stats,
            faction,
            position,
            main_angle,
            sub_angle,
        ));
        Ok(id)
    }

    /// Deploy an ally and its 180-degree mirrored enemy counterpart
    pub fn deploy_pair(
        &mut self,
        ally_character: &str,
        enemy_character: &str,
        position: HexCoord,
        main_angle: f32,
        sub_angle: f32,
    ) -> Result<(UnitId, UnitId)> {
        let ally = self.spawn(ally_character, Faction::Ally, position, main_angle, sub_angle)?;
        let enemy = self.spawn(
            enemy_character,
            Faction::Enemy,
            invert(&self.grid, position),
            normalize_deg(main_angle + 180.0),
            normalize_deg(sub_angle + 180.0),
        )?;
        Ok((ally, enemy))
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    fn live_count(&self, faction: Faction) -> usize {
        self.units
            .iter()
            .filter(|u| u.is_alive() && u.faction == faction)
            .count()
    }

    /// Movement-range query for the surrounding layer's highlighting
    pub fn reachable_for(&self, id: UnitId) -> AHashMap<HexCoord, i32> {
        let Some(unit) = self.unit(id).filter(|u| u.is_alive()) else {
            return AHashMap::new();
        };
        let occupied = self.occupied_except(id);
        reachable(&self.grid, &self.terrain, &occupied, unit.position, unit.action_points)
    }

    /// Replay-step decomposition of a committed move
    pub fn replay_path(&self, start: HexCoord, end: HexCoord) -> Vec<HexCoord> {
        shortest_path(&self.grid, start, end)
    }

    fn occupied_except(&self, id: UnitId) -> AHashSet<HexCoord> {
        self.units
            .iter()
            .filter(|u| u.is_alive() && u.id != id)
            .map(|u| u.position)
            .collect()
    }

    /// Resolve one full turn from per-faction step-grouped submissions
    ///
    /// `ally_steps[k]` / `enemy_steps[k]` hold the actions declared for
    /// step k, already grouped by the submission layer. Stops early the
    /// step a winner emerges; otherwise ends the turn by refilling
    /// survivors' action points and advancing the turn counter.
    pub fn resolve_turn(
        &mut self,
        ally_steps: &[Vec<StepAction>],
        enemy_steps: &[Vec<StepAction>],
    ) -> TurnResult {
        self.phase = TurnPhase::Resolving;
        let total = ally_steps.len().max(enemy_steps.len());
        let mut steps = Vec::with_capacity(total);
        let mut winner = None;
        let mut match_over = false;

        for k in 0..total {
            let global_step = self.steps_resolved;
            let alive_before: Vec<UnitId> = self
                .units
                .iter()
                .filter(|u| u.is_alive())
                .map(|u| u.id)
                .collect();

            // Apply phase: every declared position/facing lands before any
            // combat is evaluated. Allies resolve destination conflicts
            // first, then enemies, each in submitted order.
            let mut acted = AHashSet::new();
            let empty = Vec::new();
            for (faction, actions) in [
                (Faction::Ally, ally_steps.get(k).unwrap_or(&empty)),
                (Faction::Enemy, enemy_steps.get(k).unwrap_or(&empty)),
            ] {
                for action in actions {
                    self.apply_action(faction, action, global_step, &mut acted);
                }
            }

            let outcome = resolve_step(
                &self.grid,
                &self.tables,
                &mut self.units,
                global_step,
                &acted,
                &mut self.rng,
            );

            let allies = self.live_count(Faction::Ally);
            let enemies = self.live_count(Faction::Enemy);
            winner = match (allies, enemies) {
                (0, 0) => None, // mutual annihilation, no one to crown
                (_, 0) => Some(Faction::Ally),
                (0, _) => Some(Faction::Enemy),
                _ => None,
            };

            let reports = alive_before
                .iter()
                .filter_map(|id| self.unit(*id))
                .map(|u| UnitStepReport {
                    unit: u.id,
                    position: u.position,
                    main_angle: u.main_angle,
                    sub_angle: u.sub_angle,
                    hp: u.hp,
                    hp_delta: outcome.hp_delta.get(&u.id).copied().unwrap_or(0),
                    defeated: u.defeated,
                    stunned: u.is_stunned_at(global_step + 1),
                    attackers: outcome.attackers_of.get(&u.id).cloned().unwrap_or_default(),
                })
                .collect();

            steps.push(CombatStepResult {
                step: k as u32,
                reports,
                events: outcome.events,
                winner,
            });
            self.steps_resolved += 1;

            // A drawn match (both factions wiped in the same step) ends
            // the match just like a decisive one.
            match_over = allies == 0 || enemies == 0;
            if match_over {
                break;
            }
        }

        if match_over {
            self.phase = TurnPhase::Complete;
        } else {
            self.end_turn();
        }
        debug!(
            turn = self.turn_number,
            steps = steps.len(),
            winner = ?winner,
            "turn resolved"
        );

        TurnResult {
            step_count: steps.len() as u32,
            steps,
            winner,
        }
    }

    /// Apply one declared action during the simultaneous apply phase
    ///
    /// A stunned unit's action is consumed whole. An invalid destination
    /// (out of range, out of bounds, or claimed) cancels the move but the
    /// declared facing still lands; only a completed action counts toward
    /// the step's heal set.
    fn apply_action(
        &mut self,
        faction: Faction,
        action: &StepAction,
        global_step: u32,
        acted: &mut AHashSet<UnitId>,
    ) {
        let occupied = self.occupied_except(action.unit);
        let Some(unit) = self
            .units
            .iter_mut()
            .find(|u| u.id == action.unit && u.faction == faction)
        else {
            return;
        };
        if !unit.is_alive() || unit.is_stunned_at(global_step) {
            return;
        }

        if action.target == unit.position {
            unit.set_facing(action.main_angle, action.sub_angle);
            acted.insert(unit.id);
            return;
        }

        let start = unit.position;
        let budget = unit.action_points;
        let range = reachable(&self.grid, &self.terrain, &occupied, start, budget);
        match range.get(&action.target) {
            Some(&remaining) if action.target != start => {
                unit.position = action.target;
                unit.action_points = remaining;
                unit.set_facing(action.main_angle, action.sub_angle);
                acted.insert(unit.id);
            }
            _ => {
                // Move rejected; aim still counts, action does not.
                unit.set_facing(action.main_angle, action.sub_angle);
            }
        }
    }

    /// Terminal no-winner transition: refill survivors and advance the turn
    fn end_turn(&mut self) {
        for unit in self.units.iter_mut().filter(|u| u.is_alive()) {
            if let Some(stats) = self.tables.character(&unit.character) {
                unit.action_points = stats.action_points;
            }
            if matches!(unit.stunned_through_step, Some(t) if t < self.steps_resolved) {
                unit.stunned_through_step = None;
            }
        }
        self.turn_number += 1;
        self.phase = TurnPhase::Idle;
    }
}
