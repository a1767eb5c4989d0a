//! Game state and core simulation types
//!
//! Populations are kept as `Vec`s sorted by entity id; every tick replaces
//! them with a freshly built generation.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;
use crate::{angle_between, consts::BLAST_SHRINK_FACTOR};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every structure lost; frozen until restart
    GameOver,
}

/// A defended site on the ground line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: u32,
    pub position: Vec2,
    pub is_destroyed: bool,
    pub ammo: u32,
}

impl Structure {
    pub fn new(id: u32, position: Vec2, ammo: u32) -> Self {
        Self {
            id,
            position,
            is_destroyed: false,
            ammo,
        }
    }

    /// Does an impact at `x` land on this structure?
    pub fn covers_x(&self, x: f32, half_width: f32) -> bool {
        (x - self.position.x).abs() <= half_width
    }

    /// Alive and able to fire
    pub fn can_fire(&self) -> bool {
        !self.is_destroyed && self.ammo > 0
    }
}

/// Who launched a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Falls from the top of the scene toward the ground
    Incoming,
    /// Fired by the player from a structure
    Outgoing,
}

/// A straight-line projectile; heading is fixed at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub start: Vec2,
    pub end: Vec2,
    pub current: Vec2,
    /// Units per tick
    pub speed: f32,
    /// Radians, from `start` toward `end`
    pub angle: f32,
}

impl Projectile {
    pub fn new(id: u32, kind: ProjectileKind, start: Vec2, end: Vec2, speed: f32) -> Self {
        Self {
            id,
            kind,
            start,
            end,
            current: start,
            speed,
            angle: angle_between(start, end),
        }
    }

    /// Distance left to the target point
    pub fn remaining(&self) -> f32 {
        self.current.distance(self.end)
    }
}

/// What produced a blast (drives its max radius and audio/visual choice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlastKind {
    /// Player projectile reached its target
    Detonation,
    /// Incoming projectile hit the ground line
    Impact,
    /// Incoming projectile caught by another blast
    Chain,
}

/// An expanding-then-shrinking circular hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blast {
    pub id: u32,
    pub kind: BlastKind,
    pub center: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub is_expanding: bool,
}

impl Blast {
    pub fn new(id: u32, kind: BlastKind, center: Vec2, max_radius: f32) -> Self {
        Self {
            id,
            kind,
            center,
            radius: 0.0,
            max_radius,
            is_expanding: true,
        }
    }

    /// Advance the radius one tick. Returns `None` once the blast is spent.
    ///
    /// The step that reaches `max_radius` may overshoot it; shrinking runs
    /// at 1.5x the growth rate.
    pub fn stepped(&self, growth_rate: f32) -> Option<Blast> {
        let mut next = self.clone();
        if next.is_expanding {
            next.radius += growth_rate;
            if next.radius >= next.max_radius {
                next.is_expanding = false;
            }
        } else {
            next.radius -= growth_rate * BLAST_SHRINK_FACTOR;
            if next.radius <= 0.0 {
                return None;
            }
        }
        Some(next)
    }

    /// Is `point` inside the current radius?
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) < self.radius
    }
}

/// Complete session state, exclusively owned by the simulation driver
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    /// 1-based level
    pub level: u32,
    pub spawned_count: u32,
    pub quota: u32,
    /// Timestamp of the last spawn (or level start); `None` until the next tick
    pub last_spawn_ms: Option<f64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub structures: Vec<Structure>,
    /// Incoming projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Player projectiles (sorted by id)
    pub outgoing: Vec<Projectile>,
    /// Active blasts (sorted by id)
    pub blasts: Vec<Blast>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh level-1 game
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            score: 0,
            best_score: 0,
            level: 1,
            spawned_count: 0,
            quota: tuning.quota_for_level(1),
            last_spawn_ms: None,
            time_ticks: 0,
            structures: Vec::new(),
            projectiles: Vec::new(),
            outgoing: Vec::new(),
            blasts: Vec::new(),
            next_id: 1,
        };
        state.build_structures(tuning);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace structures with a full, undamaged row
    pub fn build_structures(&mut self, tuning: &Tuning) {
        self.structures = tuning
            .structure_positions()
            .into_iter()
            .enumerate()
            .map(|(i, pos)| Structure::new(i as u32, pos, tuning.initial_ammo))
            .collect();
    }

    pub fn surviving_structures(&self) -> usize {
        self.structures.iter().filter(|s| !s.is_destroyed).count()
    }

    /// No projectiles or blasts left in flight
    pub fn battlefield_empty(&self) -> bool {
        self.projectiles.is_empty() && self.outgoing.is_empty() && self.blasts.is_empty()
    }

    pub fn clear_populations(&mut self) {
        self.projectiles.clear();
        self.outgoing.clear();
        self.blasts.clear();
    }

    /// Keep populations sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
        self.outgoing.sort_by_key(|p| p.id);
        self.blasts.sort_by_key(|b| b.id);
    }
}
