//! Skyshield - arcade missile defense simulation core
//!
//! Core modules:
//! - `sim`: Tick-based simulation (spawning, motion, collisions, level flow)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Best score storage
//! - `autopilot`: Scripted player for headless runs
//! - `web`: wasm-bindgen facade for browser hosts

pub mod autopilot;
pub mod persistence;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use autopilot::Autopilot;
pub use persistence::{BestScoreStore, MemoryStore, StoreError};
pub use sim::{GameEvent, GamePhase, Simulation, Snapshot};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// Scene units, origin top-left, y grows downward. Speeds and radius steps
/// are per tick, intervals are in milliseconds.
pub mod consts {
    /// Scene dimensions
    pub const SCENE_WIDTH: f32 = 800.0;
    pub const SCENE_HEIGHT: f32 = 600.0;
    /// Ground line; structures sit on it and incoming projectiles detonate on it
    pub const GROUND_Y: f32 = 560.0;

    /// Structure defaults
    pub const STRUCTURE_COUNT: usize = 6;
    pub const STRUCTURE_HALF_WIDTH: f32 = 20.0;
    pub const INITIAL_AMMO: u32 = 10;

    /// Spawn interval = max(MIN, BASE / (level * SCALING))
    pub const SPAWN_BASE_INTERVAL_MS: f64 = 3000.0;
    pub const SPAWN_MIN_INTERVAL_MS: f64 = 500.0;
    pub const SPAWN_INTERVAL_SCALING: f64 = 1.0;
    /// Chance an incoming projectile is aimed at a live structure
    pub const TARGET_STRUCTURE_CHANCE: f64 = 0.8;

    /// Incoming projectile speed = MIN + rand * (MAX - MIN) + level * LEVEL_SCALING
    pub const INCOMING_SPEED_MIN: f32 = 0.5;
    pub const INCOMING_SPEED_MAX: f32 = 1.5;
    pub const INCOMING_SPEED_LEVEL_SCALING: f32 = 0.2;
    pub const OUTGOING_SPEED: f32 = 6.0;

    /// Blast defaults
    pub const BLAST_GROWTH_RATE: f32 = 1.0;
    /// Shrinking runs this much faster than growth
    pub const BLAST_SHRINK_FACTOR: f32 = 1.5;
    pub const BLAST_MAX_RADIUS: f32 = 50.0;
    pub const IMPACT_BLAST_MAX_RADIUS: f32 = 20.0;
    pub const CHAIN_BLAST_MAX_RADIUS: f32 = 25.0;

    /// Scoring
    pub const KILL_SCORE: u64 = 25;
    pub const STRUCTURE_SAVED_SCORE: u64 = 100;

    /// Quota = BASE + level * PER_LEVEL
    pub const QUOTA_BASE: u32 = 10;
    pub const QUOTA_PER_LEVEL: u32 = 2;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Direction angle (radians) pointing from `from` toward `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Move `pos` by `speed` units along `angle`
#[inline]
pub fn step_along(pos: Vec2, angle: f32, speed: f32) -> Vec2 {
    pos + Vec2::from_angle(angle) * speed
}

/// True if both coordinates are finite numbers
#[inline]
pub fn is_finite_point(p: Vec2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
