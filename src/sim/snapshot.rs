//! Read-only view of the simulation published after each tick

use serde::{Deserialize, Serialize};

use super::state::{Blast, GamePhase, GameState, Projectile, Structure};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Incoming projectiles
    pub projectiles: Vec<Projectile>,
    pub outgoing_projectiles: Vec<Projectile>,
    pub blasts: Vec<Blast>,
    pub structures: Vec<Structure>,
    pub score: u64,
    pub level: u32,
    pub is_game_over: bool,
    pub best_score: u64,
    pub phase: GamePhase,
    pub spawned_count: u32,
    pub quota: u32,
    /// Ticks simulated this session; frozen while stopped or after game over
    pub time_ticks: u64,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            projectiles: state.projectiles.clone(),
            outgoing_projectiles: state.outgoing.clone(),
            blasts: state.blasts.clone(),
            structures: state.structures.clone(),
            score: state.score,
            level: state.level,
            is_game_over: state.phase == GamePhase::GameOver,
            best_score: state.best_score,
            phase: state.phase,
            spawned_count: state.spawned_count,
            quota: state.quota,
            time_ticks: state.time_ticks,
        }
    }

    pub fn surviving_structures(&self) -> usize {
        self.structures.iter().filter(|s| !s.is_destroyed).count()
    }
}
