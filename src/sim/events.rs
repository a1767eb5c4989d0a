//! Per-tick notifications for audio/visual collaborators
//!
//! Emitted in the order they happen within a tick, at most once per
//! occurrence. The core never waits on whoever consumes them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::BlastKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A structure launched a player projectile
    Fired { structure_id: u32, target: Vec2 },
    /// A blast came into existence
    Explosion {
        blast_id: u32,
        kind: BlastKind,
        center: Vec2,
    },
    StructureDestroyed { structure_id: u32 },
    /// Wave finished with `bonus` points for surviving structures
    LevelCleared { level: u32, bonus: u64 },
    LevelStarted { level: u32 },
    GameOver { score: u64, new_best: bool },
}
