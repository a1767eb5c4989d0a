//! Simulation module
//!
//! All gameplay logic lives here:
//! - Constant per-tick motion steps (wall-clock time only paces spawning)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod level;
pub mod motion;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::CollisionOutcome;
pub use events::GameEvent;
pub use level::Transition;
pub use snapshot::Snapshot;
pub use state::{Blast, BlastKind, GamePhase, GameState, Projectile, ProjectileKind, Structure};
pub use tick::{Command, Simulation};
