//! Simulation driver
//!
//! One `tick` per animation frame: queued commands, spawn check, motion,
//! collisions, then the level/game-over check. Commands are only ever
//! applied at the start of a tick, never mid-tick.

use std::collections::VecDeque;

use glam::Vec2;

use super::collision;
use super::events::GameEvent;
use super::level;
use super::motion;
use super::snapshot::Snapshot;
use super::spawn;
use super::state::{GamePhase, GameState, Projectile, ProjectileKind};
use crate::is_finite_point;
use crate::persistence::{BestScoreStore, MemoryStore};
use crate::tuning::Tuning;

/// Player commands, queued until the next tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Launch a player projectile at a point
    Fire(Vec2),
    /// Start a new game (only honoured after game over)
    Restart,
}

/// Owns the canonical game state and publishes snapshots of it
pub struct Simulation<S = MemoryStore> {
    tuning: Tuning,
    state: GameState,
    store: S,
    commands: VecDeque<Command>,
    /// Events of the last tick
    events: Vec<GameEvent>,
    /// Events raised outside a tick, delivered with the next one
    pending_events: Vec<GameEvent>,
    running: bool,
    snapshot: Snapshot,
}

impl<S: BestScoreStore> Simulation<S> {
    /// Create a level-1 game. The best score is read from `store` once, here.
    pub fn new(seed: u64, tuning: Tuning, mut store: S) -> Self {
        let tuning = tuning.sanitized();
        let mut state = GameState::new(seed, &tuning);

        state.best_score = match store.load_best_score() {
            Ok(best) => best,
            Err(err) => {
                log::warn!("Could not load best score, starting from 0: {}", err);
                0
            }
        };

        let snapshot = Snapshot::capture(&state);
        log::info!("Simulation ready (seed {}, best score {})", seed, state.best_score);

        Self {
            tuning,
            state,
            store,
            commands: VecDeque::new(),
            events: Vec::new(),
            pending_events: vec![GameEvent::LevelStarted { level: 1 }],
            running: true,
            snapshot,
        }
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, now_ms: f64) -> Snapshot {
        self.events.clear();
        if !self.running {
            return self.snapshot.clone();
        }
        self.events.append(&mut self.pending_events);

        self.apply_commands();

        // Frozen until restart
        if self.state.phase == GamePhase::GameOver {
            return self.snapshot.clone();
        }

        self.state.time_ticks += 1;

        if now_ms.is_finite() {
            spawn::spawn_check(&mut self.state, &self.tuning, now_ms);
        }
        motion::integrate(&mut self.state, &self.tuning);
        collision::resolve(&mut self.state, &self.tuning, &mut self.events);
        level::evaluate(
            &mut self.state,
            &self.tuning,
            &mut self.store,
            &mut self.events,
        );

        self.snapshot = Snapshot::capture(&self.state);
        self.snapshot.clone()
    }

    /// Queue a fire command at `target`
    pub fn fire(&mut self, target: Vec2) {
        self.commands.push_back(Command::Fire(target));
    }

    /// Queue a restart; ignored unless the game is over when it is applied
    pub fn restart(&mut self) {
        self.commands.push_back(Command::Restart);
    }

    /// Stop scheduling work; ticks return the last snapshot until resumed
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Simulation stopped");
        }
        self.running = false;
    }

    pub fn resume(&mut self) {
        if !self.running {
            log::info!("Simulation resumed");
            // Time spent stopped does not count toward the next spawn
            self.state.last_spawn_ms = None;
        }
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last published snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Events emitted by the last tick, in order
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn apply_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            match command {
                Command::Fire(target) => self.apply_fire(target),
                Command::Restart => self.apply_restart(),
            }
        }
    }

    fn apply_restart(&mut self) {
        if self.state.phase != GamePhase::GameOver {
            log::debug!("Restart ignored while playing");
            return;
        }
        level::reset_game(&mut self.state, &self.tuning, &mut self.events);
    }

    /// Launch from the nearest live structure that still has ammo
    fn apply_fire(&mut self, target: Vec2) {
        if self.state.phase == GamePhase::GameOver {
            log::debug!("Fire ignored after game over");
            return;
        }
        if !is_finite_point(target) || target.y > self.tuning.ground_y {
            log::debug!("Fire ignored: invalid target {:?}", target);
            return;
        }

        let Some(index) = self
            .state
            .structures
            .iter()
            .enumerate()
            .filter(|(_, s)| s.can_fire())
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance(target)
                    .partial_cmp(&b.position.distance(target))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
        else {
            log::debug!("Fire ignored: no armed structure");
            return;
        };

        let id = self.state.next_entity_id();
        let structure = &mut self.state.structures[index];
        structure.ammo -= 1;
        let origin = structure.position;
        let structure_id = structure.id;

        self.state.outgoing.push(Projectile::new(
            id,
            ProjectileKind::Outgoing,
            origin,
            target,
            self.tuning.outgoing_speed,
        ));
        self.events.push(GameEvent::Fired {
            structure_id,
            target,
        });
        log::debug!(
            "Structure {} fired at ({:.0}, {:.0})",
            structure_id,
            target.x,
            target.y
        );
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
