//! Level and game-over state machine
//!
//! Checked once per tick after collisions. Loss wins over level clear when
//! both would apply in the same tick.

use super::events::GameEvent;
use super::state::{GamePhase, GameState};
use crate::persistence::BestScoreStore;
use crate::tuning::Tuning;

/// Result of the end-of-tick check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    GameOver,
    LevelCleared { bonus: u64 },
}

/// Decide and apply the end-of-tick transition
pub fn evaluate(
    state: &mut GameState,
    tuning: &Tuning,
    store: &mut dyn BestScoreStore,
    events: &mut Vec<GameEvent>,
) -> Transition {
    if state.phase == GamePhase::GameOver {
        return Transition::None;
    }

    if state.surviving_structures() == 0 {
        enter_game_over(state, store, events);
        return Transition::GameOver;
    }

    if level_cleared(state) {
        let bonus = advance_level(state, tuning, events);
        return Transition::LevelCleared { bonus };
    }

    Transition::None
}

/// Quota exhausted and nothing left in flight
pub fn level_cleared(state: &GameState) -> bool {
    state.spawned_count == state.quota && state.battlefield_empty()
}

/// Freeze the game and persist a new best score
pub fn enter_game_over(
    state: &mut GameState,
    store: &mut dyn BestScoreStore,
    events: &mut Vec<GameEvent>,
) {
    state.phase = GamePhase::GameOver;

    let new_best = state.score > state.best_score;
    if new_best {
        state.best_score = state.score;
        if let Err(err) = store.save_best_score(state.score) {
            log::warn!("Failed to save best score {}: {}", state.score, err);
        }
    }

    log::info!(
        "Game over at level {} with score {}{}",
        state.level,
        state.score,
        if new_best { " (new best!)" } else { "" }
    );
    events.push(GameEvent::GameOver {
        score: state.score,
        new_best,
    });
}

/// Award the survivor bonus and set up the next level. Returns the bonus.
pub fn advance_level(state: &mut GameState, tuning: &Tuning, events: &mut Vec<GameEvent>) -> u64 {
    let survivors = state.surviving_structures() as u64;
    let bonus = survivors * tuning.structure_saved_score;
    state.score += bonus;
    events.push(GameEvent::LevelCleared {
        level: state.level,
        bonus,
    });
    log::info!(
        "Level {} cleared: {} structures saved, bonus {}",
        state.level,
        survivors,
        bonus
    );

    state.level += 1;
    state.quota = tuning.quota_for_level(state.level);
    state.spawned_count = 0;
    state.last_spawn_ms = None;
    // Destroyed structures stay destroyed and unarmed
    for structure in state.structures.iter_mut().filter(|s| !s.is_destroyed) {
        structure.ammo = tuning.initial_ammo;
    }
    state.clear_populations();

    events.push(GameEvent::LevelStarted { level: state.level });
    log::info!("Level {} started, quota {}", state.level, state.quota);
    bonus
}

/// Start a new game from scratch; the best score carries over
pub fn reset_game(state: &mut GameState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    state.build_structures(tuning);
    state.score = 0;
    state.level = 1;
    state.quota = tuning.quota_for_level(1);
    state.spawned_count = 0;
    state.last_spawn_ms = None;
    state.clear_populations();
    state.phase = GamePhase::Playing;

    events.push(GameEvent::LevelStarted { level: 1 });
    log::info!("New game started");
}
