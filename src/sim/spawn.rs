//! Incoming projectile spawning
//!
//! One projectile at most per tick, paced by the level's spawn interval and
//! capped by the level quota.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Projectile, ProjectileKind};
use crate::tuning::Tuning;

/// Spawn an incoming projectile if the interval has elapsed.
///
/// The first call after a level start only records `now_ms` as the
/// baseline. Returns the new projectile's id.
pub fn spawn_check(state: &mut GameState, tuning: &Tuning, now_ms: f64) -> Option<u32> {
    if state.spawned_count >= state.quota {
        return None;
    }

    let Some(last) = state.last_spawn_ms else {
        state.last_spawn_ms = Some(now_ms);
        return None;
    };

    if now_ms - last < tuning.spawn_interval_ms(state.level) {
        return None;
    }

    state.last_spawn_ms = Some(now_ms);
    Some(spawn_incoming(state, tuning))
}

/// Append one incoming projectile and count it against the quota
pub fn spawn_incoming(state: &mut GameState, tuning: &Tuning) -> u32 {
    let start = Vec2::new(state.rng.random_range(0.0..=tuning.scene_width), 0.0);
    let target = pick_target(state, tuning);
    let jitter: f32 = state.rng.random();
    let speed = tuning.incoming_speed_min
        + jitter * (tuning.incoming_speed_max - tuning.incoming_speed_min)
        + state.level as f32 * tuning.incoming_speed_level_scaling;

    let id = state.next_entity_id();
    state
        .projectiles
        .push(Projectile::new(id, ProjectileKind::Incoming, start, target, speed));
    state.spawned_count += 1;

    log::debug!(
        "Spawned incoming {} ({}/{}) -> ({:.0}, {:.0}) speed {:.2}",
        id,
        state.spawned_count,
        state.quota,
        target.x,
        target.y,
        speed
    );
    id
}

/// Aim at a random live structure most of the time, otherwise open ground
fn pick_target(state: &mut GameState, tuning: &Tuning) -> Vec2 {
    let survivors: Vec<Vec2> = state
        .structures
        .iter()
        .filter(|s| !s.is_destroyed)
        .map(|s| s.position)
        .collect();

    if !survivors.is_empty() && state.rng.random_bool(tuning.target_structure_chance) {
        let pick = state.rng.random_range(0..survivors.len());
        return survivors[pick];
    }

    Vec2::new(
        state.rng.random_range(0.0..=tuning.scene_width),
        tuning.ground_y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        (GameState::new(42, &tuning), tuning)
    }

    #[test]
    fn test_first_check_sets_baseline() {
        let (mut state, tuning) = setup();
        assert_eq!(spawn_check(&mut state, &tuning, 10_000.0), None);
        assert_eq!(state.last_spawn_ms, Some(10_000.0));
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_spawn_waits_for_interval() {
        let (mut state, tuning) = setup();
        spawn_check(&mut state, &tuning, 0.0);
        assert_eq!(spawn_check(&mut state, &tuning, 2999.0), None);
        assert!(spawn_check(&mut state, &tuning, 3000.0).is_some());
        assert_eq!(state.spawned_count, 1);
        // Interval restarts from the spawn
        assert_eq!(spawn_check(&mut state, &tuning, 3500.0), None);
    }

    #[test]
    fn test_quota_caps_spawns() {
        let (mut state, tuning) = setup();
        state.last_spawn_ms = Some(0.0);
        let mut now = 0.0;
        for _ in 0..100 {
            now += 5000.0;
            spawn_check(&mut state, &tuning, now);
        }
        assert_eq!(state.spawned_count, state.quota);
        assert_eq!(state.projectiles.len() as u32, state.quota);
    }

    #[test]
    fn test_spawned_projectile_shape() {
        let (mut state, tuning) = setup();
        spawn_incoming(&mut state, &tuning);
        let p = &state.projectiles[0];
        assert_eq!(p.kind, ProjectileKind::Incoming);
        assert_eq!(p.start.y, 0.0);
        assert_eq!(p.current, p.start);
        assert_eq!(p.end.y, tuning.ground_y);
        assert!(p.start.x >= 0.0 && p.start.x <= tuning.scene_width);
        let min = tuning.incoming_speed_min + tuning.incoming_speed_level_scaling;
        let max = tuning.incoming_speed_max + tuning.incoming_speed_level_scaling;
        assert!(p.speed >= min && p.speed <= max);
    }

    #[test]
    fn test_no_survivors_aims_at_ground() {
        let tuning = Tuning {
            target_structure_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(3, &tuning);
        for s in &mut state.structures {
            s.is_destroyed = true;
        }
        for _ in 0..20 {
            spawn_incoming(&mut state, &tuning);
        }
        assert!(state.projectiles.iter().all(|p| p.end.y == tuning.ground_y));
    }

    #[test]
    fn test_always_targets_live_structure_when_forced() {
        let tuning = Tuning {
            target_structure_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(9, &tuning);
        state.structures[0].is_destroyed = true;
        for _ in 0..50 {
            spawn_incoming(&mut state, &tuning);
        }
        for p in &state.projectiles {
            let hit = state.structures.iter().find(|s| s.position == p.end).unwrap();
            assert!(!hit.is_destroyed);
        }
    }

    #[test]
    fn test_default_targeting_mixes_structures_and_ground() {
        let (mut state, tuning) = setup();
        assert_eq!(tuning.target_structure_chance, 0.8);
        for _ in 0..400 {
            spawn_incoming(&mut state, &tuning);
        }
        let at_structures = state
            .projectiles
            .iter()
            .filter(|p| state.structures.iter().any(|s| s.position == p.end))
            .count();
        // ~320 expected
        assert!((260..=370).contains(&at_structures), "{at_structures} aimed at structures");
        assert!(state.projectiles.iter().all(|p| p.end.y == tuning.ground_y));
    }

    #[test]
    fn test_speed_rises_with_level() {
        let tuning = Tuning {
            incoming_speed_min: 1.0,
            incoming_speed_max: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(1, &tuning);
        spawn_incoming(&mut state, &tuning);
        state.level = 5;
        spawn_incoming(&mut state, &tuning);
        assert!(state.projectiles[1].speed > state.projectiles[0].speed);
    }
}
