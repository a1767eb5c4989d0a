//! Collision resolution
//!
//! Runs once per tick after motion, in a fixed order:
//! 1. incoming projectiles reaching the ground line
//! 2. player projectiles reaching their target
//! 3. blasts catching incoming projectiles (chain reactions)
//!
//! Later stages see the results of earlier ones, so a blast created in
//! stage 1 or 2 takes part in stage 3 of the same tick.

use glam::Vec2;

use super::events::GameEvent;
use super::state::{Blast, BlastKind, GameState, Projectile};
use crate::tuning::Tuning;

/// Summary of what a tick's collisions did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Structures destroyed this tick
    pub destroyed: Vec<u32>,
    /// Incoming projectiles caught by blasts
    pub kills: u32,
    pub score_delta: u64,
}

/// Resolve all collisions for one tick
pub fn resolve(
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let mut new_blasts = Vec::new();

    let airborne = resolve_ground_impacts(state, tuning, events, &mut outcome, &mut new_blasts);
    resolve_arrivals(state, tuning, events, &mut new_blasts);

    let mut blasts = std::mem::take(&mut state.blasts);
    blasts.append(&mut new_blasts);

    let mut chain = Vec::new();
    let survivors = resolve_blast_hits(
        state,
        tuning,
        events,
        &mut outcome,
        &blasts,
        airborne,
        &mut chain,
    );

    // Chain blasts start at radius zero and join the next generation
    blasts.append(&mut chain);
    state.projectiles = survivors;
    state.blasts = blasts;
    state.score += outcome.score_delta;
    state.normalize_order();
    outcome
}

/// Stage 1: incoming projectiles that reached the ground detonate there.
/// Returns the projectiles still in the air.
fn resolve_ground_impacts(
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
    outcome: &mut CollisionOutcome,
    new_blasts: &mut Vec<Blast>,
) -> Vec<Projectile> {
    let mut airborne = Vec::with_capacity(state.projectiles.len());

    for p in std::mem::take(&mut state.projectiles) {
        if p.current.y < tuning.ground_y {
            airborne.push(p);
            continue;
        }

        let impact = ground_crossing(&p, tuning.ground_y);

        // At most one structure is credited per impact
        if let Some(structure) = state
            .structures
            .iter_mut()
            .find(|s| !s.is_destroyed && s.covers_x(impact.x, tuning.structure_half_width))
        {
            structure.is_destroyed = true;
            outcome.destroyed.push(structure.id);
            events.push(GameEvent::StructureDestroyed {
                structure_id: structure.id,
            });
            log::info!("Structure {} destroyed", structure.id);
        }

        new_blasts.push(create_blast(
            state,
            events,
            BlastKind::Impact,
            impact,
            tuning.impact_blast_max_radius,
        ));
    }

    airborne
}

/// Stage 2: player projectiles within one step of their target detonate on it
fn resolve_arrivals(
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
    new_blasts: &mut Vec<Blast>,
) {
    let mut in_flight = Vec::with_capacity(state.outgoing.len());

    for p in std::mem::take(&mut state.outgoing) {
        if p.remaining() < p.speed {
            new_blasts.push(create_blast(
                state,
                events,
                BlastKind::Detonation,
                p.end,
                tuning.blast_max_radius,
            ));
        } else {
            in_flight.push(p);
        }
    }

    state.outgoing = in_flight;
}

/// Stage 3: each blast consumes the incoming projectiles inside its radius.
/// A consumed projectile is never tested against a later blast.
fn resolve_blast_hits(
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
    outcome: &mut CollisionOutcome,
    blasts: &[Blast],
    mut survivors: Vec<Projectile>,
    chain: &mut Vec<Blast>,
) -> Vec<Projectile> {
    for blast in blasts {
        let (caught, rest): (Vec<_>, Vec<_>) =
            survivors.into_iter().partition(|p| blast.contains(p.current));
        survivors = rest;

        for p in caught {
            outcome.kills += 1;
            outcome.score_delta += tuning.kill_score;
            chain.push(create_blast(
                state,
                events,
                BlastKind::Chain,
                p.current,
                tuning.chain_blast_max_radius,
            ));
        }
    }

    survivors
}

fn create_blast(
    state: &mut GameState,
    events: &mut Vec<GameEvent>,
    kind: BlastKind,
    center: Vec2,
    max_radius: f32,
) -> Blast {
    let id = state.next_entity_id();
    events.push(GameEvent::Explosion {
        blast_id: id,
        kind,
        center,
    });
    Blast::new(id, kind, center, max_radius)
}

/// Point where a projectile's path crossed the ground line this tick
fn ground_crossing(p: &Projectile, ground_y: f32) -> Vec2 {
    let prev = p.current - Vec2::from_angle(p.angle) * p.speed;
    let dy = p.current.y - prev.y;
    if dy <= f32::EPSILON {
        return Vec2::new(p.current.x, ground_y);
    }
    let t = ((ground_y - prev.y) / dy).clamp(0.0, 1.0);
    Vec2::new(prev.x + (p.current.x - prev.x) * t, ground_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ProjectileKind;

    fn setup() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        (GameState::new(5, &tuning), tuning)
    }

    fn incoming_at(state: &mut GameState, pos: Vec2, end: Vec2) -> u32 {
        let id = state.next_entity_id();
        let mut p = Projectile::new(id, ProjectileKind::Incoming, Vec2::new(pos.x, 0.0), end, 1.0);
        p.current = pos;
        state.projectiles.push(p);
        id
    }

    #[test]
    fn test_ground_hit_destroys_structure_under_impact() {
        let (mut state, tuning) = setup();
        let target = state.structures[2].position;
        incoming_at(&mut state, Vec2::new(target.x, tuning.ground_y + 0.5), target);

        let mut events = Vec::new();
        let outcome = resolve(&mut state, &tuning, &mut events);

        assert_eq!(outcome.destroyed, vec![state.structures[2].id]);
        assert!(state.structures[2].is_destroyed);
        assert_eq!(state.surviving_structures(), tuning.structure_count - 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.blasts.len(), 1);
        assert_eq!(state.blasts[0].kind, BlastKind::Impact);
        assert_eq!(state.blasts[0].max_radius, tuning.impact_blast_max_radius);
        assert_eq!(state.score, 0);
        assert!(events.contains(&GameEvent::StructureDestroyed {
            structure_id: state.structures[2].id
        }));
    }

    #[test]
    fn test_ground_hit_between_structures_destroys_nothing() {
        let (mut state, tuning) = setup();
        let a = state.structures[0].position.x;
        let b = state.structures[1].position.x;
        let gap = Vec2::new((a + b) / 2.0, tuning.ground_y);
        incoming_at(&mut state, gap, gap);

        let outcome = resolve(&mut state, &tuning, &mut Vec::new());
        assert!(outcome.destroyed.is_empty());
        assert_eq!(state.surviving_structures(), tuning.structure_count);
        assert_eq!(state.blasts.len(), 1);
    }

    #[test]
    fn test_outgoing_arrival_detonates_at_target() {
        let (mut state, tuning) = setup();
        let target = Vec2::new(400.0, 300.0);
        let id = state.next_entity_id();
        let mut p = Projectile::new(id, ProjectileKind::Outgoing, Vec2::new(400.0, 560.0), target, 6.0);
        p.current = Vec2::new(400.0, 304.0);
        state.outgoing.push(p);

        resolve(&mut state, &tuning, &mut Vec::new());
        assert!(state.outgoing.is_empty());
        assert_eq!(state.blasts.len(), 1);
        assert_eq!(state.blasts[0].center, target);
        assert_eq!(state.blasts[0].max_radius, tuning.blast_max_radius);
    }

    #[test]
    fn test_outgoing_far_from_target_keeps_flying() {
        let (mut state, tuning) = setup();
        let id = state.next_entity_id();
        state.outgoing.push(Projectile::new(
            id,
            ProjectileKind::Outgoing,
            Vec2::new(400.0, 560.0),
            Vec2::new(400.0, 100.0),
            6.0,
        ));
        resolve(&mut state, &tuning, &mut Vec::new());
        assert_eq!(state.outgoing.len(), 1);
        assert!(state.blasts.is_empty());
    }

    #[test]
    fn test_blast_catches_projectile_and_chains() {
        let (mut state, tuning) = setup();
        let id = state.next_entity_id();
        let mut blast = Blast::new(id, BlastKind::Detonation, Vec2::new(300.0, 200.0), 50.0);
        blast.radius = 30.0;
        state.blasts.push(blast);
        incoming_at(&mut state, Vec2::new(310.0, 210.0), Vec2::new(310.0, 560.0));
        incoming_at(&mut state, Vec2::new(600.0, 100.0), Vec2::new(600.0, 560.0));

        let mut events = Vec::new();
        let outcome = resolve(&mut state, &tuning, &mut events);

        assert_eq!(outcome.kills, 1);
        assert_eq!(state.score, tuning.kill_score);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].current, Vec2::new(600.0, 100.0));
        assert_eq!(state.blasts.len(), 2);
        let chain = &state.blasts[1];
        assert_eq!(chain.kind, BlastKind::Chain);
        assert_eq!(chain.center, Vec2::new(310.0, 210.0));
        assert_eq!(chain.radius, 0.0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_overlapping_blasts_consume_projectile_once() {
        let (mut state, tuning) = setup();
        for _ in 0..2 {
            let id = state.next_entity_id();
            let mut blast = Blast::new(id, BlastKind::Detonation, Vec2::new(300.0, 200.0), 50.0);
            blast.radius = 40.0;
            state.blasts.push(blast);
        }
        incoming_at(&mut state, Vec2::new(300.0, 210.0), Vec2::new(300.0, 560.0));

        let outcome = resolve(&mut state, &tuning, &mut Vec::new());
        assert_eq!(outcome.kills, 1);
        assert_eq!(state.score, tuning.kill_score);
        assert_eq!(state.blasts.len(), 3);
    }

    #[test]
    fn test_outgoing_immune_to_blasts() {
        let (mut state, tuning) = setup();
        let id = state.next_entity_id();
        let mut blast = Blast::new(id, BlastKind::Detonation, Vec2::new(300.0, 300.0), 50.0);
        blast.radius = 40.0;
        state.blasts.push(blast);
        let id = state.next_entity_id();
        let mut p = Projectile::new(id, ProjectileKind::Outgoing, Vec2::new(300.0, 560.0), Vec2::new(300.0, 100.0), 6.0);
        p.current = Vec2::new(300.0, 300.0);
        state.outgoing.push(p);

        resolve(&mut state, &tuning, &mut Vec::new());
        assert_eq!(state.outgoing.len(), 1);
    }

    #[test]
    fn test_ground_crossing_interpolates() {
        let p = Projectile {
            id: 1,
            kind: ProjectileKind::Incoming,
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(100.0, 100.0),
            current: Vec2::new(104.0, 104.0),
            speed: 8.0_f32.sqrt() * 4.0,
            angle: std::f32::consts::FRAC_PI_4,
        };
        let hit = ground_crossing(&p, 100.0);
        assert!((hit.x - 100.0).abs() < 1e-3);
        assert_eq!(hit.y, 100.0);
    }
}
