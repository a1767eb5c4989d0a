//! Per-tick motion integration
//!
//! Constant step per tick regardless of wall-clock delta. Each call builds
//! the next generation of every population and swaps it in.

use super::state::{GameState, Projectile};
use crate::step_along;
use crate::tuning::Tuning;

/// Advance all projectiles and blasts by one tick
pub fn integrate(state: &mut GameState, tuning: &Tuning) {
    state.projectiles = state.projectiles.iter().map(advance_incoming).collect();
    state.outgoing = state.outgoing.iter().map(advance_outgoing).collect();
    state.blasts = state
        .blasts
        .iter()
        .filter_map(|b| b.stepped(tuning.blast_growth_rate))
        .collect();
}

fn advance_incoming(p: &Projectile) -> Projectile {
    Projectile {
        current: step_along(p.current, p.angle, p.speed),
        ..p.clone()
    }
}

/// Player projectiles stop on their target instead of overshooting it
fn advance_outgoing(p: &Projectile) -> Projectile {
    let current = if p.remaining() <= p.speed {
        p.end
    } else {
        step_along(p.current, p.angle, p.speed)
    };
    Projectile { current, ..p.clone() }
}
