//! Scripted player for headless runs and soak tests
//!
//! Picks the most threatening incoming projectile, leads it by the time a
//! player projectile needs to reach it, and fires on a cooldown.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::{Projectile, Snapshot};
use crate::step_along;
use crate::tuning::Tuning;

/// Don't bother aiming at anything closer to the ground than this
const GROUND_MARGIN: f32 = 30.0;
/// Aim this many ticks ahead so the projectile flies into the growing blast
const EXTRA_LEAD_TICKS: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Ticks between shots
    pub cooldown_ticks: u32,
    remaining: u32,
    outgoing_speed: f32,
    ground_y: f32,
    /// Incoming projectile IDs already shot at
    targeted: HashSet<u32>,
}

impl Autopilot {
    pub fn new(tuning: &Tuning, cooldown_ticks: u32) -> Self {
        Self {
            cooldown_ticks,
            remaining: 0,
            outgoing_speed: tuning.outgoing_speed,
            ground_y: tuning.ground_y,
            targeted: HashSet::new(),
        }
    }

    /// Decide where to fire this tick, if anywhere
    pub fn next_target(&mut self, snapshot: &Snapshot) -> Option<Vec2> {
        // Forget projectiles that no longer exist
        self.targeted
            .retain(|id| snapshot.projectiles.iter().any(|p| p.id == *id));

        if snapshot.is_game_over {
            return None;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            return None;
        }

        let launchers: Vec<Vec2> = snapshot
            .structures
            .iter()
            .filter(|s| s.can_fire())
            .map(|s| s.position)
            .collect();
        if launchers.is_empty() {
            return None;
        }

        // Lowest untargeted projectile is the most urgent
        let threat = snapshot
            .projectiles
            .iter()
            .filter(|p| !self.targeted.contains(&p.id))
            .filter(|p| p.current.y < self.ground_y - GROUND_MARGIN)
            .max_by(|a, b| {
                a.current
                    .y
                    .partial_cmp(&b.current.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;

        let aim = self.lead(threat, &launchers)?;
        self.targeted.insert(threat.id);
        self.remaining = self.cooldown_ticks;
        log::trace!("Autopilot targeting {} at ({:.0}, {:.0})", threat.id, aim.x, aim.y);
        Some(aim)
    }

    /// Predict where `threat` will be when a shot from the nearest launcher arrives
    fn lead(&self, threat: &Projectile, launchers: &[Vec2]) -> Option<Vec2> {
        let mut aim = threat.current;
        // Two refinement passes are plenty for straight-line motion
        for _ in 0..2 {
            let origin = launchers.iter().copied().min_by(|a, b| {
                a.distance(aim)
                    .partial_cmp(&b.distance(aim))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;
            let flight_ticks = origin.distance(aim) / self.outgoing_speed + EXTRA_LEAD_TICKS;
            aim = step_along(threat.current, threat.angle, threat.speed * flight_ticks);
        }
        (aim.y < self.ground_y - GROUND_MARGIN).then_some(aim)
    }
}
