//! Game balance tuning
//!
//! Every number the simulation scales by lives here so a run can be
//! rebalanced from a JSON file without touching code. Defaults come from
//! [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance parameters for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Scene ===
    pub scene_width: f32,
    pub ground_y: f32,

    // === Structures ===
    pub structure_count: usize,
    /// Half of a structure's horizontal extent (impact test)
    pub structure_half_width: f32,
    pub initial_ammo: u32,

    // === Spawning ===
    pub spawn_base_interval_ms: f64,
    pub spawn_min_interval_ms: f64,
    pub spawn_interval_scaling: f64,
    pub target_structure_chance: f64,
    pub incoming_speed_min: f32,
    pub incoming_speed_max: f32,
    pub incoming_speed_level_scaling: f32,

    // === Player fire ===
    pub outgoing_speed: f32,

    // === Blasts ===
    pub blast_growth_rate: f32,
    pub blast_max_radius: f32,
    pub impact_blast_max_radius: f32,
    pub chain_blast_max_radius: f32,

    // === Scoring / levels ===
    pub kill_score: u64,
    pub structure_saved_score: u64,
    pub quota_base: u32,
    pub quota_per_level: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scene_width: SCENE_WIDTH,
            ground_y: GROUND_Y,

            structure_count: STRUCTURE_COUNT,
            structure_half_width: STRUCTURE_HALF_WIDTH,
            initial_ammo: INITIAL_AMMO,

            spawn_base_interval_ms: SPAWN_BASE_INTERVAL_MS,
            spawn_min_interval_ms: SPAWN_MIN_INTERVAL_MS,
            spawn_interval_scaling: SPAWN_INTERVAL_SCALING,
            target_structure_chance: TARGET_STRUCTURE_CHANCE,
            incoming_speed_min: INCOMING_SPEED_MIN,
            incoming_speed_max: INCOMING_SPEED_MAX,
            incoming_speed_level_scaling: INCOMING_SPEED_LEVEL_SCALING,

            outgoing_speed: OUTGOING_SPEED,

            blast_growth_rate: BLAST_GROWTH_RATE,
            blast_max_radius: BLAST_MAX_RADIUS,
            impact_blast_max_radius: IMPACT_BLAST_MAX_RADIUS,
            chain_blast_max_radius: CHAIN_BLAST_MAX_RADIUS,

            kill_score: KILL_SCORE,
            structure_saved_score: STRUCTURE_SAVED_SCORE,
            quota_base: QUOTA_BASE,
            quota_per_level: QUOTA_PER_LEVEL,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; omitted fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, crate::persistence::StoreError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Clamp values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.spawn_min_interval_ms > 0.0) {
            log::warn!(
                "spawn_min_interval_ms {} must be positive, using {}",
                self.spawn_min_interval_ms,
                defaults.spawn_min_interval_ms
            );
            self.spawn_min_interval_ms = defaults.spawn_min_interval_ms;
        }
        if !(self.spawn_interval_scaling > 0.0) {
            log::warn!(
                "spawn_interval_scaling {} must be positive, using {}",
                self.spawn_interval_scaling,
                defaults.spawn_interval_scaling
            );
            self.spawn_interval_scaling = defaults.spawn_interval_scaling;
        }
        if !(0.0..=1.0).contains(&self.target_structure_chance) {
            log::warn!(
                "target_structure_chance {} outside [0, 1], clamping",
                self.target_structure_chance
            );
            self.target_structure_chance = if self.target_structure_chance.is_nan() {
                defaults.target_structure_chance
            } else {
                self.target_structure_chance.clamp(0.0, 1.0)
            };
        }
        if !(self.incoming_speed_min > 0.0) {
            log::warn!("incoming_speed_min must be positive, using default");
            self.incoming_speed_min = defaults.incoming_speed_min;
        }
        if !(self.incoming_speed_max >= self.incoming_speed_min) {
            log::warn!("incoming_speed_max below incoming_speed_min, raising it");
            self.incoming_speed_max = self.incoming_speed_min;
        }
        if !(self.incoming_speed_level_scaling >= 0.0) {
            self.incoming_speed_level_scaling = 0.0;
        }
        if !(self.outgoing_speed > 0.0) {
            log::warn!("outgoing_speed must be positive, using default");
            self.outgoing_speed = defaults.outgoing_speed;
        }
        if !(self.blast_growth_rate > 0.0) {
            log::warn!("blast_growth_rate must be positive, using default");
            self.blast_growth_rate = defaults.blast_growth_rate;
        }
        for radius in [
            &mut self.blast_max_radius,
            &mut self.impact_blast_max_radius,
            &mut self.chain_blast_max_radius,
        ] {
            if !(*radius > 0.0) {
                log::warn!("blast radius {} must be positive, using 1", radius);
                *radius = 1.0;
            }
        }
        if !(self.scene_width > 0.0) {
            self.scene_width = defaults.scene_width;
        }
        if !(self.ground_y > 0.0) {
            self.ground_y = defaults.ground_y;
        }
        self
    }

    /// Milliseconds between incoming spawns at `level`, floored at the minimum
    pub fn spawn_interval_ms(&self, level: u32) -> f64 {
        let divisor = level.max(1) as f64 * self.spawn_interval_scaling;
        if divisor <= 0.0 {
            return self.spawn_base_interval_ms.max(self.spawn_min_interval_ms);
        }
        (self.spawn_base_interval_ms / divisor).max(self.spawn_min_interval_ms)
    }

    /// Number of incoming projectiles in `level`
    pub fn quota_for_level(&self, level: u32) -> u32 {
        self.quota_base + level * self.quota_per_level
    }

    /// Evenly spaced structure centers along the ground line
    pub fn structure_positions(&self) -> Vec<Vec2> {
        let spacing = self.scene_width / (self.structure_count as f32 + 1.0);
        (1..=self.structure_count)
            .map(|i| Vec2::new(spacing * i as f32, self.ground_y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_quota() {
        let tuning = Tuning::default();
        assert_eq!(tuning.quota_for_level(1), 12);
        assert_eq!(tuning.quota_for_level(2), 14);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval_ms(1), 3000.0);
        assert_eq!(tuning.spawn_interval_ms(2), 1500.0);
        assert_eq!(tuning.spawn_interval_ms(100), 500.0);
    }

    #[test]
    fn test_structure_positions_on_ground() {
        let tuning = Tuning::default();
        let positions = tuning.structure_positions();
        assert_eq!(positions.len(), 6);
        assert!(positions.iter().all(|p| p.y == tuning.ground_y));
        assert!(positions.windows(2).all(|w| w[0].x < w[1].x));
        assert!(positions.iter().all(|p| p.x > 0.0 && p.x < tuning.scene_width));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "kill_score": 50, "quota_base": 4 }"#).unwrap();
        assert_eq!(tuning.kill_score, 50);
        assert_eq!(tuning.quota_base, 4);
        assert_eq!(tuning.initial_ammo, INITIAL_AMMO);
    }

    #[test]
    fn test_sanitized_fixes_bad_values() {
        let tuning = Tuning {
            spawn_min_interval_ms: -1.0,
            blast_growth_rate: 0.0,
            target_structure_chance: 3.0,
            incoming_speed_max: 0.1,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning.spawn_min_interval_ms, SPAWN_MIN_INTERVAL_MS);
        assert_eq!(tuning.blast_growth_rate, BLAST_GROWTH_RATE);
        assert_eq!(tuning.target_structure_chance, 1.0);
        assert_eq!(tuning.incoming_speed_max, tuning.incoming_speed_min);
    }

    proptest! {
        #[test]
        fn spawn_interval_never_increases_and_stays_floored(level in 1u32..500) {
            let tuning = Tuning::default();
            let here = tuning.spawn_interval_ms(level);
            let next = tuning.spawn_interval_ms(level + 1);
            prop_assert!(next <= here);
            prop_assert!(here >= tuning.spawn_min_interval_ms);
        }
    }
}
