//! Skyshield headless runner
//!
//! Plays a game with the autopilot on a synthetic frame clock and reports
//! what happened. Useful for balance checks and soak testing.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use skyshield::persistence::{BestScoreStore, JsonFileStore, MemoryStore};
    use skyshield::{Autopilot, GameEvent, Simulation, Snapshot, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "skyshield")]
    #[command(about = "Run a headless missile defense game with the autopilot")]
    struct Cli {
        /// RNG seed for the run
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Stop after this many frames even if the game is still going
        #[arg(long, default_value_t = 36_000)]
        frames: u64,
        /// Milliseconds between frames on the synthetic clock
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        frame_ms: f64,
        /// Ticks the autopilot waits between shots
        #[arg(long, default_value_t = 12)]
        cooldown: u32,
        /// JSON balance overrides
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Persist the best score in this JSON file
        #[arg(long)]
        best_score_file: Option<PathBuf>,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("failed to load tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        let snapshot = match &cli.best_score_file {
            Some(path) => play(
                &cli,
                Simulation::new(cli.seed, tuning, JsonFileStore::new(path)),
            ),
            None => play(
                &cli,
                Simulation::new(cli.seed, tuning, MemoryStore::default()),
            ),
        };

        if cli.json {
            let json =
                serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?;
            println!("{json}");
        } else {
            println!(
                "seed {} | level {} | score {} | best {} | structures left {} | {}",
                cli.seed,
                snapshot.level,
                snapshot.score,
                snapshot.best_score,
                snapshot.surviving_structures(),
                if snapshot.is_game_over {
                    "game over"
                } else {
                    "still standing"
                }
            );
        }
        Ok(())
    }

    fn play<S: BestScoreStore>(cli: &Cli, mut sim: Simulation<S>) -> Snapshot {
        let mut pilot = Autopilot::new(sim.tuning(), cli.cooldown);
        let mut now = 0.0;

        for _ in 0..cli.frames {
            let snapshot = sim.tick(now);
            for event in sim.events() {
                match event {
                    GameEvent::LevelStarted { level } => log::info!("Level {level}"),
                    GameEvent::LevelCleared { level, bonus } => {
                        log::info!("Level {level} cleared, bonus {bonus}")
                    }
                    GameEvent::StructureDestroyed { structure_id } => {
                        log::info!("Lost structure {structure_id}")
                    }
                    GameEvent::GameOver { score, new_best } => {
                        log::info!("Game over: {score}{}", if *new_best { " (best)" } else { "" })
                    }
                    other => log::trace!("{other:?}"),
                }
            }
            if snapshot.is_game_over {
                return snapshot;
            }
            if let Some(target) = pilot.next_target(&snapshot) {
                sim.fire(target);
            }
            now += cli.frame_ms;
        }

        sim.stop();
        sim.snapshot().clone()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts load the library and use `skyshield::web::WebSimulation`
}
